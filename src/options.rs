//! Parse configuration
//!
//! A `ParseOptions` value is handed to every parse call and copied into that
//! parse's context, so concurrent or nested parses never share settings.

/// Controls how text runs and attribute values are normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Expand `&amp; &apos; &lt; &gt; &quot;` and numeric references
    pub expand_entities: bool,
    /// Collapse every whitespace run in text to a single space
    pub normalize_whitespace: bool,
    /// Trim leading and trailing whitespace from element text
    pub trim_whitespace: bool,
    /// Encode numeric references as UTF-8; otherwise store the low 8 bits
    pub utf8_output: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            expand_entities: true,
            normalize_whitespace: false,
            trim_whitespace: false,
            utf8_output: true,
        }
    }
}

impl ParseOptions {
    /// Options that leave every text run exactly as written
    pub fn raw() -> Self {
        ParseOptions {
            expand_entities: false,
            ..Self::default()
        }
    }

    pub fn with_entities(mut self, expand: bool) -> Self {
        self.expand_entities = expand;
        self
    }

    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    pub fn with_trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    pub fn with_utf8_output(mut self, utf8: bool) -> Self {
        self.utf8_output = utf8;
        self
    }

    /// True when the normalizer can skip spans without rewriting anything
    #[inline]
    pub fn is_passthrough(&self) -> bool {
        !self.expand_entities && !self.normalize_whitespace
    }
}
