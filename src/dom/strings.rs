//! String views and the document string pool
//!
//! Two storage modes:
//! - `Text::Input`: (offset, len) into the parse buffer (zero-copy)
//! - `Text::Pool`: strings set through the tree API, copied into the pool
//!
//! The pool deduplicates by content so repeated class names or attribute
//! names set programmatically are stored once.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::span::Span;

/// A string view owned by a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    /// Borrowed from the parse buffer
    Input(Span),
    /// Stored in the document's string pool
    Pool(Span),
}

impl Text {
    pub const EMPTY: Text = Text::Input(Span::empty());

    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            Text::Input(span) | Text::Pool(span) => span.is_empty(),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::EMPTY
    }
}

/// Append-only storage for strings that do not live in the parse buffer
#[derive(Debug, Default, Clone)]
pub struct StringPool {
    data: Vec<u8>,
    /// Hash of string content -> spans with that hash
    hash_index: HashMap<u64, Vec<Span>>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool {
            data: Vec::with_capacity(256),
            hash_index: HashMap::new(),
        }
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Copy `s` into the pool, reusing an existing copy when present
    pub fn intern(&mut self, s: &[u8]) -> Text {
        if s.is_empty() {
            return Text::EMPTY;
        }

        let hash = Self::compute_hash(s);
        if let Some(spans) = self.hash_index.get(&hash) {
            for span in spans {
                if span.slice(&self.data) == s {
                    return Text::Pool(*span);
                }
            }
        }

        let span = Span::from_range(self.data.len(), self.data.len() + s.len());
        self.data.extend_from_slice(s);
        self.hash_index.entry(hash).or_default().push(span);
        Text::Pool(span)
    }

    /// Resolve a view against the parse buffer or the pool
    #[inline]
    pub fn resolve<'s>(&'s self, text: Text, input: &'s [u8]) -> &'s [u8] {
        match text {
            Text::Input(span) => span.slice(input),
            Text::Pool(span) => span.slice(&self.data),
        }
    }

    /// Total bytes copied into the pool
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.hash_index.clear();
    }
}
