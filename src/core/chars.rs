//! Character classification tables
//!
//! Every scan in the parser asks one question per byte: does this byte
//! continue the current span? Each context gets a 256-entry table built at
//! compile time and a zero-sized predicate type, so the scanning loops are
//! monomorphized per context and each test is a single indexed load.
//!
//! Bytes >= 0x80 are accepted by every name and text context, which keeps
//! multi-byte UTF-8 sequences intact.

/// Sentinel returned by [`digit_value`] for bytes that are not digits
pub const NOT_A_DIGIT: u8 = 0xFF;

/// A per-byte membership test
pub trait CharClass {
    fn test(b: u8) -> bool;
}

const fn table_excluding(excluded: &[u8]) -> [bool; 256] {
    let mut table = [true; 256];
    let mut i = 0;
    while i < excluded.len() {
        table[excluded[i] as usize] = false;
        i += 1;
    }
    table
}

const fn table_including(included: &[u8]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < included.len() {
        table[included[i] as usize] = true;
        i += 1;
    }
    table
}

const fn build_digits() -> [u8; 256] {
    let mut table = [NOT_A_DIGIT; 256];
    let mut i = 0u8;
    while i < 10 {
        table[(b'0' + i) as usize] = i;
        i += 1;
    }
    let mut i = 0u8;
    while i < 6 {
        table[(b'a' + i) as usize] = 10 + i;
        table[(b'A' + i) as usize] = 10 + i;
        i += 1;
    }
    table
}

static WHITESPACE: [bool; 256] = table_including(b" \t\r\n");
static NODE_NAME: [bool; 256] = table_excluding(b"\0 \t\r\n/>?");
static ATTRIBUTE_NAME: [bool; 256] = table_excluding(b"\0 \t\r\n/>?<=!");
static TEXT: [bool; 256] = table_excluding(b"\0<");
static TEXT_PURE: [bool; 256] = table_excluding(b"\0<&");
static TEXT_PURE_WS: [bool; 256] = table_excluding(b"\0<& \t\r\n");
static ATTR_DOUBLE: [bool; 256] = table_excluding(b"\0\"");
static ATTR_DOUBLE_PURE: [bool; 256] = table_excluding(b"\0\"&");
static ATTR_SINGLE: [bool; 256] = table_excluding(b"\0'");
static ATTR_SINGLE_PURE: [bool; 256] = table_excluding(b"\0'&");
static ATTR_DOUBLE_PURE_WS: [bool; 256] = table_excluding(b"\0\"& \t\r\n");
static ATTR_SINGLE_PURE_WS: [bool; 256] = table_excluding(b"\0'& \t\r\n");
static DIGITS: [u8; 256] = build_digits();

macro_rules! char_class {
    ($(#[$meta:meta])* $name:ident => $table:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl CharClass for $name {
            #[inline(always)]
            fn test(b: u8) -> bool {
                $table[b as usize]
            }
        }
    };
}

char_class!(
    /// Space, tab, CR, LF
    Whitespace => WHITESPACE
);
char_class!(
    /// Anything except whitespace, `/`, `>`, `?` and NUL
    NodeName => NODE_NAME
);
char_class!(
    /// Node name characters minus `<`, `=` and `!`
    AttributeName => ATTRIBUTE_NAME
);
char_class!(
    /// Anything but `<` and NUL
    Text => TEXT
);
char_class!(
    /// Text that needs no rewriting when whitespace is kept as-is
    TextPure => TEXT_PURE
);
char_class!(
    /// Text that needs no rewriting when whitespace is condensed
    TextPureWs => TEXT_PURE_WS
);
char_class!(
    /// Double-quoted attribute value
    AttrValueDouble => ATTR_DOUBLE
);
char_class!(AttrValueDoublePure => ATTR_DOUBLE_PURE);
char_class!(
    /// Single-quoted attribute value
    AttrValueSingle => ATTR_SINGLE
);
char_class!(AttrValueSinglePure => ATTR_SINGLE_PURE);
char_class!(AttrValueDoublePureWs => ATTR_DOUBLE_PURE_WS);
char_class!(AttrValueSinglePureWs => ATTR_SINGLE_PURE_WS);

/// The three predicates describing one kind of normalizable run: where it
/// stops, and which prefix needs no rewriting with and without whitespace
/// condensing
pub trait RunClass {
    type Stop: CharClass;
    type Pure: CharClass;
    type PureWs: CharClass;
}

/// Element text content
#[derive(Debug, Clone, Copy)]
pub struct TextRun;

impl RunClass for TextRun {
    type Stop = Text;
    type Pure = TextPure;
    type PureWs = TextPureWs;
}

/// Attribute value inside `"..."`
#[derive(Debug, Clone, Copy)]
pub struct DoubleQuoted;

impl RunClass for DoubleQuoted {
    type Stop = AttrValueDouble;
    type Pure = AttrValueDoublePure;
    type PureWs = AttrValueDoublePureWs;
}

/// Attribute value inside `'...'`
#[derive(Debug, Clone, Copy)]
pub struct SingleQuoted;

impl RunClass for SingleQuoted {
    type Stop = AttrValueSingle;
    type Pure = AttrValueSinglePure;
    type PureWs = AttrValueSinglePureWs;
}

#[inline(always)]
pub fn is_whitespace(b: u8) -> bool {
    Whitespace::test(b)
}

/// Value of an ASCII hex or decimal digit, or [`NOT_A_DIGIT`]
#[inline(always)]
pub fn digit_value(b: u8) -> u8 {
    DIGITS[b as usize]
}
