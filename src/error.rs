//! Error types
//!
//! Every parse failure is fatal: the first error unwinds straight to the
//! top-level parse call and the partially built document is discarded.
//! Two behaviors are deliberately tolerant and never produce errors:
//! mismatched closing-tag names and unknown named entities.

use std::fmt;

/// Maximum number of bytes copied into an error's context snippet
pub const CONTEXT_LEN: usize = 16;

/// What went wrong while scanning the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The terminator was reached in the middle of a construct
    UnexpectedEnd,
    /// A structurally required character or token is missing
    Expected(&'static str),
    /// A numeric character reference could not be decoded
    InvalidCharRef(&'static str),
    /// The buffer is too large to be addressed by 32-bit spans
    InputTooLarge,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedEnd => f.write_str("unexpected end of input"),
            ParseErrorKind::Expected(what) => write!(f, "expected {what}"),
            ParseErrorKind::InvalidCharRef(why) => {
                write!(f, "invalid numeric character reference: {why}")
            }
            ParseErrorKind::InputTooLarge => f.write_str("input exceeds 4 GiB"),
        }
    }
}

/// A fatal parse error with the offending position and a short snippet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {position} (near {context:?})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the buffer
    pub position: usize,
    /// Lossy UTF-8 rendering of up to [`CONTEXT_LEN`] bytes at `position`
    pub context: String,
}

impl ParseError {
    /// Build an error, capturing a snippet of `input` at `position`
    pub fn at(kind: ParseErrorKind, input: &[u8], position: usize) -> Self {
        let start = position.min(input.len());
        let tail = &input[start..];
        let end = memchr::memchr(0, tail)
            .unwrap_or(tail.len())
            .min(CONTEXT_LEN);
        ParseError {
            kind,
            position,
            context: String::from_utf8_lossy(&tail[..end]).into_owned(),
        }
    }
}

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid selector at {position}: {message}")]
    Selector { message: String, position: usize },

    #[error("illegal tree operation: {0}")]
    Hierarchy(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the parse error kind, if this is a parse error
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse(e) => Some(e.kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_stops_at_terminator() {
        let err = ParseError::at(ParseErrorKind::UnexpectedEnd, b"<div>abc\0garbage", 5);
        assert_eq!(err.context, "abc");
        assert_eq!(err.position, 5);
    }

    #[test]
    fn test_context_is_bounded() {
        let input = [b'x'; 64];
        let err = ParseError::at(ParseErrorKind::Expected("'>'"), &input, 0);
        assert_eq!(err.context.len(), CONTEXT_LEN);
    }

    #[test]
    fn test_display() {
        let err = ParseError::at(ParseErrorKind::UnexpectedEnd, b"", 0);
        assert!(err.to_string().starts_with("unexpected end of input"));
        let err: Error = err.into();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnexpectedEnd));
    }
}
