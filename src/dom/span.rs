//! Span - offset and length into a byte buffer
//!
//! Zero-copy reference to a portion of the parse buffer (or of the
//! document's string pool). Used for names, values, ids and classes.

/// A span referencing a portion of a buffer.
///
/// Size: 8 bytes (offset: 4 bytes, len: 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct Span {
    /// Byte offset into the buffer
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

impl Span {
    #[inline]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create an empty span (used for "no value")
    #[inline]
    pub const fn empty() -> Self {
        Self { offset: 0, len: 0 }
    }

    /// Span covering `start..end`; callers guarantee both fit in `u32`
    #[inline]
    pub fn from_range(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            offset: start as u32,
            len: (end - start) as u32,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset (exclusive)
    #[inline]
    pub const fn end(&self) -> u32 {
        self.offset.saturating_add(self.len)
    }

    /// Extract the byte slice from the buffer
    #[inline]
    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        let start = self.offset as usize;
        let end = start.saturating_add(self.len as usize);
        if end <= buf.len() {
            &buf[start..end]
        } else {
            &[]
        }
    }

    /// Extract as UTF-8 string from the buffer
    #[inline]
    pub fn as_str<'a>(&self, buf: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(buf)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let input = b"<p class=\"lead\">";
        let span = Span::new(10, 4);
        assert_eq!(span.slice(input), b"lead");
        assert_eq!(span.as_str(input), Some("lead"));
        assert_eq!(span.end(), 14);
    }

    #[test]
    fn test_from_range() {
        let span = Span::from_range(3, 7);
        assert_eq!(span, Span::new(3, 4));
        assert!(Span::from_range(5, 5).is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let span = Span::new(10, 5);
        assert_eq!(span.slice(b"short"), b"");
    }
}
