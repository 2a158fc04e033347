//! Cursor over the mutable parse buffer
//!
//! The buffer ends at the first NUL byte or at the end of the slice,
//! whichever comes first. `peek` returns 0 in both cases, so scanning
//! loops never need a separate bounds check.
//!
//! Delimiter searches use memchr for SIMD acceleration:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memmem};

use super::chars::CharClass;
use crate::dom::span::Span;
use crate::error::{ParseError, ParseErrorKind};

/// Scanner over a buffer that the parser is allowed to rewrite in place
pub struct Scanner<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Scanner { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Current byte, or 0 at the terminator
    #[inline(always)]
    pub fn peek(&self) -> u8 {
        self.buf.get(self.pos).copied().unwrap_or(0)
    }

    /// Byte at `offset` from the cursor, or 0 past the end of the slice
    #[inline(always)]
    pub fn peek_at(&self, offset: usize) -> u8 {
        self.buf.get(self.pos + offset).copied().unwrap_or(0)
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.peek() == 0
    }

    #[inline(always)]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Advance while the current byte belongs to `C`; returns the new position
    #[inline]
    pub fn skip<C: CharClass>(&mut self) -> usize {
        while C::test(self.peek()) {
            self.pos += 1;
        }
        self.pos
    }

    /// Check if the buffer holds `needle` at the cursor
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.buf
            .get(self.pos..)
            .map_or(false, |rest| rest.starts_with(needle))
    }

    /// ASCII case-insensitive variant of [`Scanner::starts_with`]
    #[inline]
    pub fn starts_with_ignore_case(&self, needle: &[u8]) -> bool {
        match self.buf.get(self.pos..self.pos + needle.len()) {
            Some(window) => window.eq_ignore_ascii_case(needle),
            None => false,
        }
    }

    /// Bytes from the cursor up to (not including) the terminator
    #[inline]
    fn live(&self) -> &[u8] {
        let rest = self.buf.get(self.pos..).unwrap_or(&[]);
        let end = memchr(0, rest).unwrap_or(rest.len());
        &rest[..end]
    }

    /// Absolute position of the next `needle` before the terminator
    #[inline]
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.live(), needle).map(|i| self.pos + i)
    }

    /// Absolute position of the next `byte` before the terminator
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.live()).map(|i| self.pos + i)
    }

    /// Move the cursor onto the terminator
    #[inline]
    pub fn skip_to_end(&mut self) {
        self.pos += self.live().len();
    }

    /// Lowercase `start..end` in place
    #[inline]
    pub fn lowercase(&mut self, start: usize, end: usize) {
        self.buf[start..end].make_ascii_lowercase();
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.buf[start..end]
    }

    #[inline]
    pub fn span(&self, span: Span) -> &[u8] {
        span.slice(&*self.buf)
    }

    /// Byte at an absolute position, or 0 past the end
    #[inline(always)]
    pub fn byte_at(&self, pos: usize) -> u8 {
        self.buf.get(pos).copied().unwrap_or(0)
    }

    /// Mutable access for in-place compaction
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }

    /// Build an error at the cursor
    #[cold]
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(kind, &*self.buf, self.pos)
    }

    /// "unexpected end" at the terminator, otherwise `Expected(what)`
    #[cold]
    pub fn expected(&self, what: &'static str) -> ParseError {
        if self.at_end() {
            self.error(ParseErrorKind::UnexpectedEnd)
        } else {
            self.error(ParseErrorKind::Expected(what))
        }
    }

    /// Give up write access, keeping the buffer borrowed for views
    #[inline]
    pub fn into_input(self) -> &'a [u8] {
        self.buf
    }
}
