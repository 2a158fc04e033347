//! Character reference expansion and whitespace condensing
//!
//! Text runs and attribute values are rewritten in place: a read cursor
//! walks the run while a write cursor trails it, so the buffer never grows
//! and nothing is allocated. Handles:
//! - The five named references: &amp; &apos; &lt; &gt; &quot;
//! - Numeric character references: &#123; &#x7B; &#X7B;
//! - Collapsing whitespace runs to a single space (when enabled)
//!
//! Any other `&...` sequence is copied through untouched.
//!
//! The output side (`escape`) turns the same five characters back into
//! references for the serializer, using Cow for zero-copy when nothing
//! needs escaping.

use std::borrow::Cow;

use super::chars::{digit_value, is_whitespace, CharClass, RunClass, NOT_A_DIGIT};
use super::scanner::Scanner;
use crate::error::{ParseError, ParseErrorKind};
use crate::options::ParseOptions;

/// Byte at `i`, or 0 past the end
#[inline(always)]
fn byte(buf: &[u8], i: usize) -> u8 {
    buf.get(i).copied().unwrap_or(0)
}

/// Normalize the run starting at the scanner's cursor.
///
/// On return the cursor sits on the byte that ended the run and the
/// returned offset is the logical end of the rewritten text, which is
/// always <= the cursor.
pub fn expand_run<R: RunClass>(scan: &mut Scanner<'_>, opts: &ParseOptions) -> Result<usize, ParseError> {
    let start = scan.position();
    let (src, end) = normalize::<R>(scan.bytes_mut(), start, opts)?;
    scan.set_position(src);
    Ok(end)
}

/// Normalize `buf[start..]` up to the first byte outside `R::Stop`.
///
/// Returns `(read cursor, write cursor)`.
pub fn normalize<R: RunClass>(
    buf: &mut [u8],
    start: usize,
    opts: &ParseOptions,
) -> Result<(usize, usize), ParseError> {
    let mut src = start;

    if opts.is_passthrough() {
        while R::Stop::test(byte(buf, src)) {
            src += 1;
        }
        return Ok((src, src));
    }

    // Nothing before the first special byte needs rewriting
    if opts.normalize_whitespace {
        while R::PureWs::test(byte(buf, src)) {
            src += 1;
        }
    } else {
        while R::Pure::test(byte(buf, src)) {
            src += 1;
        }
    }

    let mut dest = src;
    loop {
        let b = byte(buf, src);
        if !R::Stop::test(b) {
            break;
        }

        if b == b'&' && opts.expand_entities {
            if let Some((consumed, written)) = expand_reference(buf, src, dest, opts)? {
                src += consumed;
                dest += written;
                continue;
            }
        }

        if opts.normalize_whitespace && is_whitespace(b) {
            buf[dest] = b' ';
            dest += 1;
            src += 1;
            while is_whitespace(byte(buf, src)) {
                src += 1;
            }
            continue;
        }

        buf[dest] = b;
        dest += 1;
        src += 1;
    }

    Ok((src, dest))
}

/// Try to expand the reference at `buf[src]` (an `&`) into `buf[dest..]`.
///
/// Returns `(bytes consumed, bytes written)`, or `None` when the sequence is
/// not one we recognize and should be copied verbatim.
#[inline]
fn expand_reference(
    buf: &mut [u8],
    src: usize,
    dest: usize,
    opts: &ParseOptions,
) -> Result<Option<(usize, usize)>, ParseError> {
    let rest = &buf[src + 1..];
    let named = if rest.starts_with(b"amp;") {
        Some((b'&', 5))
    } else if rest.starts_with(b"apos;") {
        Some((b'\'', 6))
    } else if rest.starts_with(b"quot;") {
        Some((b'"', 6))
    } else if rest.starts_with(b"lt;") {
        Some((b'<', 4))
    } else if rest.starts_with(b"gt;") {
        Some((b'>', 4))
    } else {
        None
    };
    if let Some((ch, consumed)) = named {
        buf[dest] = ch;
        return Ok(Some((consumed, 1)));
    }

    if byte(buf, src + 1) != b'#' {
        return Ok(None);
    }

    let (radix, digits_start) = match byte(buf, src + 2) {
        b'x' | b'X' => (16u32, src + 3),
        _ => (10u32, src + 2),
    };

    // Every digit-table byte counts in either radix, and an empty run is 0
    let mut pos = digits_start;
    let mut code: u32 = 0;
    loop {
        let d = digit_value(byte(buf, pos));
        if d == NOT_A_DIGIT {
            break;
        }
        code = code.saturating_mul(radix).saturating_add(u32::from(d));
        pos += 1;
    }

    if byte(buf, pos) != b';' {
        return Err(ParseError::at(
            ParseErrorKind::InvalidCharRef("missing ';'"),
            buf,
            pos,
        ));
    }

    let written = encode_code_point(code, &mut buf[dest..], opts.utf8_output)
        .ok_or_else(|| ParseError::at(ParseErrorKind::InvalidCharRef("code point out of range"), buf, src))?;
    Ok(Some((pos + 1 - src, written)))
}

/// Write `code` at the start of `out`; returns the number of bytes written,
/// or `None` for code points past U+10FFFF in UTF-8 mode.
///
/// The shortest reference (`&#;`) is three bytes and encodes in one; each
/// UTF-8 length threshold needs a longer reference, so `out` always has room.
#[inline]
fn encode_code_point(code: u32, out: &mut [u8], utf8: bool) -> Option<usize> {
    if !utf8 {
        out[0] = code as u8;
        return Some(1);
    }
    if code < 0x80 {
        out[0] = code as u8;
        Some(1)
    } else if code < 0x800 {
        out[0] = 0xC0 | (code >> 6) as u8;
        out[1] = 0x80 | (code & 0x3F) as u8;
        Some(2)
    } else if code < 0x1_0000 {
        out[0] = 0xE0 | (code >> 12) as u8;
        out[1] = 0x80 | ((code >> 6) & 0x3F) as u8;
        out[2] = 0x80 | (code & 0x3F) as u8;
        Some(3)
    } else if code < 0x11_0000 {
        out[0] = 0xF0 | (code >> 18) as u8;
        out[1] = 0x80 | ((code >> 12) & 0x3F) as u8;
        out[2] = 0x80 | ((code >> 6) & 0x3F) as u8;
        out[3] = 0x80 | (code & 0x3F) as u8;
        Some(4)
    } else {
        None
    }
}

// ============================================================================
// Output escaping
// ============================================================================

#[inline]
fn reference_for(b: u8) -> Option<&'static [u8]> {
    match b {
        b'<' => Some(b"&lt;"),
        b'>' => Some(b"&gt;"),
        b'&' => Some(b"&amp;"),
        b'"' => Some(b"&quot;"),
        b'\'' => Some(b"&apos;"),
        _ => None,
    }
}

/// Escape `< > & " '` as references, leaving `keep` as-is.
///
/// Pass `keep = 0` to escape all five. Attribute values keep the quote
/// character that is not used to delimit them.
pub fn escape(input: &[u8], keep: u8) -> Cow<'_, [u8]> {
    let needs = |b: u8| b != keep && reference_for(b).is_some();

    // Fast path: nothing to escape
    let Some(first) = input.iter().position(|&b| needs(b)) else {
        return Cow::Borrowed(input);
    };

    let mut result = Vec::with_capacity(input.len() + 16);
    result.extend_from_slice(&input[..first]);
    for &b in &input[first..] {
        match reference_for(b) {
            Some(reference) if b != keep => result.extend_from_slice(reference),
            _ => result.push(b),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chars::{DoubleQuoted, TextRun};

    fn run(input: &[u8], opts: ParseOptions) -> Result<Vec<u8>, ParseError> {
        let mut buf = input.to_vec();
        let (_, end) = normalize::<TextRun>(&mut buf, 0, &opts)?;
        Ok(buf[..end].to_vec())
    }

    fn expand(input: &[u8]) -> Vec<u8> {
        run(input, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_no_entities() {
        assert_eq!(expand(b"Hello, World!"), b"Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        assert_eq!(
            expand(b"&lt;hello&gt; &amp; &quot;world&quot; &apos;"),
            b"<hello> & \"world\" '"
        );
    }

    #[test]
    fn test_stops_at_tag() {
        let mut buf = b"a &amp; b<tail".to_vec();
        let (src, end) = normalize::<TextRun>(&mut buf, 0, &ParseOptions::default()).unwrap();
        assert_eq!(src, 9);
        assert_eq!(&buf[..end], b"a & b");
        assert_eq!(buf[src], b'<');
    }

    #[test]
    fn test_numeric_decimal() {
        assert_eq!(expand(b"&#65;&#66;&#67;"), b"ABC");
    }

    #[test]
    fn test_numeric_hex_either_case() {
        assert_eq!(expand(b"&#x41;&#X42;&#x6a;"), b"ABj");
    }

    #[test]
    fn test_unicode_reference() {
        let out = expand(b"&#x1F600; &#233;");
        assert_eq!(std::str::from_utf8(&out).unwrap(), "\u{1F600} \u{e9}");
    }

    #[test]
    fn test_single_byte_mode() {
        let opts = ParseOptions::default().with_utf8_output(false);
        assert_eq!(run(b"&#233;", opts).unwrap(), vec![233u8]);
        assert_eq!(run(b"&#x141;", opts).unwrap(), vec![0x41u8]);
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(expand(b"&copy; &unknown; & alone"), b"&copy; &unknown; & alone");
    }

    #[test]
    fn test_missing_semicolon_is_error() {
        let err = run(b"&#65 x", ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCharRef("missing ';'"));
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let err = run(b"&#x110000;", ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCharRef("code point out of range"));
        let err = run(b"&#99999999999999999999;", ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCharRef("code point out of range"));
    }

    #[test]
    fn test_empty_numeric_is_nul() {
        assert_eq!(expand(b"a&#;b"), b"a\0b");
        assert_eq!(expand(b"&#x;"), b"\0");
    }

    #[test]
    fn test_decimal_accumulates_hex_letters() {
        // 1 * 10 + 10
        assert_eq!(expand(b"&#1a;"), &[20u8][..]);
        assert_eq!(expand(b"&#6A;"), b"F");
        let err = run(b"&#6g;", ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCharRef("missing ';'"));
    }

    #[test]
    fn test_condense_whitespace() {
        let opts = ParseOptions::default().with_normalize_whitespace(true);
        assert_eq!(run(b"a \t\r\n b  c", opts).unwrap(), b"a b c");
        assert_eq!(run(b"   lead", opts).unwrap(), b" lead");
    }

    #[test]
    fn test_passthrough_leaves_buffer_alone() {
        let mut buf = b"&amp;  x<".to_vec();
        let (src, end) = normalize::<TextRun>(&mut buf, 0, &ParseOptions::raw()).unwrap();
        assert_eq!((src, end), (8, 8));
        assert_eq!(buf, b"&amp;  x<");
    }

    #[test]
    fn test_attribute_run_stops_at_quote() {
        let mut buf = b"a&lt;b\" rest".to_vec();
        let (src, end) = normalize::<DoubleQuoted>(&mut buf, 0, &ParseOptions::default()).unwrap();
        assert_eq!(buf[src], b'"');
        assert_eq!(&buf[..end], b"a<b");
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape(b"plain", 0), Cow::Borrowed(_)));
        assert_eq!(
            escape(b"<hello> & \"world\"", 0).as_ref(),
            b"&lt;hello&gt; &amp; &quot;world&quot;"
        );
        assert_eq!(escape(b"it's \"x\"", b'"').as_ref(), b"it&apos;s \"x\"");
        assert!(matches!(escape(b"it's", b'\''), Cow::Borrowed(_)));
    }
}
