//! Attribute list parsing
//!
//! Reads `name`, `name="value"` and `name='value'` pairs in place. Names
//! are lowercased; values run through the normalizer. `id` is mirrored
//! into the node id, `class` is split into class tokens instead of being
//! stored, and duplicate names keep the last value.

use super::chars::{is_whitespace, AttributeName, CharClass, DoubleQuoted, SingleQuoted, Whitespace};
use super::entities::expand_run;
use super::scanner::Scanner;
use crate::dom::document::upsert_attribute;
use crate::dom::node::{Attribute, Node};
use crate::dom::span::Span;
use crate::dom::strings::Text;
use crate::error::ParseError;
use crate::options::ParseOptions;

/// Parse attributes until the first byte that cannot start a name.
///
/// Leaves the cursor on that byte (`>`, `/`, `?` or the terminator).
pub fn parse_attributes(scan: &mut Scanner<'_>, node: &mut Node, opts: &ParseOptions) -> Result<(), ParseError> {
    while AttributeName::test(scan.peek()) {
        let name_start = scan.position();
        let name_end = scan.skip::<AttributeName>();
        scan.lowercase(name_start, name_end);
        let name = Span::from_range(name_start, name_end);
        let (is_id, is_class) = match scan.slice(name_start, name_end) {
            b"id" => (true, false),
            b"class" => (false, true),
            _ => (false, false),
        };

        scan.skip::<Whitespace>();

        // Boolean attribute
        if scan.peek() != b'=' {
            if is_id || is_class {
                return Err(scan.expected("'='"));
            }
            insert(scan, node, name, Text::EMPTY);
            continue;
        }
        scan.advance(1); // Skip '='
        scan.skip::<Whitespace>();

        let quote = scan.peek();
        if quote != b'"' && quote != b'\'' {
            return Err(scan.expected("quote"));
        }
        scan.advance(1);

        let value_start = scan.position();
        let value_end = if quote == b'"' {
            expand_run::<DoubleQuoted>(scan, opts)?
        } else {
            expand_run::<SingleQuoted>(scan, opts)?
        };
        if scan.peek() != quote {
            return Err(scan.expected("closing quote"));
        }
        scan.advance(1);

        let value = Text::Input(Span::from_range(value_start, value_end));
        if is_id {
            node.id = value;
            insert(scan, node, name, value);
        } else if is_class {
            add_classes(scan, node, value_start, value_end);
        } else {
            insert(scan, node, name, value);
        }

        scan.skip::<Whitespace>();
    }
    Ok(())
}

/// Insert or overwrite an attribute, matching names by content
fn insert(scan: &Scanner<'_>, node: &mut Node, name: Span, value: Text) {
    let name_bytes = scan.span(name);
    upsert_attribute(
        &mut node.attributes,
        Attribute { name: Text::Input(name), value },
        |t| matches!(t, Text::Input(span) if scan.span(span) == name_bytes),
    );
}

/// Split `start..end` on whitespace into class tokens, skipping duplicates
fn add_classes(scan: &Scanner<'_>, node: &mut Node, start: usize, end: usize) {
    let mut pos = start;
    while pos < end {
        while pos < end && is_whitespace(scan.byte_at(pos)) {
            pos += 1;
        }
        let token_start = pos;
        while pos < end && !is_whitespace(scan.byte_at(pos)) {
            pos += 1;
        }
        if pos == token_start {
            break;
        }

        let token = scan.slice(token_start, pos);
        let exists = node.classes.iter().any(|t| match t {
            Text::Input(span) => scan.span(*span) == token,
            Text::Pool(_) => false,
        });
        if !exists {
            node.classes.push(Text::Input(Span::from_range(token_start, pos)));
        }
    }
}
