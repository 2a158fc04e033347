//! Tree-building parser
//!
//! One forward pass over the mutable buffer with a few bytes of lookahead
//! and an explicit stack of open elements, so nesting depth never touches
//! the call stack. Each construct is recognized from the bytes after `<`:
//! - `?xml` + whitespace: declaration, parameters stored as attributes
//! - `?`: processing instruction
//! - `!--`, `![CDATA[`, `!DOCTYPE` + whitespace: raw-content nodes
//! - any other `!`: skipped up to the next `>`, no node
//! - anything else: an element
//!
//! Text runs go through the normalizer, which compacts them in place, so
//! every node's name and value are plain spans into the same buffer.

use tracing::{debug, trace};

use super::attributes::parse_attributes;
use super::chars::{is_whitespace, CharClass, NodeName, TextRun, Whitespace};
use super::entities::expand_run;
use super::scanner::Scanner;
use crate::dom::document::{Document, ROOT};
use crate::dom::node::{Node, NodeId, NodeKind};
use crate::dom::span::Span;
use crate::dom::strings::Text;
use crate::error::{ParseError, ParseErrorKind};
use crate::options::ParseOptions;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parse `buf` into a document whose views borrow the rewritten buffer.
///
/// Parsing stops at the first NUL byte or the end of the slice. Any error
/// aborts the whole parse; the partial tree is dropped.
pub fn parse<'a>(buf: &'a mut [u8], opts: &ParseOptions) -> Result<Document<'a>, ParseError> {
    if buf.len() > u32::MAX as usize {
        return Err(ParseError::at(ParseErrorKind::InputTooLarge, buf, 0));
    }
    debug!(len = buf.len(), ?opts, "parsing document");

    let mut parser = Parser {
        scan: Scanner::new(buf),
        doc: Document::new(),
        opts: *opts,
    };
    parser.parse_document()?;

    let Parser { scan, mut doc, .. } = parser;
    doc.input = scan.into_input();
    debug!(nodes = doc.node_count(), "parsed document");
    Ok(doc)
}

/// Per-parse state. Options live here, never in shared storage
struct Parser<'a> {
    scan: Scanner<'a>,
    doc: Document<'a>,
    opts: ParseOptions,
}

/// What one `<...>` construct produced
enum Markup {
    /// A complete node
    Node(NodeId),
    /// An element whose children and closing tag follow
    Open(NodeId),
    /// Nothing, for skipped declarations
    Skipped,
}

impl<'a> Parser<'a> {
    fn parse_document(&mut self) -> Result<(), ParseError> {
        if self.scan.starts_with(UTF8_BOM) {
            self.scan.advance(UTF8_BOM.len());
        }

        let mut open: Vec<NodeId> = vec![ROOT];
        while let Some(&parent) = open.last() {
            let contents_start = self.scan.position();
            self.scan.skip::<Whitespace>();
            let top_level = parent == ROOT;

            match self.scan.peek() {
                0 if top_level => return Ok(()),
                0 => return Err(self.scan.error(ParseErrorKind::UnexpectedEnd)),
                b'<' if !top_level && self.scan.peek_at(1) == b'/' => {
                    self.scan.advance(2);
                    self.parse_closing_tag(parent)?;
                    open.pop();
                }
                b'<' => {
                    self.scan.advance(1);
                    match self.parse_node()? {
                        Markup::Node(child) => self.doc.link_child(parent, child),
                        Markup::Open(child) => {
                            self.doc.link_child(parent, child);
                            open.push(child);
                        }
                        Markup::Skipped => {}
                    }
                }
                _ if top_level => return Err(self.scan.error(ParseErrorKind::Expected("'<'"))),
                _ => self.parse_data(parent, contents_start)?,
            }
        }
        Ok(())
    }

    /// Parse one construct; the cursor is just past its `<`
    fn parse_node(&mut self) -> Result<Markup, ParseError> {
        match self.scan.peek() {
            b'?' => {
                self.scan.advance(1);
                if self.scan.starts_with_ignore_case(b"xml") && is_whitespace(self.scan.peek_at(3)) {
                    self.scan.advance(4);
                    self.parse_declaration().map(Markup::Node)
                } else {
                    self.parse_pi().map(Markup::Node)
                }
            }
            b'!' => self.parse_bang_markup(),
            _ => self.parse_element(),
        }
    }

    fn parse_bang_markup(&mut self) -> Result<Markup, ParseError> {
        if self.scan.starts_with(b"!--") {
            self.scan.advance(3);
            return self.parse_raw(NodeKind::Comment, b"-->").map(Markup::Node);
        }
        if self.scan.starts_with(b"![CDATA[") {
            self.scan.advance(8);
            return self.parse_raw(NodeKind::CData, b"]]>").map(Markup::Node);
        }
        if self.scan.starts_with_ignore_case(b"!DOCTYPE") && is_whitespace(self.scan.peek_at(8)) {
            self.scan.advance(9);
            return self.parse_doctype().map(Markup::Node);
        }

        // Unrecognized <!...>: skip it
        let start = self.scan.position();
        match self.scan.find_byte(b'>') {
            Some(end) => {
                trace!(
                    markup = %String::from_utf8_lossy(self.scan.slice(start, end)),
                    "skipping unrecognized declaration"
                );
                self.scan.set_position(end + 1);
                Ok(Markup::Skipped)
            }
            None => {
                self.scan.skip_to_end();
                Err(self.scan.error(ParseErrorKind::UnexpectedEnd))
            }
        }
    }

    /// Node whose value is everything up to `terminator`, verbatim
    fn parse_raw(&mut self, kind: NodeKind, terminator: &[u8]) -> Result<NodeId, ParseError> {
        let start = self.scan.position();
        let Some(end) = self.scan.find(terminator) else {
            self.scan.skip_to_end();
            return Err(self.scan.error(ParseErrorKind::UnexpectedEnd));
        };
        self.scan.set_position(end + terminator.len());

        let mut node = Node::new(kind);
        node.value = Text::Input(Span::from_range(start, end));
        Ok(self.doc.push(node))
    }

    /// Doctype up to its closing `>`. Bracketed internal subsets are
    /// skipped by depth counting, so `>` inside them does not end it.
    fn parse_doctype(&mut self) -> Result<NodeId, ParseError> {
        let start = self.scan.position();
        let mut depth = 0usize;
        loop {
            match self.scan.peek() {
                0 => return Err(self.scan.error(ParseErrorKind::UnexpectedEnd)),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => break,
                _ => {}
            }
            self.scan.advance(1);
        }
        let end = self.scan.position();
        self.scan.advance(1); // Skip '>'

        let mut node = Node::new(NodeKind::Doctype);
        node.value = Text::Input(Span::from_range(start, end));
        Ok(self.doc.push(node))
    }

    fn parse_pi(&mut self) -> Result<NodeId, ParseError> {
        let name_start = self.scan.position();
        let name_end = self.scan.skip::<NodeName>();
        if name_end == name_start {
            return Err(self.scan.expected("PI target"));
        }
        self.scan.skip::<Whitespace>();

        let mut node = Node::new(NodeKind::ProcessingInstruction);
        node.name = Text::Input(Span::from_range(name_start, name_end));

        let value_start = self.scan.position();
        let Some(value_end) = self.scan.find(b"?>") else {
            self.scan.skip_to_end();
            return Err(self.scan.error(ParseErrorKind::UnexpectedEnd));
        };
        node.value = Text::Input(Span::from_range(value_start, value_end));
        self.scan.set_position(value_end + 2);
        Ok(self.doc.push(node))
    }

    fn parse_declaration(&mut self) -> Result<NodeId, ParseError> {
        let mut node = Node::new(NodeKind::Declaration);
        self.scan.skip::<Whitespace>();
        parse_attributes(&mut self.scan, &mut node, &self.opts)?;

        if !self.scan.starts_with(b"?>") {
            return Err(self.scan.expected("'?>'"));
        }
        self.scan.advance(2);
        Ok(self.doc.push(node))
    }

    /// Element start tag. Normal elements opened with `>` come back as
    /// [`Markup::Open`]; their contents are parsed by the caller.
    fn parse_element(&mut self) -> Result<Markup, ParseError> {
        let name_start = self.scan.position();
        let name_end = self.scan.skip::<NodeName>();
        if name_end == name_start {
            return Err(self.scan.expected("element name"));
        }
        self.scan.lowercase(name_start, name_end);
        let kind = NodeKind::for_element(self.scan.slice(name_start, name_end));

        let mut node = Node::new(kind);
        node.name = Text::Input(Span::from_range(name_start, name_end));

        self.scan.skip::<Whitespace>();
        parse_attributes(&mut self.scan, &mut node, &self.opts)?;
        let id = self.doc.push(node);

        match self.scan.peek() {
            b'>' => {
                self.scan.advance(1);
                match kind {
                    NodeKind::VoidElement => Ok(Markup::Node(id)),
                    NodeKind::TextElement => {
                        self.parse_text_only(id)?;
                        Ok(Markup::Node(id))
                    }
                    _ => Ok(Markup::Open(id)),
                }
            }
            b'/' => {
                self.scan.advance(1);
                if self.scan.peek() != b'>' {
                    return Err(self.scan.expected("'>'"));
                }
                self.scan.advance(1);
                Ok(Markup::Node(id))
            }
            _ => Err(self.scan.expected("'>'")),
        }
    }

    /// One text run. Only the first run of an element is kept as its value
    fn parse_data(&mut self, parent: NodeId, contents_start: usize) -> Result<(), ParseError> {
        if !self.opts.trim_whitespace {
            self.scan.set_position(contents_start);
        }

        let start = self.scan.position();
        let mut end = expand_run::<TextRun>(&mut self.scan, &self.opts)?;

        // Leading whitespace was already skipped
        if self.opts.trim_whitespace {
            if self.opts.normalize_whitespace {
                if end > start && self.scan.byte_at(end - 1) == b' ' {
                    end -= 1;
                }
            } else {
                while end > start && is_whitespace(self.scan.byte_at(end - 1)) {
                    end -= 1;
                }
            }
        }

        let node = &mut self.doc.nodes[parent as usize];
        if node.value.is_empty() {
            node.value = Text::Input(Span::from_range(start, end));
        }
        Ok(())
    }

    /// Raw content of a script-like element, up to a closing tag whose
    /// name matches case-insensitively
    fn parse_text_only(&mut self, id: NodeId) -> Result<(), ParseError> {
        let name = match self.doc.nodes[id as usize].name {
            Text::Input(span) => span,
            Text::Pool(_) => Span::empty(),
        };
        let start = self.scan.position();

        loop {
            let Some(lt) = self.scan.find(b"</") else {
                self.scan.skip_to_end();
                return Err(self.scan.error(ParseErrorKind::UnexpectedEnd));
            };
            let candidate = lt + 2;
            self.scan.set_position(candidate);

            let name_end = candidate + name.len as usize;
            if name_end <= self.scan.len()
                && self.scan.slice(candidate, name_end).eq_ignore_ascii_case(self.scan.span(name))
                && !NodeName::test(self.scan.byte_at(name_end))
            {
                if lt > start {
                    let node = &mut self.doc.nodes[id as usize];
                    if node.value.is_empty() {
                        node.value = Text::Input(Span::from_range(start, lt));
                    }
                }
                return self.parse_closing_tag(id);
            }
        }
    }

    /// `</name>` with the cursor past `</`. The name is not validated.
    fn parse_closing_tag(&mut self, parent: NodeId) -> Result<(), ParseError> {
        let name_start = self.scan.position();
        let name_end = self.scan.skip::<NodeName>();

        if let Text::Input(open) = self.doc.nodes[parent as usize].name {
            let close = self.scan.slice(name_start, name_end);
            if !close.eq_ignore_ascii_case(self.scan.span(open)) {
                trace!(
                    open = %String::from_utf8_lossy(self.scan.span(open)),
                    close = %String::from_utf8_lossy(close),
                    "mismatched closing tag"
                );
            }
        }

        self.scan.skip::<Whitespace>();
        if self.scan.peek() != b'>' {
            return Err(self.scan.expected("'>'"));
        }
        self.scan.advance(1);
        Ok(())
    }
}
