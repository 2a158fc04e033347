//! Serializer
//!
//! Walks a finished tree and writes markup. Two APIs:
//! - `write_node()`: streams into any `impl Write`
//! - `to_string()`: convenience wrapper returning a `String`
//!
//! The tree is only read, never modified.

use std::io::{self, Write};

use tracing::debug;

use crate::core::entities::escape;
use crate::dom::document::Document;
use crate::dom::node::{NodeId, NodeKind};

/// Serializer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Put each node on its own line, indented with tabs by depth
    pub indent: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions { indent: true }
    }
}

impl WriteOptions {
    /// Everything on one line
    pub fn compact() -> Self {
        WriteOptions { indent: false }
    }
}

/// Serialize `id` and its subtree into a string
pub fn to_string(doc: &Document<'_>, id: NodeId, opts: &WriteOptions) -> String {
    let mut out = Vec::new();
    if let Err(e) = write_node(&mut out, doc, id, opts) {
        // Only reachable through a failing writer, and a Vec never fails
        debug!(error = %e, "serializing into memory failed");
    }
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Serialize `id` and its subtree into `out`
pub fn write_node<W: Write>(out: &mut W, doc: &Document<'_>, id: NodeId, opts: &WriteOptions) -> io::Result<()> {
    Printer { out, doc, indent: opts.indent }.run(id)
}

/// Pending work for the printer. Closing tags are queued beneath an
/// element's children so they come out after them.
enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

struct Printer<'w, 'd, 'a, W: Write> {
    out: &'w mut W,
    doc: &'d Document<'a>,
    indent: bool,
}

impl<W: Write> Printer<'_, '_, '_, W> {
    fn run(&mut self, id: NodeId) -> io::Result<()> {
        let mut stack = vec![Step::Open(id, 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id, depth) => self.open(id, depth, &mut stack)?,
                Step::Close(id, depth) => {
                    self.tabs(depth)?;
                    self.out.write_all(b"</")?;
                    self.out.write_all(self.doc.name(id))?;
                    self.out.write_all(b">")?;
                    self.newline()?;
                }
            }
        }
        Ok(())
    }

    fn open(&mut self, id: NodeId, depth: usize, stack: &mut Vec<Step>) -> io::Result<()> {
        let doc = self.doc;
        let Some(kind) = doc.kind(id) else {
            return Ok(());
        };

        match kind {
            NodeKind::VoidElement | NodeKind::TextElement | NodeKind::Element => {
                return self.element(id, kind, depth, stack);
            }
            NodeKind::Data => {
                self.tabs(depth)?;
                self.out.write_all(&escape(doc.value(id), 0))?;
            }
            NodeKind::CData => self.wrapped(depth, b"<![CDATA[", doc.value(id), b"]]>")?,
            NodeKind::Comment => self.wrapped(depth, b"<!--", doc.value(id), b"-->")?,
            NodeKind::Doctype => self.wrapped(depth, b"<!DOCTYPE ", doc.value(id), b">")?,
            NodeKind::ProcessingInstruction => {
                self.tabs(depth)?;
                self.out.write_all(b"<?")?;
                self.out.write_all(doc.name(id))?;
                self.out.write_all(b" ")?;
                self.out.write_all(doc.value(id))?;
                self.out.write_all(b"?>")?;
            }
            NodeKind::Declaration => {
                self.tabs(depth)?;
                self.out.write_all(b"<?xml")?;
                self.attributes(id)?;
                self.out.write_all(b"?>")?;
            }
            // The document itself has no markup and no line of its own
            NodeKind::Document => {
                self.push_children(id, depth, stack);
                return Ok(());
            }
        }
        self.newline()
    }

    fn element(&mut self, id: NodeId, kind: NodeKind, depth: usize, stack: &mut Vec<Step>) -> io::Result<()> {
        let doc = self.doc;
        let name = doc.name(id);
        self.tabs(depth)?;
        self.out.write_all(b"<")?;
        self.out.write_all(name)?;
        self.attributes(id)?;

        if kind == NodeKind::VoidElement {
            self.out.write_all(b">")?;
            return self.newline();
        }

        let value = doc.value(id);
        let children = doc.children(id);
        if value.is_empty() && children.is_empty() {
            self.out.write_all(b"/>")?;
            return self.newline();
        }

        self.out.write_all(b">")?;
        if kind == NodeKind::TextElement {
            self.out.write_all(value)?;
        } else {
            self.out.write_all(&escape(value, 0))?;
        }

        if children.is_empty() {
            self.out.write_all(b"</")?;
            self.out.write_all(name)?;
            self.out.write_all(b">")?;
            return self.newline();
        }

        self.newline()?;
        stack.push(Step::Close(id, depth));
        self.push_children(id, depth + 1, stack);
        Ok(())
    }

    /// `id`, then `class`, then the remaining attributes in order
    fn attributes(&mut self, id: NodeId) -> io::Result<()> {
        let doc = self.doc;
        let node_id = doc.id(id);
        if !node_id.is_empty() {
            self.out.write_all(b" id=")?;
            self.quoted(node_id)?;
        }

        let classes = doc.classes(id).collect::<Vec<_>>().join(&b' ');
        if !classes.is_empty() {
            self.out.write_all(b" class=")?;
            self.quoted(&classes)?;
        }

        for (name, value) in doc.attributes(id) {
            if name.is_empty() || name == b"id" {
                continue;
            }
            self.out.write_all(b" ")?;
            self.out.write_all(name)?;
            if value.is_empty() {
                continue;
            }
            self.out.write_all(b"=")?;
            self.quoted(value)?;
        }
        Ok(())
    }

    /// Single quotes when the value holds `"`, double quotes otherwise
    fn quoted(&mut self, value: &[u8]) -> io::Result<()> {
        if memchr::memchr(b'"', value).is_some() {
            self.out.write_all(b"'")?;
            self.out.write_all(&escape(value, b'"'))?;
            self.out.write_all(b"'")
        } else {
            self.out.write_all(b"\"")?;
            self.out.write_all(&escape(value, b'\''))?;
            self.out.write_all(b"\"")
        }
    }

    /// Queue the children of `id` in document order. Children of `html`
    /// start over at column 0.
    fn push_children(&self, id: NodeId, depth: usize, stack: &mut Vec<Step>) {
        let doc = self.doc;
        let depth = if doc.name(id) == b"html" { 0 } else { depth };
        stack.extend(doc.children(id).iter().rev().map(|&child| Step::Open(child, depth)));
    }

    fn wrapped(&mut self, depth: usize, open: &[u8], value: &[u8], close: &[u8]) -> io::Result<()> {
        self.tabs(depth)?;
        self.out.write_all(open)?;
        self.out.write_all(value)?;
        self.out.write_all(close)
    }

    #[inline]
    fn newline(&mut self) -> io::Result<()> {
        if self.indent {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    #[inline]
    fn tabs(&mut self, depth: usize) -> io::Result<()> {
        if self.indent {
            for _ in 0..depth {
                self.out.write_all(b"\t")?;
            }
        }
        Ok(())
    }
}
