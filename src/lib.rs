//! RustyHTML - In-place HTML/XML-like markup parsing
//!
//! Parses a mutable byte buffer into an arena-backed tree without copying
//! text: entity expansion and whitespace condensing rewrite the buffer in
//! place, and every name and value is a span into it.
//!
//! Layers:
//! A: Core parser (chars, scanner, entities, attributes, parser)
//! B: Document tree with an editing API
//! C: Serializer (writer)
//! D: Queries (NodeIndex lookups, CSS selectors with an LRU cache)
//! E: Batch helpers (parallel parse and select), file/stream loading
//!
//! ```
//! use rustyhtml::{Document, ParseOptions};
//!
//! let mut buf = b"<div class=\"a b\" id=\"x\">Hi &amp; bye</div>".to_vec();
//! let doc = Document::parse(&mut buf, ParseOptions::default()).unwrap();
//! let div = doc.select_first("div.a").unwrap().unwrap();
//! assert_eq!(doc.value(div), b"Hi & bye");
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod index;
pub mod loader;
pub mod options;
pub mod parallel;
pub mod selector;
pub mod writer;

pub use dom::{Attribute, Document, Node, NodeId, NodeKind, Span, Text, ROOT};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use index::NodeIndex;
pub use options::ParseOptions;
pub use selector::{SelectorCache, SelectorList};
pub use writer::{to_string, write_node, WriteOptions};
