//! DOM Module - Arena-based HTML document
//!
//! Implements the parsed tree using:
//! - Arena allocation for nodes, which is also the node registry
//! - NodeId (u32) indices for parent/child links
//! - Spans into the parse buffer for names and values
//! - A string pool for text set through the editing API

pub mod document;
pub mod node;
pub mod span;
pub mod strings;

pub use document::{DescendantIter, Document, ROOT};
pub use node::{Attribute, Node, NodeId, NodeKind};
pub use span::Span;
pub use strings::{StringPool, Text};
