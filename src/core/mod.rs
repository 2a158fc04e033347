//! Core parsing primitives
//!
//! The building blocks the parser drives, leaves first:
//! - Chars: per-byte lookup tables for every scanning context
//! - Scanner: cursor over the mutable buffer, memchr-accelerated searches
//! - Entities: in-place reference expansion and whitespace condensing
//! - Attributes: attribute list parsing
//! - Parser: recursive-descent tree builder

pub mod attributes;
pub mod chars;
pub mod entities;
pub mod parser;
pub mod scanner;
