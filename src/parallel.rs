//! Parallel batch operations
//!
//! Uses Rayon to fan out work that is independent per item:
//! - `parse_many`: parse several buffers at once, one document each
//! - `select_many`: evaluate several selectors against one document
//!
//! Each parse owns its buffer and options, so no state is shared between
//! the workers.

use rayon::prelude::*;

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::error::Result;
use crate::options::ParseOptions;

/// Parse every buffer in parallel, keeping input order
pub fn parse_many<'a>(buffers: &'a mut [Vec<u8>], options: &ParseOptions) -> Vec<Result<Document<'a>>> {
    let options = *options;
    buffers
        .par_iter_mut()
        .map(|buf| Document::parse(buf.as_mut_slice(), options))
        .collect()
}

/// Evaluate every selector in parallel against `doc`, keeping input order
pub fn select_many(doc: &Document<'_>, selectors: &[&str]) -> Vec<Result<Vec<NodeId>>> {
    selectors.par_iter().map(|selector| doc.select(selector)).collect()
}
