//! CSS Selectors
//!
//! Selector support for querying a document:
//! - Combinators: descendant, `>`, `~`, `+`, `||` and `,` lists
//! - Type, universal, class, id and attribute selectors (all seven
//!   operators, optional ` i` flag)
//! - `:is()`, `:where()`, `:not()`, `:has()`, plus `:root`,
//!   `:first-child`, `:last-child` and `:empty`
//! - LRU cache of parsed selectors
//!
//! The column combinator, other pseudo-classes and pseudo-elements parse
//! but never match, since the tree carries no layout or state.

pub mod cache;
pub mod lexer;
pub mod matcher;
pub mod parser;

pub use cache::SelectorCache;
pub use parser::SelectorList;

use crate::dom::document::Document;
use crate::dom::node::NodeId;
use crate::error::Result;

impl Document<'_> {
    /// Elements matching a CSS selector, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>> {
        Ok(SelectorList::parse(selector)?.select(self))
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.select(selector)?.into_iter().next())
    }
}
