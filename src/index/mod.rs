//! Node Index Module
//!
//! Lookup tables built by one traversal of a finished tree:
//!
//! - **id → node**: last occurrence wins
//! - **class → nodes**
//! - **attribute name → (node, value)**
//! - **name → nodes** (element type, PI target)
//!
//! Keys and values borrow from the document, so building an index copies
//! no strings. The index is a snapshot: after editing the tree, build a
//! new one.

pub mod node_index;

pub use node_index::NodeIndex;
