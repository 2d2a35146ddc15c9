//! Hierarchy Module - Goal, criteria and alternatives as a validated arena.
//!
//! # Components
//!
//! - `HierarchyNode` / `NodeKind` - Plain node records from the hierarchy store
//! - `Hierarchy` - Validated arena with navigation and comparison counting
//! - `HierarchyError` - Structural defects, rejected before any computation

mod errors;
mod node;
mod tree;

pub use errors::HierarchyError;
pub use node::{HierarchyNode, NodeKind};
pub use tree::{pair_count, Hierarchy};

#[cfg(test)]
pub(crate) use tree::fixtures;
