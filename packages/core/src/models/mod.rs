//! Data Models
//!
//! This module contains the Node Model:
//!
//! - `Node` - Arena entry with type tag, identity, ownership edges and payload
//! - `NodeKey` - Copyable handle into a tree's arena
//! - `NodeFilter` - Type or field-equality condition for collection queries
//! - `IdGenerator` - Per-type id counters
//!
//! The model owns no traversal logic; queries live in [`crate::services`].

mod filter;
mod ids;
mod node;

pub(crate) use node::strip_structural;
pub use filter::NodeFilter;
pub use ids::IdGenerator;
pub use node::{Node, NodeKey};
