//! Tree Services
//!
//! This module contains the operations over the node model:
//!
//! - `Tree` - Arena that constructs nodes, grows children and projects JSON
//! - Traversal & query engine - lineage, sibling and linear-order queries on `Tree`
//! - `NodeRef` - Borrowed cursor exposing the queries in method form
//! - `TreeError` - Errors raised by construction and configuration

pub mod error;
mod node_ref;
mod traversal;
mod tree;

pub use error::{Result, TreeError};
pub use node_ref::NodeRef;
pub use tree::{AddInput, Tree};
