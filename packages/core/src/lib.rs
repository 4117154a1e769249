//! Protonode Core
//!
//! Typed hierarchical nodes: every node carries a type tag, adopts children
//! through its shape's default child constructor, and answers lineage
//! queries without holding cyclic references.
//!
//! # Architecture
//!
//! - **Arena tree**: nodes live in a flat arena; `parent` is a key, never serialized
//! - **Shapes**: derived node kinds with a default type, a default child shape and
//!   overridable behaviour hooks
//! - **Pure queries**: ancestor, descendant, sibling and prev/next resolution never fail
//!
//! # Modules
//!
//! - [`models`] - Node model (Node, NodeKey, NodeFilter, IdGenerator)
//! - [`behaviors`] - Shape derivation and behaviour hooks
//! - [`services`] - Tree arena, traversal engine and errors
//! - [`config`] - Tree configuration
//!
//! # Example
//!
//! ```rust
//! use protonode_core::{ShapeDef, ShapeId, ShapeRegistry, Tree};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let mut shapes = ShapeRegistry::new();
//! let leaf = shapes.derive(ShapeId::BASE, ShapeDef::new().with_type("leaf"))?;
//! let branch = shapes.derive(ShapeId::BASE, ShapeDef::new().with_type("branch").with_child(leaf))?;
//!
//! let mut tree = Tree::new(Arc::new(shapes));
//! let root = tree.create_root(branch, json!({"name": "trunk"}))?;
//! let first = tree.add(root, json!({"name": "first"}))?;
//!
//! assert!(tree.is(first, "leaf"));
//! assert_eq!(tree.next(first), root);
//! # Ok::<(), protonode_core::TreeError>(())
//! ```

pub mod behaviors;
pub mod config;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use behaviors::{BaseBehavior, NodeBehavior, ShapeDef, ShapeId, ShapeRegistry};
pub use config::TreeConfig;
pub use models::{IdGenerator, Node, NodeFilter, NodeKey};
pub use services::{AddInput, NodeRef, Result, Tree, TreeError};
