//! Node Data Structures
//!
//! This module defines the arena entry stored for every node in a [`Tree`]
//! and the copyable [`NodeKey`] handle used to address it.
//!
//! # Architecture
//!
//! - **Arena storage**: a tree owns a flat `Vec<Node>`; edges are keys, not pointers
//! - **Owning direction**: `children` is the only edge walked by projection
//! - **Back-reference**: `parent` is a plain key and never serialized
//! - **Payload**: everything that is not structural lives in `fields`
//!
//! [`Tree`]: crate::services::Tree

use crate::behaviors::ShapeId;
use serde_json::{Map, Value};
use std::fmt;

/// Handle to a node inside a single [`Tree`](crate::services::Tree) arena
///
/// Keys are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    /// Create a key from an arena slot
    pub const fn new(slot: usize) -> Self {
        NodeKey(slot)
    }

    /// Get the arena slot
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeKey({})", self.0)
    }
}

impl From<usize> for NodeKey {
    fn from(slot: usize) -> Self {
        NodeKey(slot)
    }
}

/// A single node of a tree
///
/// # Fields
///
/// - `id`: process-unique identifier, `{type}:{n}` with a per-type counter
/// - `node_type`: immutable type tag used by every type-filtered query
/// - `index`: position among siblings at insertion time (roots get 0)
/// - `shape`: the shape this node was constructed with
/// - `parent`: owning node, `None` for a root
/// - `children`: owned children in insertion order
/// - `fields`: payload supplied at construction, minus structural keys
///
/// Construction goes through [`Tree::create_root`] and [`Tree::add`], and only
/// [`Tree::adopt`] moves a node, so `parent` and `children` can only ever
/// describe an acyclic tree.
///
/// [`Tree::create_root`]: crate::services::Tree::create_root
/// [`Tree::add`]: crate::services::Tree::add
/// [`Tree::adopt`]: crate::services::Tree::adopt
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) node_type: String,
    pub(crate) index: usize,
    pub(crate) shape: ShapeId,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) fields: Map<String, Value>,
}

impl Node {
    pub(crate) fn new(
        id: String,
        node_type: String,
        index: usize,
        shape: ShapeId,
        parent: Option<NodeKey>,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            node_type,
            index,
            shape,
            parent,
            children: Vec::new(),
            fields,
        }
    }

    /// Unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type tag (e.g., "family", "Kingdom")
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Position among siblings at insertion time
    pub fn index(&self) -> usize {
        self.index
    }

    /// Shape the node was constructed with
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Parent key, `None` for a root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in insertion order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Payload fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single payload field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Payload field as a string slice, if it is a JSON string
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Check if this node is a root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Strict comparison against the type tag
    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }
}

/// Remove structural keys from a payload before it becomes node fields
///
/// `type` is consumed as the tag and `index` is assigned by the parent, so
/// both are always stripped in addition to the configured reserved keys.
pub(crate) fn strip_structural(
    mut payload: Map<String, Value>,
    reserved: &[String],
) -> Map<String, Value> {
    for key in reserved {
        payload.remove(key);
    }
    payload.remove("type");
    payload.remove("index");
    payload
}
