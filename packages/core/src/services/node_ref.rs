//! Borrowed query cursor
//!
//! `NodeRef` pairs a node with the tree that owns it so queries can be
//! chained in method form: `tree.node(great)?.ancestor(Some("child"))`.

use crate::models::{Node, NodeKey};
use crate::services::Tree;
use serde_json::Value;
use std::fmt;

/// A node borrowed together with its tree
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    key: NodeKey,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a Tree, key: NodeKey, node: &'a Node) -> Self {
        Self { tree, key, node }
    }

    fn wrap(&self, key: NodeKey) -> Option<NodeRef<'a>> {
        self.tree.node(key)
    }

    fn wrap_all(&self, keys: Vec<NodeKey>) -> Vec<NodeRef<'a>> {
        keys.into_iter().filter_map(|key| self.wrap(key)).collect()
    }

    /// Arena key
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Underlying node
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Unique identifier
    pub fn id(&self) -> &'a str {
        self.node.id()
    }

    /// Type tag
    pub fn node_type(&self) -> &'a str {
        self.node.node_type()
    }

    /// Payload field
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.node.field(key)
    }

    /// Strict comparison against the type tag
    pub fn is(&self, node_type: &str) -> bool {
        self.node.is(node_type)
    }

    /// Parent cursor, `None` for a root
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent().and_then(|key| self.wrap(key))
    }

    /// Child cursors in insertion order
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.wrap_all(self.node.children().to_vec())
    }

    /// Sibling set, this node included
    pub fn siblings(&self) -> Vec<NodeRef<'a>> {
        self.wrap_all(self.tree.siblings(self.key))
    }

    /// Position within the sibling set
    pub fn index_of(&self) -> usize {
        self.tree.index_of(self.key)
    }

    /// Nearest ancestor of `node_type`, or the parent when untyped
    pub fn ancestor(&self, node_type: Option<&str>) -> Option<NodeRef<'a>> {
        self.tree
            .ancestor(self.key, node_type)
            .and_then(|key| self.wrap(key))
    }

    /// Sibling set of [`ancestor`](Self::ancestor)
    pub fn ancestors(&self, node_type: Option<&str>) -> Option<Vec<NodeRef<'a>>> {
        self.tree
            .ancestors(self.key, node_type)
            .map(|keys| self.wrap_all(keys))
    }

    /// Matches at the shallowest level holding any, or the children when untyped
    pub fn descendants(&self, node_type: Option<&str>) -> Vec<NodeRef<'a>> {
        self.wrap_all(self.tree.descendants(self.key, node_type))
    }

    /// Previous sibling, else the parent, else this node
    pub fn prev(&self) -> NodeRef<'a> {
        self.wrap(self.tree.prev(self.key)).unwrap_or(*self)
    }

    /// Next sibling, else the parent's `next`, else this node
    pub fn next(&self) -> NodeRef<'a> {
        self.wrap(self.tree.next(self.key)).unwrap_or(*self)
    }

    /// Label produced by the node's shape
    pub fn describe(&self) -> String {
        let (behavior, base) = self.tree.shapes().behavior(self.node.shape());
        behavior.describe(base, self.node)
    }

    /// JSON projection of this node's subtree
    pub fn to_json(&self, exclude: &[&str]) -> Value {
        self.tree.project(self.node, exclude)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.key == other.key
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key)
            .field("id", &self.node.id())
            .field("type", &self.node.node_type())
            .finish()
    }
}
