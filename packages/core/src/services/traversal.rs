//! Traversal & Query Engine
//!
//! Pure reads over the parent/children edges of a [`Tree`]:
//!
//! - **Lineage**: `parent`, `ancestor`, `ancestors`
//! - **Widening search**: `descendants` (shallowest matching level) and
//!   `find_descendants` (every level)
//! - **Sibling sets**: `siblings`, `index_of`
//! - **Linear order**: `prev`, `next` with fallback to the parent chain
//!
//! Every query is total. A key the tree does not know behaves like a lone
//! root: no parent, no children, itself as its only sibling.

use crate::models::{Node, NodeFilter, NodeKey};
use crate::services::Tree;

impl Tree {
    /// Parent of a node, `None` for a root
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(Node::parent)
    }

    /// Children of a node in insertion order
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.get(key).map(Node::children).unwrap_or(&[])
    }

    /// Children of a node that pass `filter`
    pub fn children_where(&self, key: NodeKey, filter: &NodeFilter) -> Vec<NodeKey> {
        self.filter(self.children(key), filter)
    }

    /// Keep the keys whose nodes pass `filter`, preserving order
    pub fn filter(&self, keys: &[NodeKey], filter: &NodeFilter) -> Vec<NodeKey> {
        keys.iter()
            .copied()
            .filter(|key| self.get(*key).is_some_and(|node| filter.matches(node)))
            .collect()
    }

    /// Sibling set of a node, the node itself included
    ///
    /// A root is the only member of its own sibling set.
    pub fn siblings(&self, key: NodeKey) -> Vec<NodeKey> {
        match self.parent(key) {
            Some(parent) => self.children(parent).to_vec(),
            None => vec![key],
        }
    }

    /// Sibling set of a node filtered by `filter`
    pub fn siblings_where(&self, key: NodeKey, filter: &NodeFilter) -> Vec<NodeKey> {
        self.filter(&self.siblings(key), filter)
    }

    /// Position of a node within its sibling set, found by identity
    pub fn index_of(&self, key: NodeKey) -> usize {
        position(&self.siblings(key), key)
    }

    /// Nearest ancestor of `node_type`, or the parent when untyped
    ///
    /// Walks up one parent at a time and stops at the first match. Returns
    /// `None` at a root or when no ancestor has the requested type.
    pub fn ancestor(&self, key: NodeKey, node_type: Option<&str>) -> Option<NodeKey> {
        let mut current = self.parent(key);
        let Some(node_type) = node_type else {
            return current;
        };

        while let Some(candidate) = current {
            if self.is(candidate, node_type) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Sibling set of [`ancestor`](Self::ancestor), `None` if it resolved to nothing
    ///
    /// These are the nodes on the same level as the ancestor, not the chain
    /// of ancestors.
    pub fn ancestors(&self, key: NodeKey, node_type: Option<&str>) -> Option<Vec<NodeKey>> {
        self.ancestor(key, node_type)
            .map(|ancestor| self.siblings(ancestor))
    }

    /// Breadth-widening search for descendants of `node_type`
    ///
    /// Untyped, returns the immediate children. Typed, expands the frontier
    /// one level at a time starting from the children and returns the
    /// matching nodes of the shallowest level that has any. Deeper levels
    /// are never visited once a match is found.
    pub fn descendants(&self, key: NodeKey, node_type: Option<&str>) -> Vec<NodeKey> {
        let mut frontier = self.children(key).to_vec();
        let Some(node_type) = node_type else {
            return frontier;
        };

        let mut depth = 1;
        while !frontier.is_empty() {
            let matches: Vec<NodeKey> = frontier
                .iter()
                .copied()
                .filter(|candidate| self.is(*candidate, node_type))
                .collect();
            tracing::trace!(
                "descendants of {} at depth {}: {} of {} match '{}'",
                key,
                depth,
                matches.len(),
                frontier.len(),
                node_type
            );
            if !matches.is_empty() {
                return matches;
            }
            frontier = self.next_level(&frontier);
            depth += 1;
        }
        Vec::new()
    }

    /// Every descendant passing `filter`, level by level
    ///
    /// Unlike [`descendants`](Self::descendants) this keeps widening to the
    /// leaves and concatenates the matches of every level.
    pub fn find_descendants(&self, key: NodeKey, filter: &NodeFilter) -> Vec<NodeKey> {
        let mut found = Vec::new();
        let mut frontier = self.children(key).to_vec();
        while !frontier.is_empty() {
            found.extend(self.filter(&frontier, filter));
            frontier = self.next_level(&frontier);
        }
        found
    }

    fn next_level(&self, frontier: &[NodeKey]) -> Vec<NodeKey> {
        frontier
            .iter()
            .flat_map(|key| self.children(*key).iter().copied())
            .collect()
    }

    /// Previous sibling, else the parent, else the node itself
    pub fn prev(&self, key: NodeKey) -> NodeKey {
        let siblings = self.siblings(key);
        match position(&siblings, key) {
            0 => self.parent(key).unwrap_or(key),
            index => siblings[index - 1],
        }
    }

    /// Next sibling, else the parent's `next`, else the node itself
    ///
    /// From the last node under a root this climbs back to the root, which
    /// is its own `next`.
    pub fn next(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        loop {
            let siblings = self.siblings(current);
            if let Some(next) = siblings.get(position(&siblings, current) + 1) {
                return *next;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Strict comparison against the node's type tag
    pub fn is(&self, key: NodeKey, node_type: &str) -> bool {
        self.get(key).is_some_and(|node| node.is(node_type))
    }
}

fn position(siblings: &[NodeKey], key: NodeKey) -> usize {
    siblings.iter().position(|k| *k == key).unwrap_or(0)
}

#[cfg(test)]
#[path = "traversal_test.rs"]
mod traversal_test;
