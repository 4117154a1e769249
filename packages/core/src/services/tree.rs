//! Tree arena: construction, `add` and JSON projection
//!
//! A `Tree` owns every node it creates in a flat arena. Nodes are only ever
//! appended and are never removed. A node changes parent only through
//! [`Tree::adopt`], which refuses to move a node under itself or one of its
//! descendants, so the arena can never describe a cycle.

use crate::behaviors::{ShapeId, ShapeRegistry};
use crate::config::TreeConfig;
use crate::models::{strip_structural, IdGenerator, Node, NodeKey};
use crate::services::error::{Result, TreeError};
use crate::services::NodeRef;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Value accepted by [`Tree::add`]
///
/// Any JSON value converts into `AddInput::Value`; whether it is acceptable
/// is decided after the parent shape's `prepare_child` hook has seen it.
#[derive(Debug, Clone, PartialEq)]
pub enum AddInput {
    /// Payload for a new child
    Value(Value),
    /// Existing node to re-parent
    Node(NodeKey),
}

impl From<Value> for AddInput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Map<String, Value>> for AddInput {
    fn from(payload: Map<String, Value>) -> Self {
        Self::Value(Value::Object(payload))
    }
}

impl From<&str> for AddInput {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<NodeKey> for AddInput {
    fn from(key: NodeKey) -> Self {
        Self::Node(key)
    }
}

/// Arena of nodes built over a frozen [`ShapeRegistry`]
///
/// # Examples
///
/// ```rust
/// use protonode_core::{ShapeId, ShapeRegistry, Tree};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut tree = Tree::new(Arc::new(ShapeRegistry::new()));
/// let family = tree.create_root(ShapeId::BASE, json!({"type": "family"}))?;
/// let parent = tree.add(family, json!({"type": "parent"}))?;
///
/// assert_eq!(tree.parent(parent), Some(family));
/// assert_eq!(tree.ancestor(parent, Some("family")), Some(family));
/// # Ok::<(), protonode_core::TreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    config: TreeConfig,
    shapes: Arc<ShapeRegistry>,
    ids: Arc<IdGenerator>,
    nodes: Vec<Node>,
}

impl Tree {
    /// Create an empty tree with the default configuration and the
    /// process-wide id generator
    pub fn new(shapes: Arc<ShapeRegistry>) -> Self {
        Self {
            config: TreeConfig::default(),
            shapes,
            ids: IdGenerator::global(),
            nodes: Vec::new(),
        }
    }

    /// Create an empty tree with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `TreeError::Config` if the configuration does not validate.
    pub fn with_config(shapes: Arc<ShapeRegistry>, config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(shapes)
        })
    }

    /// Use a dedicated id generator instead of the process-wide one
    pub fn with_id_generator(mut self, ids: Arc<IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Shapes this tree constructs nodes from
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Create a root node of `shape`
    ///
    /// `payload` must be a JSON object, or `null` for an empty payload.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for any other payload or a non-string `type`
    /// - `ShapeNotFound` if `shape` is not registered
    pub fn create_root(&mut self, shape: ShapeId, payload: Value) -> Result<NodeKey> {
        let payload = match payload {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(TreeError::invalid_argument(format!(
                    "root payload must be an object, got {}",
                    json_kind(&other)
                )))
            }
        };
        self.construct(shape, payload, None, 0)
    }

    /// Add a child to `parent` and return its key
    ///
    /// - A payload object builds a node of the parent shape's default child
    ///   shape, or of the parent's own shape when none is declared. The
    ///   parent shape's `prepare_child` hook sees the raw value first.
    /// - A node key re-parents that node under `parent` (see [`adopt`]).
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `parent` (or the re-parented node) is not in this tree
    /// - `InvalidArgument` if the prepared value is not an object, or the node
    ///   is `parent` itself or one of its ancestors; the parent's children
    ///   are left unchanged
    ///
    /// [`adopt`]: Self::adopt
    pub fn add(&mut self, parent: NodeKey, input: impl Into<AddInput>) -> Result<NodeKey> {
        let value = match input.into() {
            AddInput::Node(child) => {
                self.adopt(parent, child)?;
                return Ok(child);
            }
            AddInput::Value(value) => value,
        };

        let parent_node = self.get(parent).ok_or(TreeError::node_not_found(parent))?;
        let parent_shape = parent_node.shape;
        let index = parent_node.children.len();

        let (behavior, base) = self.shapes.behavior(parent_shape);
        let payload = match behavior.prepare_child(base, value) {
            Value::Object(map) => map,
            other => {
                tracing::warn!(
                    "Rejected add on {}: expected a payload object or node, got {}",
                    parent,
                    json_kind(&other)
                );
                return Err(TreeError::invalid_argument(format!(
                    "add expects a payload object or node, got {}",
                    json_kind(&other)
                )));
            }
        };

        let shape = self.shapes.child(parent_shape).unwrap_or(parent_shape);
        let child = self.construct(shape, payload, Some(parent), index)?;
        self.nodes[parent.get()].children.push(child);

        tracing::debug!("Added {} to {} at index {}", child, parent, index);
        Ok(child)
    }

    /// Re-parent an existing node under `parent` and return `parent`
    ///
    /// The node is removed from its former parent's children, loses its own
    /// children (which become detached roots), takes the next index under
    /// `parent` and is appended there. Its id, type, shape and fields are
    /// kept.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either key is not in this tree
    /// - `InvalidArgument` if `child` is `parent` or one of its ancestors
    pub fn adopt(&mut self, parent: NodeKey, child: NodeKey) -> Result<NodeKey> {
        if !self.contains(parent) {
            return Err(TreeError::node_not_found(parent));
        }
        if !self.contains(child) {
            return Err(TreeError::node_not_found(child));
        }

        let mut lineage = Some(parent);
        while let Some(current) = lineage {
            if current == child {
                tracing::warn!("Rejected adopt of {} under its own descendant {}", child, parent);
                return Err(TreeError::invalid_argument(format!(
                    "{} cannot be adopted by itself or its descendant {}",
                    child, parent
                )));
            }
            lineage = self.parent(current);
        }

        if let Some(former) = self.nodes[child.get()].parent {
            self.nodes[former.get()].children.retain(|key| *key != child);
        }
        let orphans = std::mem::take(&mut self.nodes[child.get()].children);
        for orphan in &orphans {
            self.nodes[orphan.get()].parent = None;
        }

        let index = self.nodes[parent.get()].children.len();
        let node = &mut self.nodes[child.get()];
        node.parent = Some(parent);
        node.index = index;
        self.nodes[parent.get()].children.push(child);

        tracing::debug!(
            "Adopted {} into {} at index {}, detached {} children",
            child,
            parent,
            index,
            orphans.len()
        );
        Ok(parent)
    }

    fn construct(
        &mut self,
        shape: ShapeId,
        payload: Map<String, Value>,
        parent: Option<NodeKey>,
        index: usize,
    ) -> Result<NodeKey> {
        let default_type = self
            .shapes
            .node_type(shape)
            .ok_or(TreeError::ShapeNotFound { shape })?;

        let node_type = match payload.get("type") {
            None | Some(Value::Null) => default_type.to_string(),
            Some(Value::String(t)) if t.is_empty() => default_type.to_string(),
            Some(Value::String(t)) => t.clone(),
            Some(other) => {
                return Err(TreeError::invalid_argument(format!(
                    "node type must be a string, got {}",
                    json_kind(other)
                )))
            }
        };
        if node_type.contains(self.config.id_separator) {
            return Err(TreeError::invalid_argument(format!(
                "node type '{}' contains the id separator '{}'",
                node_type, self.config.id_separator
            )));
        }

        let id = self.ids.next_id(&node_type, self.config.id_separator);

        let mut fields = strip_structural(payload, &self.config.reserved_keys);
        let (behavior, base) = self.shapes.behavior(shape);
        behavior.initialize(base, &mut fields);
        let fields = strip_structural(fields, &self.config.reserved_keys);

        let key = NodeKey::new(self.nodes.len());
        tracing::debug!("Constructed node '{}' of type '{}' as {}", id, node_type, key);
        self.nodes
            .push(Node::new(id, node_type, index, shape, parent, fields));
        Ok(key)
    }

    /// Look up a node
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key.get())
    }

    /// Borrow a node as a query cursor
    pub fn node(&self, key: NodeKey) -> Option<NodeRef<'_>> {
        self.get(key).map(|node| NodeRef::new(self, key, node))
    }

    /// Check if `key` was issued by this tree
    pub fn contains(&self, key: NodeKey) -> bool {
        key.get() < self.nodes.len()
    }

    /// Number of nodes in the arena, across all roots
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node has been created yet
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys of every root, in creation order
    pub fn roots(&self) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_root())
            .map(|(slot, _)| NodeKey::new(slot))
            .collect()
    }

    /// Label produced by the node's shape (`describe` hook)
    pub fn describe(&self, key: NodeKey) -> Option<String> {
        let node = self.get(key)?;
        let (behavior, base) = self.shapes.behavior(node.shape);
        Some(behavior.describe(base, node))
    }

    /// Plain JSON projection of a node and its subtree
    ///
    /// The object holds the payload fields plus `type`, `id`, `index` and
    /// the recursively projected children. `parent` is never present, and
    /// every key in `exclude` is dropped at every depth.
    pub fn to_json(&self, key: NodeKey, exclude: &[&str]) -> Result<Value> {
        let node = self.get(key).ok_or(TreeError::node_not_found(key))?;
        Ok(self.project(node, exclude))
    }

    pub(crate) fn project(&self, node: &Node, exclude: &[&str]) -> Value {
        let mut out = node.fields.clone();
        out.insert("type".to_string(), Value::String(node.node_type.clone()));
        out.insert("id".to_string(), Value::String(node.id.clone()));
        out.insert("index".to_string(), Value::from(node.index));

        let children = node
            .children
            .iter()
            .filter_map(|key| self.get(*key))
            .map(|child| self.project(child, exclude))
            .collect();
        out.insert(self.config.children_key.clone(), Value::Array(children));

        out.remove("parent");
        for key in exclude {
            out.remove(*key);
        }
        Value::Object(out)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
