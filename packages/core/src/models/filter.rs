//! Collection filters for type-filtered queries
//!
//! A filter is either a bare type name (shorthand for `{"type": name}`) or a
//! set of field values that a node must all carry. `type` inside a field
//! filter is matched against the node's tag, not its payload.

use crate::models::Node;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Condition applied to candidate nodes by `children_where`, `siblings_where`
/// and `find_descendants`
///
/// # Examples
///
/// ```rust
/// use protonode_core::models::NodeFilter;
/// use serde_json::json;
///
/// let by_type = NodeFilter::from("child");
/// let by_fields = NodeFilter::fields(json!({"name": "Octopus"})).unwrap();
/// assert_ne!(by_type, by_fields);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeFilter {
    /// Match on the node's type tag
    Type(String),
    /// Match when every listed field equals the node's value for it
    Fields(Map<String, Value>),
}

impl NodeFilter {
    /// Filter on the type tag
    pub fn by_type(node_type: impl Into<String>) -> Self {
        Self::Type(node_type.into())
    }

    /// Build a field filter from a JSON value
    ///
    /// A string becomes a type filter; an object becomes a field filter.
    /// Returns `None` for any other value.
    pub fn fields(value: Value) -> Option<Self> {
        match value {
            Value::String(node_type) => Some(Self::Type(node_type)),
            Value::Object(map) => Some(Self::Fields(map)),
            _ => None,
        }
    }

    /// Check a single node against this filter
    ///
    /// An empty field filter matches everything.
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Type(node_type) => node.node_type() == node_type,
            Self::Fields(expected) => expected.iter().all(|(key, value)| match key.as_str() {
                "type" => value.as_str() == Some(node.node_type()),
                "id" => value.as_str() == Some(node.id()),
                _ => node.field(key) == Some(value),
            }),
        }
    }
}

impl From<&str> for NodeFilter {
    fn from(node_type: &str) -> Self {
        Self::Type(node_type.to_string())
    }
}

impl From<String> for NodeFilter {
    fn from(node_type: String) -> Self {
        Self::Type(node_type)
    }
}

impl From<Map<String, Value>> for NodeFilter {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Fields(fields)
    }
}
