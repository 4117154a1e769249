//! Node Behavior System
//!
//! This module provides the shape facility that lets specialised node kinds
//! reuse the engine:
//!
//! - `NodeBehavior` trait - Overridable hooks run during construction and description
//! - `BaseBehavior` - Explicit handle to the behaviour an override replaced ("super")
//! - `ShapeRegistry` - Shape derivation, default child constructors and lookup
//!
//! A shape's behaviour is fixed when the shape is derived. Structural queries
//! are not hooks, so every shape gets the same lineage semantics.

mod shape;

pub use shape::{Shape, ShapeDef, ShapeId, ShapeRegistry};

use crate::models::Node;
use serde_json::{Map, Value};
use std::fmt;

/// Overridable operations of a shape
///
/// Every method has a default that delegates to `base`, so an implementation
/// only overrides what it changes and can still call the replaced behaviour.
///
/// # Examples
///
/// ```rust
/// use protonode_core::behaviors::{BaseBehavior, NodeBehavior};
/// use serde_json::{json, Value};
///
/// /// Accept a bare name wherever a payload is expected
/// #[derive(Debug)]
/// struct Named;
///
/// impl NodeBehavior for Named {
///     fn prepare_child(&self, base: BaseBehavior<'_>, input: Value) -> Value {
///         match input {
///             Value::String(name) => base.prepare_child(json!({ "name": name })),
///             other => base.prepare_child(other),
///         }
///     }
/// }
/// ```
pub trait NodeBehavior: Send + Sync + fmt::Debug {
    /// Adjust payload fields of a node of this shape before it is stored
    ///
    /// Runs after structural keys are stripped.
    fn initialize(&self, base: BaseBehavior<'_>, fields: &mut Map<String, Value>) {
        base.initialize(fields)
    }

    /// Rewrite the raw value handed to `add` on a node of this shape
    ///
    /// The result must be a JSON object or `add` fails with `InvalidArgument`.
    fn prepare_child(&self, base: BaseBehavior<'_>, input: Value) -> Value {
        base.prepare_child(input)
    }

    /// Human-readable label for a node of this shape
    fn describe(&self, base: BaseBehavior<'_>, node: &Node) -> String {
        base.describe(node)
    }
}

/// Behaviour of the base `node` shape
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBehavior;

impl NodeBehavior for DefaultBehavior {}

/// The behaviour an override replaced
///
/// Calling through a `BaseBehavior` runs the parent shape's hook with its own
/// base, so chains of overrides unwind one level at a time. Past the top of
/// the chain the hooks are identities (`describe` returns the node id).
#[derive(Clone, Copy)]
pub struct BaseBehavior<'a> {
    registry: &'a ShapeRegistry,
    shape: Option<ShapeId>,
}

impl<'a> BaseBehavior<'a> {
    pub(crate) fn new(registry: &'a ShapeRegistry, shape: Option<ShapeId>) -> Self {
        Self { registry, shape }
    }

    /// Shape whose behaviour this handle dispatches to
    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }

    fn resolve(&self) -> Option<(&'a dyn NodeBehavior, BaseBehavior<'a>)> {
        let shape = self.shape?;
        self.registry.dispatch(shape)
    }

    /// Run the replaced `initialize`
    pub fn initialize(&self, fields: &mut Map<String, Value>) {
        if let Some((behavior, base)) = self.resolve() {
            behavior.initialize(base, fields);
        }
    }

    /// Run the replaced `prepare_child`
    pub fn prepare_child(&self, input: Value) -> Value {
        match self.resolve() {
            Some((behavior, base)) => behavior.prepare_child(base, input),
            None => input,
        }
    }

    /// Run the replaced `describe`
    pub fn describe(&self, node: &Node) -> String {
        match self.resolve() {
            Some((behavior, base)) => behavior.describe(base, node),
            None => node.id().to_string(),
        }
    }
}

impl fmt::Debug for BaseBehavior<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseBehavior")
            .field("shape", &self.shape)
            .finish()
    }
}
