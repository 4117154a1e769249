//! Shapes and the shape registry
//!
//! A shape bundles a default type tag, a default child shape, static values
//! and a behaviour. Shapes live in a registry and are addressed by
//! [`ShapeId`]; the registry is frozen behind an `Arc` once a tree is built
//! over it.

use super::{BaseBehavior, DefaultBehavior, NodeBehavior};
use crate::services::error::{Result, TreeError};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Handle to a shape inside a [`ShapeRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    /// The base `node` shape every registry starts with
    pub const BASE: ShapeId = ShapeId(0);

    /// Get the registry slot
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", self.0)
    }
}

/// A registered node shape
#[derive(Debug, Clone)]
pub struct Shape {
    node_type: String,
    base: Option<ShapeId>,
    child: Option<ShapeId>,
    behavior: Arc<dyn NodeBehavior>,
    /// Shape whose behaviour `behavior` replaced
    super_shape: Option<ShapeId>,
    statics: Map<String, Value>,
}

impl Shape {
    /// Default type tag for nodes of this shape
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Shape this one was derived from, `None` for the base shape
    pub fn base(&self) -> Option<ShapeId> {
        self.base
    }

    /// Default shape used by `add` on nodes of this shape
    pub fn child(&self) -> Option<ShapeId> {
        self.child
    }

    /// Static values declared on this shape or inherited
    pub fn statics(&self) -> &Map<String, Value> {
        &self.statics
    }
}

/// Definition of a derived shape
///
/// Unset parts are inherited from the base shape at derivation time.
///
/// # Double-Option Pattern for `child`
///
/// - `None`: inherit the base shape's child
/// - `Some(None)`: no default child (`add` falls back to the node's own shape)
/// - `Some(Some(id))`: use `id`
#[derive(Debug, Clone, Default)]
pub struct ShapeDef {
    /// Override the default type tag
    pub node_type: Option<String>,
    /// Override the default child shape
    pub child: Option<Option<ShapeId>>,
    /// Override the behaviour
    pub behavior: Option<Arc<dyn NodeBehavior>>,
    /// Static values merged over the inherited ones
    pub statics: Map<String, Value>,
}

impl ShapeDef {
    /// Create an empty definition (inherits everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type tag
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Set the default child shape
    pub fn with_child(mut self, child: ShapeId) -> Self {
        self.child = Some(Some(child));
        self
    }

    /// Declare that this shape has no default child
    pub fn without_child(mut self) -> Self {
        self.child = Some(None);
        self
    }

    /// Replace the behaviour
    pub fn with_behavior(mut self, behavior: impl NodeBehavior + 'static) -> Self {
        self.behavior = Some(Arc::new(behavior));
        self
    }

    /// Add a static value
    pub fn with_static(mut self, key: impl Into<String>, value: Value) -> Self {
        self.statics.insert(key.into(), value);
        self
    }
}

/// Registry of shapes
///
/// # Examples
///
/// ```rust
/// use protonode_core::behaviors::{ShapeDef, ShapeId, ShapeRegistry};
///
/// let mut shapes = ShapeRegistry::new();
/// let species = shapes.derive(ShapeId::BASE, ShapeDef::new().with_type("Species"))?;
/// let genus = shapes.derive(
///     ShapeId::BASE,
///     ShapeDef::new().with_type("Genus").with_child(species),
/// )?;
///
/// assert_eq!(shapes.child(genus), Some(species));
/// assert_eq!(shapes.child(species), None);
/// # Ok::<(), protonode_core::TreeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: Vec<Shape>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeRegistry {
    /// Type tag of the base shape
    pub const BASE_TYPE: &'static str = "node";

    /// Create a registry holding only the base shape
    pub fn new() -> Self {
        Self {
            shapes: vec![Shape {
                node_type: Self::BASE_TYPE.to_string(),
                base: None,
                child: None,
                behavior: Arc::new(DefaultBehavior),
                super_shape: None,
                statics: Map::new(),
            }],
        }
    }

    /// Derive a new shape from `base`
    ///
    /// The base is never modified.
    ///
    /// # Errors
    ///
    /// - `ShapeNotFound` if `base` or the requested child is not registered
    /// - `InvalidArgument` if the requested type tag is empty
    pub fn derive(&mut self, base: ShapeId, def: ShapeDef) -> Result<ShapeId> {
        let parent = self.shape(base)?;

        if let Some(Some(child)) = def.child {
            self.shape(child)?;
        }
        if matches!(def.node_type.as_deref(), Some("")) {
            return Err(TreeError::invalid_argument("shape type cannot be empty"));
        }

        let (behavior, super_shape) = match def.behavior {
            Some(behavior) => (behavior, Some(base)),
            None => (parent.behavior.clone(), parent.super_shape),
        };

        let mut statics = parent.statics.clone();
        statics.extend(def.statics);

        let shape = Shape {
            node_type: def.node_type.unwrap_or_else(|| parent.node_type.clone()),
            base: Some(base),
            child: def.child.unwrap_or(parent.child),
            behavior,
            super_shape,
            statics,
        };

        let id = ShapeId(self.shapes.len());
        tracing::debug!(
            "Derived shape {} '{}' from {}",
            id,
            shape.node_type,
            base
        );
        self.shapes.push(shape);
        Ok(id)
    }

    /// Record `child` as the default child shape of `shape`
    ///
    /// This is the only way to point a shape at one derived after it.
    pub fn declare_child(&mut self, shape: ShapeId, child: Option<ShapeId>) -> Result<()> {
        if let Some(child) = child {
            self.shape(child)?;
        }
        let entry = self
            .shapes
            .get_mut(shape.0)
            .ok_or(TreeError::ShapeNotFound { shape })?;
        entry.child = child;
        Ok(())
    }

    /// Derive a shape of `node_type` from `base` and make it the default
    /// child of `parent`
    ///
    /// The new shape has no default child of its own, so calling `begets`
    /// on each result in turn builds a rank chain.
    pub fn begets(
        &mut self,
        parent: ShapeId,
        base: ShapeId,
        node_type: impl Into<String>,
    ) -> Result<ShapeId> {
        self.shape(parent)?;
        let child = self.derive(base, ShapeDef::new().with_type(node_type).without_child())?;
        self.declare_child(parent, Some(child))?;
        Ok(child)
    }

    /// Look up a shape
    pub fn get(&self, shape: ShapeId) -> Option<&Shape> {
        self.shapes.get(shape.0)
    }

    fn shape(&self, shape: ShapeId) -> Result<&Shape> {
        self.get(shape).ok_or(TreeError::ShapeNotFound { shape })
    }

    /// Default type tag of a shape
    pub fn node_type(&self, shape: ShapeId) -> Option<&str> {
        self.get(shape).map(Shape::node_type)
    }

    /// Default child shape of a shape
    pub fn child(&self, shape: ShapeId) -> Option<ShapeId> {
        self.get(shape).and_then(Shape::child)
    }

    /// Shape a shape was derived from
    pub fn base(&self, shape: ShapeId) -> Option<ShapeId> {
        self.get(shape).and_then(Shape::base)
    }

    /// Static value declared on a shape or inherited
    pub fn static_value(&self, shape: ShapeId, key: &str) -> Option<&Value> {
        self.get(shape).and_then(|s| s.statics.get(key))
    }

    /// First registered shape whose default type is `node_type`
    pub fn find_by_type(&self, node_type: &str) -> Option<ShapeId> {
        self.shapes
            .iter()
            .position(|s| s.node_type == node_type)
            .map(ShapeId)
    }

    /// Check whether `shape` is `ancestor` or derived from it
    pub fn is_derived_from(&self, shape: ShapeId, ancestor: ShapeId) -> bool {
        let mut current = Some(shape);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.base(id);
        }
        false
    }

    /// Number of registered shapes, including the base
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always false: the base shape is always registered
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Behaviour of `shape` paired with the behaviour it replaced
    pub(crate) fn dispatch(&self, shape: ShapeId) -> Option<(&dyn NodeBehavior, BaseBehavior<'_>)> {
        let entry = self.get(shape)?;
        Some((
            entry.behavior.as_ref(),
            BaseBehavior::new(self, entry.super_shape),
        ))
    }

    /// Behaviour of `shape`, falling back to the base shape's
    pub(crate) fn behavior(&self, shape: ShapeId) -> (&dyn NodeBehavior, BaseBehavior<'_>) {
        match self.dispatch(shape) {
            Some(found) => found,
            None => {
                let fallback: &dyn NodeBehavior = &DefaultBehavior;
                (fallback, BaseBehavior::new(self, None))
            }
        }
    }
}
