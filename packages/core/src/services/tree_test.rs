//! Tests for Tree construction, add and projection
//!
//! Tests cover:
//! - Root construction and type resolution
//! - Child constructor resolution through shapes
//! - Index assignment and stability
//! - Invalid add input
//! - Re-parenting existing nodes
//! - JSON projection

#[cfg(test)]
mod tests {
    use crate::behaviors::{ShapeDef, ShapeId, ShapeRegistry};
    use crate::config::TreeConfig;
    use crate::models::{IdGenerator, NodeKey};
    use crate::services::{Tree, TreeError};
    use serde_json::{json, Value};
    use std::sync::Arc;

    /// Helper: tree over the base shape with its own id counters
    fn base_tree() -> Tree {
        Tree::new(Arc::new(ShapeRegistry::new())).with_id_generator(Arc::new(IdGenerator::new()))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    #[test]
    fn test_root_takes_explicit_type() {
        let mut tree = base_tree();
        let family = tree.create_root(ShapeId::BASE, json!({"type": "family"})).unwrap();

        let node = tree.get(family).unwrap();
        assert_eq!(node.node_type(), "family");
        assert_eq!(node.id(), "family:1");
        assert_eq!(node.index(), 0);
        assert!(node.is_root());
        assert!(node.field("type").is_none());
    }

    #[test]
    fn test_root_defaults_to_shape_type() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();

        assert_eq!(tree.get(root).unwrap().node_type(), "node");
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_empty_type_falls_back_to_shape_type() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, json!({"type": ""})).unwrap();
        assert!(tree.is(root, "node"));
    }

    #[test]
    fn test_root_rejects_non_object_payload() {
        let mut tree = base_tree();
        let result = tree.create_root(ShapeId::BASE, json!([1, 2]));
        assert!(matches!(result, Err(TreeError::InvalidArgument { .. })));

        let result = tree.create_root(ShapeId::BASE, json!({"type": 5}));
        assert!(matches!(result, Err(TreeError::InvalidArgument { .. })));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_root_rejects_unknown_shape() {
        let mut tree = base_tree();
        let other = {
            let mut shapes = ShapeRegistry::new();
            shapes.derive(ShapeId::BASE, ShapeDef::new()).unwrap()
        };
        let result = tree.create_root(other, Value::Null);
        assert!(matches!(result, Err(TreeError::ShapeNotFound { .. })));
    }

    #[test]
    fn test_structural_keys_are_stripped() {
        let mut tree = base_tree();
        let root = tree
            .create_root(
                ShapeId::BASE,
                json!({
                    "type": "family",
                    "id": "forged",
                    "parent": 3,
                    "children": ["x"],
                    "surname": "Smith"
                }),
            )
            .unwrap();

        let node = tree.get(root).unwrap();
        assert_eq!(node.id(), "family:1");
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert_eq!(node.fields().len(), 1);
        assert_eq!(node.field_str("surname"), Some("Smith"));
    }

    #[test]
    fn test_ids_unique_per_type() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, json!({"type": "family"})).unwrap();
        let a = tree.add(root, json!({"type": "child"})).unwrap();
        let b = tree.add(root, json!({"type": "child"})).unwrap();
        let c = tree.add(root, json!({"type": "grand"})).unwrap();

        assert_eq!(tree.get(a).unwrap().id(), "child:1");
        assert_eq!(tree.get(b).unwrap().id(), "child:2");
        assert_eq!(tree.get(c).unwrap().id(), "grand:1");
    }

    #[test]
    fn test_id_separator_from_config() {
        let config = TreeConfig {
            id_separator: '-',
            ..Default::default()
        };
        let mut tree = Tree::with_config(Arc::new(ShapeRegistry::new()), config)
            .unwrap()
            .with_id_generator(Arc::new(IdGenerator::new()));
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        assert_eq!(tree.get(root).unwrap().id(), "node-1");
    }

    #[test]
    fn test_with_config_validates() {
        let config = TreeConfig {
            reserved_keys: vec![],
            ..Default::default()
        };
        let result = Tree::with_config(Arc::new(ShapeRegistry::new()), config);
        assert!(matches!(result, Err(TreeError::Config(_))));
    }

    // ========================================================================
    // add()
    // ========================================================================

    #[test]
    fn test_add_uses_own_shape_without_declared_child() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        let child = tree.add(root, json!({})).unwrap();

        let node = tree.get(child).unwrap();
        assert_eq!(node.shape(), ShapeId::BASE);
        assert_eq!(node.node_type(), "node");
        assert_eq!(node.parent(), Some(root));
    }

    #[test]
    fn test_add_uses_declared_child_shape() {
        let mut shapes = ShapeRegistry::new();
        let leaf = shapes.derive(ShapeId::BASE, ShapeDef::new().with_type("leaf")).unwrap();
        let branch = shapes
            .derive(ShapeId::BASE, ShapeDef::new().with_type("branch").with_child(leaf))
            .unwrap();
        let mut tree = Tree::new(Arc::new(shapes));

        let root = tree.create_root(branch, Value::Null).unwrap();
        let child = tree.add(root, json!({"name": "first"})).unwrap();
        let grandchild = tree.add(child, json!({})).unwrap();

        assert_eq!(tree.get(child).unwrap().shape(), leaf);
        assert!(tree.is(child, "leaf"));
        // leaf declares no child, so it reproduces itself
        assert_eq!(tree.get(grandchild).unwrap().shape(), leaf);
    }

    #[test]
    fn test_explicit_type_overrides_child_shape_type() {
        let mut shapes = ShapeRegistry::new();
        let leaf = shapes.derive(ShapeId::BASE, ShapeDef::new().with_type("leaf")).unwrap();
        let branch = shapes
            .derive(ShapeId::BASE, ShapeDef::new().with_child(leaf))
            .unwrap();
        let mut tree = Tree::new(Arc::new(shapes));

        let root = tree.create_root(branch, Value::Null).unwrap();
        let child = tree.add(root, json!({"type": "bud"})).unwrap();

        assert!(tree.is(child, "bud"));
        assert_eq!(tree.get(child).unwrap().shape(), leaf);
    }

    #[test]
    fn test_index_is_assigned_and_stable() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        let first = tree.add(root, json!({"index": 99})).unwrap();
        assert_eq!(tree.get(first).unwrap().index(), 0);

        let second = tree.add(root, json!({})).unwrap();
        let third = tree.add(root, json!({})).unwrap();
        tree.add(first, json!({})).unwrap();

        assert_eq!(tree.get(first).unwrap().index(), 0);
        assert_eq!(tree.get(second).unwrap().index(), 1);
        assert_eq!(tree.get(third).unwrap().index(), 2);
        assert!(tree.get(first).unwrap().field("index").is_none());
    }

    #[test]
    fn test_add_rejects_invalid_values() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, json!({"type": "family"})).unwrap();
        tree.add(root, json!({"type": "parent"})).unwrap();

        for bad in [json!(5), json!("child"), Value::Null, json!(true), json!([{}])] {
            let result = tree.add(root, bad);
            assert!(
                matches!(result, Err(TreeError::InvalidArgument { .. })),
                "expected InvalidArgument, got {:?}",
                result
            );
        }

        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_add_rejects_unknown_keys() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();

        let result = tree.add(NodeKey::new(40), json!({}));
        assert!(matches!(result, Err(TreeError::NodeNotFound { .. })));

        let result = tree.add(root, NodeKey::new(40));
        assert!(matches!(result, Err(TreeError::NodeNotFound { .. })));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_add_node_reparents_it() {
        let mut tree = base_tree();
        let a = tree.create_root(ShapeId::BASE, json!({"type": "a"})).unwrap();
        let b = tree.create_root(ShapeId::BASE, json!({"type": "b"})).unwrap();
        tree.add(b, json!({"type": "resident"})).unwrap();
        let n = tree.add(a, json!({"type": "n", "name": "Ann"})).unwrap();
        let grandchild = tree.add(n, json!({"type": "leaf"})).unwrap();
        let id = tree.get(n).unwrap().id().to_string();

        let moved = tree.add(b, n).unwrap();

        assert_eq!(moved, n);
        assert_eq!(tree.len(), 5);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b).len(), 2);
        assert_eq!(tree.children(b)[1], n);

        let node = tree.get(n).unwrap();
        assert_eq!(node.parent(), Some(b));
        assert_eq!(node.index(), 1);
        assert_eq!(node.id(), id);
        assert_eq!(node.field_str("name"), Some("Ann"));
        assert!(node.children().is_empty());

        // the former children are cut loose
        assert_eq!(tree.parent(grandchild), None);
        assert_eq!(tree.roots(), vec![a, b, grandchild]);
    }

    #[test]
    fn test_adopt_returns_the_parent() {
        let mut tree = base_tree();
        let family = tree.create_root(ShapeId::BASE, json!({"type": "family"})).unwrap();
        let stray = tree.create_root(ShapeId::BASE, json!({"type": "child"})).unwrap();

        assert_eq!(tree.adopt(family, stray).unwrap(), family);
        assert_eq!(tree.children(family), &[stray]);
        assert_eq!(tree.ancestor(stray, Some("family")), Some(family));
    }

    #[test]
    fn test_readding_under_same_parent_moves_to_the_end() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        let first = tree.add(root, json!({})).unwrap();
        let second = tree.add(root, json!({})).unwrap();

        tree.add(root, first).unwrap();

        assert_eq!(tree.children(root), &[second, first]);
        assert_eq!(tree.get(first).unwrap().index(), 1);
        assert_eq!(tree.index_of(first), 1);
    }

    #[test]
    fn test_add_node_rejects_cycles() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        let child = tree.add(root, json!({})).unwrap();
        let grand = tree.add(child, json!({})).unwrap();

        for (parent, node) in [(child, child), (grand, root), (grand, child)] {
            let result = tree.add(parent, node);
            assert!(
                matches!(result, Err(TreeError::InvalidArgument { .. })),
                "expected InvalidArgument, got {:?}",
                result
            );
        }

        assert_eq!(tree.children(root), &[child]);
        assert_eq!(tree.children(child), &[grand]);
        assert!(tree.children(grand).is_empty());
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_type_containing_separator_is_rejected() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();

        let result = tree.add(root, json!({"type": "child:1"}));
        assert!(matches!(result, Err(TreeError::InvalidArgument { .. })));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_roots() {
        let mut tree = base_tree();
        let a = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        tree.add(a, json!({})).unwrap();
        let b = tree.create_root(ShapeId::BASE, Value::Null).unwrap();

        assert_eq!(tree.roots(), vec![a, b]);
        assert!(tree.contains(b));
        assert!(!tree.contains(NodeKey::new(3)));
    }

    // ========================================================================
    // Projection
    // ========================================================================

    #[test]
    fn test_projection_mirrors_children() {
        let mut tree = base_tree();
        let family = tree
            .create_root(ShapeId::BASE, json!({"type": "family", "surname": "Smith"}))
            .unwrap();
        let parent = tree.add(family, json!({"type": "parent"})).unwrap();
        tree.add(parent, json!({"type": "child"})).unwrap();
        tree.add(family, json!({"type": "parent", "name": "uncle"})).unwrap();

        let json = tree.to_json(family, &[]).unwrap();

        assert_eq!(json["type"], "family");
        assert_eq!(json["id"], "family:1");
        assert_eq!(json["surname"], "Smith");
        assert!(json.get("parent").is_none());

        let children = json["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["index"], 0);
        assert_eq!(children[1]["name"], "uncle");
        assert!(children[0].get("parent").is_none());
        assert_eq!(children[0]["children"][0]["type"], "child");
    }

    #[test]
    fn test_projection_exclusions_apply_at_every_depth() {
        let mut tree = base_tree();
        let root = tree.create_root(ShapeId::BASE, json!({"secret": 1})).unwrap();
        tree.add(root, json!({"secret": 2, "shown": true})).unwrap();

        let json = tree.to_json(root, &["secret", "id"]).unwrap();

        assert!(json.get("secret").is_none());
        assert!(json.get("id").is_none());
        assert!(json["children"][0].get("secret").is_none());
        assert_eq!(json["children"][0]["shown"], true);
    }

    #[test]
    fn test_projection_uses_configured_children_key() {
        let config = TreeConfig {
            children_key: "kids".to_string(),
            reserved_keys: vec!["id".to_string(), "parent".to_string(), "kids".to_string()],
            ..Default::default()
        };
        let mut tree = Tree::with_config(Arc::new(ShapeRegistry::new()), config).unwrap();
        let root = tree.create_root(ShapeId::BASE, Value::Null).unwrap();
        tree.add(root, json!({})).unwrap();

        let json = tree.to_json(root, &[]).unwrap();
        assert_eq!(json["kids"].as_array().map(Vec::len), Some(1));
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_projection_of_unknown_key_fails() {
        let tree = base_tree();
        assert!(matches!(
            tree.to_json(NodeKey::new(0), &[]),
            Err(TreeError::NodeNotFound { .. })
        ));
    }
}
