//! Property trees: arbitrary JSON values flattened into display nodes.
//!
//! Every object key and array index becomes a node, and every terminal value
//! becomes a leaf named by its rendering. A rewrite pass then collapses
//! `key -> value` chains into single `"key: value"` nodes.
//!
//! The two-sided variant compares keys structurally. There is no identity to
//! match on, so nothing is ever reported as moved or modified: a changed
//! terminal shows up as an `Added` leaf next to a `Deleted` one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use tracediff_types::DiffType;

use crate::config::BuilderConfig;
use crate::error::{DiffError, DiffResult};

/// A node of a property tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectNode {
    pub name: String,
    /// Always `None` for trees produced by [`ObjectTreeBuilder::build`].
    pub diff_type: DiffType,
    /// The node renders a value rather than a key.
    pub terminal: bool,
    /// The node is the result of a leaf merge and must not be merged again.
    pub combined: bool,
    pub children: Vec<ObjectNode>,
}

impl ObjectNode {
    fn leaf(name: String, diff_type: DiffType) -> Self {
        Self {
            name,
            diff_type,
            terminal: true,
            combined: false,
            children: Vec::new(),
        }
    }

    fn key(name: String, diff_type: DiffType, children: Vec<ObjectNode>) -> Self {
        Self {
            name,
            diff_type,
            terminal: false,
            combined: false,
            children,
        }
    }

    /// Direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&ObjectNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Names of the direct children, in order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ObjectNode::len).sum::<usize>()
    }

    /// Always `false`: a tree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A key seen during a two-sided comparison.
///
/// The one-sided variants are the terminal sentinel: the other side has no
/// key here at all, which is distinct from an explicit `null`.
#[derive(Clone, Copy, Debug)]
enum Slot<'v> {
    Both(&'v Value, &'v Value),
    NewOnly(&'v Value),
    OldOnly(&'v Value),
}

impl<'v> Slot<'v> {
    /// `None` when neither side has the key.
    fn of(new: Option<&'v Value>, old: Option<&'v Value>) -> Option<Self> {
        match (new, old) {
            (Some(new), Some(old)) => Some(Self::Both(new, old)),
            (Some(new), None) => Some(Self::NewOnly(new)),
            (None, Some(old)) => Some(Self::OldOnly(old)),
            (None, None) => None,
        }
    }
}

/// How a value is laid out in the tree.
enum Shape<'v> {
    /// `formatted` is set when the text came from the installed formatter.
    Leaf { text: String, formatted: bool },
    Array(&'v [Value]),
    Object(&'v Map<String, Value>),
}

impl<'v> Shape<'v> {
    /// Leaf text shown for a container without entries.
    fn empty_marker(&self) -> &'static str {
        match self {
            Self::Object(_) => "{}",
            _ => "[]",
        }
    }

    fn entries(&self) -> Vec<(String, &'v Value)> {
        match self {
            Self::Leaf { .. } => Vec::new(),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Self::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        }
    }
}

type Formatter = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Builds property trees from JSON values.
pub struct ObjectTreeBuilder {
    config: BuilderConfig,
    formatter: Option<Formatter>,
}

impl Default for ObjectTreeBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl ObjectTreeBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            formatter: None,
        }
    }

    /// Install a formatter that may render any value as a single leaf.
    ///
    /// When it returns `Some(text)` the value is not expanded. It is
    /// consulted before the built-in rendering of primitives.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Flatten a single value into a property tree.
    pub fn build(&self, value: &Value) -> DiffResult<ObjectNode> {
        let tree = self.keyed(self.config.root_name.clone(), value, DiffType::None, 0)?;
        let tree = merge_leaves(tree);
        debug!(root = %tree.name, nodes = tree.len(), "built property tree");
        Ok(tree)
    }

    /// Flatten `new` and annotate it against `old`.
    pub fn build_diff(&self, new: &Value, old: &Value) -> DiffResult<ObjectNode> {
        let tree = self.keyed_diff(
            self.config.root_name.clone(),
            Slot::Both(new, old),
            0,
        )?;
        let tree = merge_leaves(tree);
        debug!(root = %tree.name, nodes = tree.len(), "built property diff tree");
        Ok(tree)
    }

    fn shape<'v>(&self, value: &'v Value) -> Shape<'v> {
        if let Some(text) = self.formatter.as_ref().and_then(|f| f(value)) {
            return Shape::Leaf { text, formatted: true };
        }
        let text = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => return Shape::Array(items),
            Value::Object(map) => return Shape::Object(map),
        };
        Shape::Leaf { text, formatted: false }
    }

    fn check_depth(&self, depth: usize) -> DiffResult<()> {
        if depth > self.config.max_depth {
            return Err(DiffError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// A key node whose whole subtree carries `diff_type`.
    fn keyed(&self, name: String, value: &Value, diff_type: DiffType, depth: usize) -> DiffResult<ObjectNode> {
        self.check_depth(depth)?;
        let children = self.shape_children(&self.shape(value), diff_type, depth)?;
        Ok(ObjectNode::key(name, diff_type, children))
    }

    fn shape_children(&self, shape: &Shape<'_>, diff_type: DiffType, depth: usize) -> DiffResult<Vec<ObjectNode>> {
        match shape {
            Shape::Leaf { text, .. } => Ok(vec![ObjectNode::leaf(text.clone(), diff_type)]),
            _ => {
                let entries = shape.entries();
                if entries.is_empty() {
                    return Ok(vec![ObjectNode::leaf(shape.empty_marker().into(), diff_type)]);
                }
                entries
                    .into_iter()
                    .map(|(name, value)| self.keyed(name, value, diff_type, depth + 1))
                    .collect()
            }
        }
    }

    fn keyed_diff(&self, name: String, slot: Slot<'_>, depth: usize) -> DiffResult<ObjectNode> {
        match slot {
            Slot::Both(new, old) => {
                self.check_depth(depth)?;
                let children = self.diff_children(new, old, depth)?;
                Ok(ObjectNode::key(name, DiffType::None, children))
            }
            Slot::NewOnly(new) => self.keyed(name, new, DiffType::Added, depth),
            Slot::OldOnly(old) => self.keyed(name, old, DiffType::Deleted, depth),
        }
    }

    fn diff_children(&self, new: &Value, old: &Value, depth: usize) -> DiffResult<Vec<ObjectNode>> {
        match (self.shape(new), self.shape(old)) {
            // Raw primitives compare by value, so "1" and 1 differ. Formatted
            // leaves compare by their text.
            (Shape::Leaf { text: a, formatted: fa }, Shape::Leaf { text: b, formatted: fb })
                if a == b && (fa || fb || new == old) =>
            {
                Ok(vec![ObjectNode::leaf(a, DiffType::None)])
            }
            (Shape::Object(new_map), Shape::Object(old_map)) if new_map.is_empty() && old_map.is_empty() => {
                Ok(vec![ObjectNode::leaf("{}".into(), DiffType::None)])
            }
            (Shape::Array(new_items), Shape::Array(old_items)) if new_items.is_empty() && old_items.is_empty() => {
                Ok(vec![ObjectNode::leaf("[]".into(), DiffType::None)])
            }
            (Shape::Object(new_map), Shape::Object(old_map)) => {
                let mut children = Vec::with_capacity(new_map.len());
                for (key, value) in new_map {
                    let slot = match old_map.get(key) {
                        Some(old) => Slot::Both(value, old),
                        None => Slot::NewOnly(value),
                    };
                    children.push(self.keyed_diff(key.clone(), slot, depth + 1)?);
                }
                for (key, value) in old_map.iter().filter(|(k, _)| !new_map.contains_key(*k)) {
                    children.push(self.keyed_diff(key.clone(), Slot::OldOnly(value), depth + 1)?);
                }
                Ok(children)
            }
            (Shape::Array(new_items), Shape::Array(old_items)) => (0..new_items.len().max(old_items.len()))
                .filter_map(|i| {
                    Slot::of(new_items.get(i), old_items.get(i))
                        .map(|slot| self.keyed_diff(i.to_string(), slot, depth + 1))
                })
                .collect(),
            (new_shape, old_shape) => {
                let mut children = self.shape_children(&new_shape, DiffType::Added, depth)?;
                children.extend(self.shape_children(&old_shape, DiffType::Deleted, depth)?);
                Ok(children)
            }
        }
    }
}

/// Collapse every `key -> single childless leaf` pair into one node.
///
/// Runs bottom-up; a merged node is marked `combined` so its parent does not
/// absorb it in turn.
fn merge_leaves(mut node: ObjectNode) -> ObjectNode {
    node.children = node.children.into_iter().map(merge_leaves).collect();

    let mergeable = matches!(
        node.children.as_slice(),
        [only] if only.children.is_empty() && !only.combined
    );
    if !mergeable {
        return node;
    }
    match node.children.pop() {
        Some(child) => ObjectNode {
            name: format!("{}: {}", node.name, child.name),
            diff_type: if node.diff_type.is_changed() {
                node.diff_type
            } else {
                child.diff_type
            },
            terminal: child.terminal,
            combined: true,
            children: child.children,
        },
        None => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> ObjectTreeBuilder {
        ObjectTreeBuilder::default()
    }

    fn tagged(node: &ObjectNode) -> Vec<(&str, DiffType)> {
        node.children
            .iter()
            .map(|c| (c.name.as_str(), c.diff_type))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Plain builds
    // -----------------------------------------------------------------------

    #[test]
    fn primitive_root_merges_into_root_name() {
        let tree = builder().build(&json!(42)).unwrap();
        assert_eq!(tree.name, "root: 42");
        assert!(tree.combined);
        assert!(tree.terminal);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn object_keys_merge_with_terminal_values() {
        let tree = builder()
            .build(&json!({"name": "StatusBar", "visible": true, "alpha": 0.5, "parent": null}))
            .unwrap();
        assert_eq!(tree.name, "root");
        assert_eq!(
            tree.child_names(),
            vec!["alpha: 0.5", "name: StatusBar", "parent: null", "visible: true"]
        );
        assert!(tree.children.iter().all(|c| c.combined && c.children.is_empty()));
        assert!(tree.children.iter().all(|c| c.diff_type == DiffType::None));
    }

    #[test]
    fn arrays_are_named_by_index() {
        let tree = builder().build(&json!({"layers": ["a", "b"]})).unwrap();
        let layers = tree.child("layers").unwrap();
        assert_eq!(layers.child_names(), vec!["0: a", "1: b"]);
    }

    #[test]
    fn combined_node_is_not_merged_again() {
        let tree = builder().build(&json!({"a": {"b": 1}})).unwrap();
        let a = tree.child("a").unwrap();
        assert!(!a.combined);
        assert_eq!(a.child_names(), vec!["b: 1"]);
        // The root has a single child too, but it is not a leaf.
        assert_eq!(tree.name, "root");
    }

    #[test]
    fn single_combined_child_blocks_merge() {
        let tree = builder().build(&json!({"a": {"b": {"c": 1}}})).unwrap();
        let b = tree.child("a").unwrap().child("b").unwrap();
        assert_eq!(b.child_names(), vec!["c: 1"]);
    }

    #[test]
    fn empty_containers_render_as_leaves() {
        let tree = builder().build(&json!({"list": [], "map": {}})).unwrap();
        assert_eq!(tree.child_names(), vec!["list: []", "map: {}"]);
    }

    #[test]
    fn object_keys_keep_source_order() {
        let tree = builder().build(&json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        assert_eq!(tree.child_names(), vec!["zeta: 1", "alpha: 2", "mid: 3"]);

        let tree = builder()
            .build_diff(&json!({"zeta": 1, "alpha": 2}), &json!({"gone": 0, "zeta": 1}))
            .unwrap();
        assert_eq!(
            tagged(&tree),
            vec![
                ("zeta: 1", DiffType::None),
                ("alpha: 2", DiffType::Added),
                ("gone: 0", DiffType::Deleted),
            ]
        );
    }

    #[test]
    fn formatter_stops_expansion() {
        let builder = builder().with_formatter(|v| {
            let rect = v.as_object()?;
            Some(format!(
                "({}, {}) - ({}, {})",
                rect.get("left")?,
                rect.get("top")?,
                rect.get("right")?,
                rect.get("bottom")?
            ))
        });
        let tree = builder
            .build(&json!({"bounds": {"left": 0, "top": 0, "right": 10, "bottom": 20}, "z": 3}))
            .unwrap();
        assert_eq!(tree.child_names(), vec!["bounds: (0, 0) - (10, 20)", "z: 3"]);
    }

    #[test]
    fn custom_root_name() {
        let builder = ObjectTreeBuilder::new(BuilderConfig::named("properties"));
        let tree = builder.build(&json!({"x": 1, "y": 2})).unwrap();
        assert_eq!(tree.name, "properties");
        assert_eq!(builder.config().root_name, "properties");
    }

    #[test]
    fn depth_limit_fails_fast() {
        let mut value = json!(1);
        for _ in 0..10 {
            value = json!({ "next": value });
        }
        let builder = ObjectTreeBuilder::new(BuilderConfig {
            max_depth: 5,
            ..Default::default()
        });
        assert_eq!(builder.build(&value).unwrap_err(), DiffError::DepthExceeded { limit: 5 });
        assert_eq!(
            builder.build_diff(&value, &value).unwrap_err(),
            DiffError::DepthExceeded { limit: 5 }
        );
    }

    // -----------------------------------------------------------------------
    // Diff builds
    // -----------------------------------------------------------------------

    #[test]
    fn changed_terminal_becomes_added_and_deleted_leaves() {
        let tree = builder()
            .build_diff(&json!({"a": {"b": 1}}), &json!({"a": {"b": null}}))
            .unwrap();
        let b = tree.child("a").unwrap().child("b").unwrap();
        assert_eq!(b.diff_type, DiffType::None);
        assert_eq!(tagged(b), vec![("1", DiffType::Added), ("null", DiffType::Deleted)]);
    }

    #[test]
    fn identical_values_have_no_changes() {
        let value = json!({"a": [1, {"b": "x"}], "c": null});
        let diffed = builder().build_diff(&value, &value).unwrap();
        assert_eq!(diffed, builder().build(&value).unwrap());
    }

    #[test]
    fn added_and_deleted_keys() {
        let tree = builder()
            .build_diff(&json!({"keep": 1, "new": {"x": 2}}), &json!({"keep": 1, "gone": 3}))
            .unwrap();
        assert_eq!(
            tagged(&tree),
            vec![
                ("keep: 1", DiffType::None),
                ("new", DiffType::Added),
                ("gone: 3", DiffType::Deleted),
            ]
        );
        assert_eq!(tagged(tree.child("new").unwrap()), vec![("x: 2", DiffType::Added)]);
    }

    #[test]
    fn explicit_null_is_not_absence() {
        let tree = builder()
            .build_diff(&json!({"a": null}), &json!({}))
            .unwrap();
        assert_eq!(tagged(&tree), vec![("a: null", DiffType::Added)]);

        let tree = builder()
            .build_diff(&json!({}), &json!({"a": null}))
            .unwrap();
        assert_eq!(tagged(&tree), vec![("a: null", DiffType::Deleted)]);

        let tree = builder()
            .build_diff(&json!({"a": null}), &json!({"a": null}))
            .unwrap();
        assert_eq!(tagged(&tree), vec![("a: null", DiffType::None)]);
    }

    #[test]
    fn same_text_different_value_is_a_change() {
        let tree = builder()
            .build_diff(&json!({"a": "null"}), &json!({"a": null}))
            .unwrap();
        let a = tree.child("a").unwrap();
        assert_eq!(a.diff_type, DiffType::None);
        assert_eq!(tagged(a), vec![("null", DiffType::Added), ("null", DiffType::Deleted)]);

        let tree = builder()
            .build_diff(&json!({"a": "1", "b": true}), &json!({"a": 1, "b": "true"}))
            .unwrap();
        assert_eq!(tagged(tree.child("a").unwrap()), vec![("1", DiffType::Added), ("1", DiffType::Deleted)]);
        assert_eq!(
            tagged(tree.child("b").unwrap()),
            vec![("true", DiffType::Added), ("true", DiffType::Deleted)]
        );
    }

    #[test]
    fn formatted_leaves_compare_by_text() {
        let builder = builder().with_formatter(|v| v.as_f64().map(|n| format!("{n:.0}")));
        let tree = builder
            .build_diff(&json!({"w": 10.2}), &json!({"w": 9.8}))
            .unwrap();
        assert_eq!(tagged(&tree), vec![("w: 10", DiffType::None)]);
    }

    #[test]
    fn array_growth_and_shrink() {
        let tree = builder()
            .build_diff(&json!({"l": [1, 2, 3]}), &json!({"l": [1, 5]}))
            .unwrap();
        let l = tree.child("l").unwrap();
        assert_eq!(l.child_names(), vec!["0: 1", "1", "2: 3"]);
        assert_eq!(
            tagged(l.child("1").unwrap()),
            vec![("2", DiffType::Added), ("5", DiffType::Deleted)]
        );
        assert_eq!(l.child("2: 3").unwrap().diff_type, DiffType::Added);

        let tree = builder()
            .build_diff(&json!({"l": [1]}), &json!({"l": [1, 5]}))
            .unwrap();
        assert_eq!(tagged(tree.child("l").unwrap()), vec![("0: 1", DiffType::None), ("1: 5", DiffType::Deleted)]);
    }

    #[test]
    fn shape_change_lists_both_sides() {
        let tree = builder()
            .build_diff(&json!({"v": {"x": 1}}), &json!({"v": 7}))
            .unwrap();
        let v = tree.child("v").unwrap();
        assert_eq!(tagged(v), vec![("x: 1", DiffType::Added), ("7", DiffType::Deleted)]);
    }

    #[test]
    fn never_reports_modified_or_moves() {
        let tree = builder()
            .build_diff(
                &json!({"a": [3, 2, 1], "b": {"c": true}, "d": "x"}),
                &json!({"a": [1, 2, 3], "b": {"c": false}, "e": "x"}),
            )
            .unwrap();
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            assert!(!matches!(
                node.diff_type,
                DiffType::Modified | DiffType::AddedMove | DiffType::DeletedMove
            ));
            stack.extend(node.children.iter());
        }
    }
}
