//! Annotated output tree of a hierarchy diff.

use serde::{Deserialize, Serialize};

use crate::diff_type::DiffType;
use crate::node::{Node, NodeAttributes};

/// A node of an annotated diff tree.
///
/// Attributes are copied from whichever snapshot is authoritative for the
/// node's [`DiffType`]; the diff tree never shares data with its inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffNode {
    pub id: String,
    pub diff_type: DiffType,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub children: Vec<DiffNode>,
}

impl DiffNode {
    /// Copy a single node (without children) and tag it.
    pub fn from_node(node: &Node, diff_type: DiffType) -> Self {
        Self {
            id: node.id.clone(),
            diff_type,
            attributes: node.attributes.clone(),
            children: Vec::new(),
        }
    }

    /// Copy a whole subtree, tagging every node with the same type.
    pub fn stamped(node: &Node, diff_type: DiffType) -> Self {
        Self {
            children: node
                .children
                .iter()
                .map(|c| Self::stamped(c, diff_type))
                .collect(),
            ..Self::from_node(node, diff_type)
        }
    }

    /// Ids of the direct children, in order.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }

    /// Pre-order iterator over this subtree.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// First node with the given id in pre-order.
    ///
    /// A moved entity appears twice in a diff tree; the ghost or the new
    /// position is returned depending on which comes first.
    pub fn find(&self, id: &str) -> Option<&DiffNode> {
        self.walk().find(|n| n.id == id)
    }

    /// First node with the given id and diff type.
    pub fn find_tagged(&self, id: &str, diff_type: DiffType) -> Option<&DiffNode> {
        self.walk().find(|n| n.id == id && n.diff_type == diff_type)
    }

    /// Number of nodes in this subtree carrying `diff_type`.
    pub fn count(&self, diff_type: DiffType) -> usize {
        self.walk().filter(|n| n.diff_type == diff_type).count()
    }

    /// Returns `true` if no node in this subtree carries a change.
    pub fn is_unchanged(&self) -> bool {
        self.walk().all(|n| !n.diff_type.is_changed())
    }
}

/// Pre-order traversal of a [`DiffNode`] subtree.
pub struct Walk<'a> {
    stack: Vec<&'a DiffNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DiffNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new("1").with_children(vec![
            Node::new("2").with_children(vec![Node::new("4")]),
            Node::new("3"),
        ])
    }

    #[test]
    fn stamped_tags_every_descendant() {
        let diff = DiffNode::stamped(&sample(), DiffType::Deleted);
        assert_eq!(diff.walk().count(), 4);
        assert_eq!(diff.count(DiffType::Deleted), 4);
        assert!(!diff.is_unchanged());
    }

    #[test]
    fn walk_is_pre_order() {
        let diff = DiffNode::stamped(&sample(), DiffType::None);
        let ids: Vec<&str> = diff.walk().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "3"]);
        assert!(diff.is_unchanged());
    }

    #[test]
    fn from_node_drops_children_and_keeps_attributes() {
        let mut node = sample();
        node.attributes.chips.push("HWC".into());
        let diff = DiffNode::from_node(&node, DiffType::Modified);
        assert!(diff.children.is_empty());
        assert_eq!(diff.attributes, node.attributes);
    }

    #[test]
    fn serializes_diff_type_inline() {
        let diff = DiffNode::stamped(&Node::new("7"), DiffType::AddedMove);
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["diff_type"], "ADDED_MOVE");
        assert_eq!(json["name"], "7");
    }

    // ----------------------------------------------------------------
    // Property tests
    // ----------------------------------------------------------------

    fn arb_tree() -> impl proptest::strategy::Strategy<Value = Node> {
        use proptest::prelude::*;
        let leaf = "[a-z]{1,4}".prop_map(Node::new);
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[a-z]{1,4}", prop::collection::vec(inner, 0..4))
                .prop_map(|(id, children)| Node::new(id).with_children(children))
        })
    }

    proptest::proptest! {
        #[test]
        fn stamped_preserves_shape(tree in arb_tree(), idx in 0usize..6) {
            let tag = DiffType::ALL[idx];
            let diff = DiffNode::stamped(&tree, tag);
            proptest::prop_assert_eq!(diff.walk().count(), tree.len());
            proptest::prop_assert_eq!(diff.count(tag), tree.len());
        }
    }
}
