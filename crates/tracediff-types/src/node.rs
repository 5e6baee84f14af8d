//! Snapshot tree nodes as handed over by the decoding layer.
//!
//! A [`Node`] carries an identifier, an ordered list of children, and an
//! opaque [`NodeAttributes`] bag. Diffing code reads `id` and `children` and
//! copies the attributes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;

/// An immutable element of a decoded snapshot tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier of the entity this node represents.
    pub id: String,
    /// Display attributes, propagated verbatim by the diff engine.
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a childless node whose name equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            attributes: NodeAttributes::named(id.clone()),
            id,
            children: Vec::new(),
        }
    }

    /// Builder-style helper that replaces the children.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Builder-style helper that replaces the attributes.
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Parse a node tree from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TypeError> {
        serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// Always `false`: a node tree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Find a node by id in this subtree (pre-order).
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// The display attributes of a node.
///
/// None of these fields influence structural matching; they are compared
/// only by the caller's modification predicate and otherwise copied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    /// Abbreviated name used when the viewer simplifies names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub is_visible: bool,
    /// Set by the decoder for entities referenced but not present in the snapshot.
    #[serde(default)]
    pub is_missing: bool,
    /// Labels attached by the decoder.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chips: Vec<String>,
    /// Arbitrary decoded payload.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl NodeAttributes {
    /// Attributes with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name to show, honouring the short name when requested.
    pub fn display_name(&self, simplify: bool) -> &str {
        match (&self.short_name, simplify) {
            (Some(short), true) => short,
            _ => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_flattened_attributes() {
        let node = Node::from_json(
            r#"{
                "id": "1",
                "name": "Display",
                "kind": "DisplayContent",
                "is_visible": true,
                "properties": {"layer": 3},
                "children": [{"id": "2"}]
            }"#,
        )
        .unwrap();

        assert_eq!(node.attributes.name, "Display");
        assert_eq!(node.attributes.kind, "DisplayContent");
        assert!(node.attributes.is_visible);
        assert_eq!(node.attributes.properties["layer"], json!(3));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].id, "2");
        assert!(node.children[0].children.is_empty());
    }

    #[test]
    fn invalid_json_is_a_serialization_error() {
        let err = Node::from_json("{\"children\": 3}").unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }

    #[test]
    fn len_and_find() {
        let tree = Node::new("1").with_children(vec![
            Node::new("2"),
            Node::new("3").with_children(vec![Node::new("4")]),
        ]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.find("4").map(|n| n.id.as_str()), Some("4"));
        assert!(tree.find("9").is_none());
    }

    #[test]
    fn display_name_prefers_short_name_when_simplifying() {
        let attrs = NodeAttributes {
            short_name: Some("Task".into()),
            ..NodeAttributes::named("com.example.app.Task#12")
        };
        assert_eq!(attrs.display_name(true), "Task");
        assert_eq!(attrs.display_name(false), "com.example.app.Task#12");
        assert_eq!(NodeAttributes::named("x").display_name(true), "x");
    }
}
