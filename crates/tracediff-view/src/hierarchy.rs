//! Presentation pass over an annotated hierarchy.
//!
//! [`HierarchyView`] prunes a [`DiffNode`] tree according to [`ViewOptions`],
//! attaches chips, and collects pinned nodes. It runs after the diff, so
//! diff tags are carried through untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tracediff_types::{DiffNode, DiffType};

use crate::options::ViewOptions;

/// Chip shown on nodes the decoder marked visible.
pub const VISIBLE_CHIP: &str = "V";
/// Chip shown on nodes the decoder marked missing from the snapshot.
pub const MISSING_CHIP: &str = "MISSING";

/// A node as handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    pub id: String,
    /// Name to display, possibly simplified.
    pub name: String,
    pub kind: String,
    pub diff_type: DiffType,
    pub is_visible: bool,
    pub chips: Vec<String>,
    pub children: Vec<ViewNode>,
    /// The node itself passed the text filter, judged on its full name.
    #[serde(skip)]
    pub matched: bool,
}

impl ViewNode {
    /// Ids of the direct children, in order.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }
}

/// Result of applying a [`HierarchyView`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewTree {
    /// `None` when nothing survived the filters.
    pub root: Option<ViewNode>,
    /// Pinned nodes in the order they were finalised (children first).
    pub pinned: Vec<ViewNode>,
}

/// Applies [`ViewOptions`] to diff trees.
#[derive(Clone, Debug, Default)]
pub struct HierarchyView {
    options: ViewOptions,
}

impl HierarchyView {
    pub fn new(options: ViewOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Prune, decorate, and optionally flatten `tree`.
    pub fn apply(&self, tree: &DiffNode) -> ViewTree {
        let mut pinned = Vec::new();
        let mut root = self.check(tree, false, true, &mut pinned);

        if self.options.flat {
            if let Some(root) = root.as_mut() {
                let mut flattened = Vec::new();
                flatten_into(std::mem::take(&mut root.children), &self.options, &mut flattened);
                root.children = flattened;
            }
        }

        debug!(
            kept = root.as_ref().map_or(0, count),
            pinned = pinned.len(),
            flat = self.options.flat,
            "applied hierarchy view"
        );
        ViewTree { root, pinned }
    }

    fn matches(&self, node: &DiffNode) -> bool {
        self.options.filter_matches(&[
            node.attributes.name.as_str(),
            node.attributes.kind.as_str(),
            node.id.as_str(),
        ])
    }

    /// Returns the decorated node, or `None` if neither it nor any descendant
    /// should be shown.
    ///
    /// A match on an ancestor keeps the whole subtree in the filtered view.
    /// The root is always kept and does not count as a match for its children.
    fn check(
        &self,
        node: &DiffNode,
        ancestor_matched: bool,
        is_root: bool,
        pinned: &mut Vec<ViewNode>,
    ) -> Option<ViewNode> {
        let matched = self.matches(node);
        let mut in_filter = is_root || ancestor_matched || matched;
        let mut in_visible = is_root || node.attributes.is_visible;
        let pass_down = if is_root { ancestor_matched } else { in_filter };

        let children: Vec<ViewNode> = node
            .children
            .iter()
            .filter_map(|child| self.check(child, pass_down, false, pinned))
            .collect();
        if !children.is_empty() {
            in_filter = true;
            in_visible = true;
        }

        if !in_filter || (self.options.only_visible && !in_visible) {
            return None;
        }

        let view = ViewNode {
            id: node.id.clone(),
            name: node
                .attributes
                .display_name(self.options.simplify_names)
                .to_string(),
            kind: node.attributes.kind.clone(),
            diff_type: node.diff_type,
            is_visible: node.attributes.is_visible,
            chips: chips_for(node),
            children,
            matched,
        };
        if self.options.is_pinned(&view.id) {
            pinned.push(view.clone());
        }
        Some(view)
    }
}

fn chips_for(node: &DiffNode) -> Vec<String> {
    let mut chips = node.attributes.chips.clone();
    if node.attributes.is_visible {
        chips.push(VISIBLE_CHIP.to_string());
    }
    if node.attributes.is_missing {
        chips.push(MISSING_CHIP.to_string());
    }
    chips
}

/// Pre-order list of every node that itself passes the filter and, in the
/// only-visible view, is visible. Entries lose their children.
fn flatten_into(children: Vec<ViewNode>, options: &ViewOptions, out: &mut Vec<ViewNode>) {
    for mut child in children {
        let grandchildren = std::mem::take(&mut child.children);
        if child.matched && (!options.only_visible || child.is_visible) {
            out.push(child);
        }
        flatten_into(grandchildren, options, out);
    }
}

fn count(node: &ViewNode) -> usize {
    1 + node.children.iter().map(count).sum::<usize>()
}
