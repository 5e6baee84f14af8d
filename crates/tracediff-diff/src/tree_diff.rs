//! Hierarchy diff: compare two snapshot trees and annotate every node.
//!
//! Nodes are matched by an identity key supplied by the caller. Children of a
//! matched parent are merged with the new order as the skeleton; entries that
//! only exist on the old side are spliced back in as ghosts next to their old
//! predecessor. Whole-tree identity indexes distinguish a reparenting
//! (`AddedMove` / `DeletedMove`) from a plain addition or deletion, so sibling
//! reordering alone never shows up as a change.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use tracediff_types::{DiffNode, DiffType, Node};

use crate::error::{DiffError, DiffResult, TreeSide};
use crate::index::IdentityIndex;

/// Identity key extractor used by [`diff_trees`]: the node's own `id`.
pub fn node_id(node: &Node) -> String {
    node.id.clone()
}

/// Modification check used by [`diff_trees`]: any attribute differs.
pub fn attributes_differ(new: &Node, old: &Node) -> bool {
    new.attributes != old.attributes
}

/// Diff two snapshots keyed by [`Node::id`], flagging any attribute change
/// as a modification.
pub fn diff_trees(new_root: &Node, old_root: &Node) -> DiffResult<DiffNode> {
    TreeDiffEngine::new(node_id, attributes_differ).diff(new_root, old_root)
}

/// Move-aware tree comparison.
///
/// - `id_of` maps a node to its identity key; keys must be unique within
///   each tree.
/// - `is_modified(new, old)` compares the attributes of a matched pair. It
///   is never asked about children.
pub struct TreeDiffEngine<K, F, M> {
    id_of: F,
    is_modified: M,
    _key: PhantomData<fn() -> K>,
}

impl<K, F, M> TreeDiffEngine<K, F, M>
where
    K: Eq + Hash + Debug,
    F: Fn(&Node) -> K,
    M: Fn(&Node, &Node) -> bool,
{
    /// Create an engine from an identity extractor and a modification check.
    pub fn new(id_of: F, is_modified: M) -> Self {
        Self {
            id_of,
            is_modified,
            _key: PhantomData,
        }
    }

    /// Compare `new_root` against `old_root`.
    ///
    /// Both roots must have the same key. The returned tree is rooted at the
    /// new root and owns copies of every attribute it carries.
    pub fn diff(&self, new_root: &Node, old_root: &Node) -> DiffResult<DiffNode> {
        let new_key = (self.id_of)(new_root);
        let old_key = (self.id_of)(old_root);
        if new_key != old_key {
            return Err(DiffError::RootMismatch {
                new: format!("{new_key:?}"),
                old: format!("{old_key:?}"),
            });
        }

        let run = DiffRun {
            engine: self,
            new_index: IdentityIndex::build(new_root, &self.id_of, TreeSide::New)?,
            old_index: IdentityIndex::build(old_root, &self.id_of, TreeSide::Old)?,
        };
        debug!(
            new_nodes = run.new_index.len(),
            old_nodes = run.old_index.len(),
            "built identity indexes"
        );

        let diff = run.matched(new_root, old_root);

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                modified = diff.count(DiffType::Modified),
                added = diff.count(DiffType::Added),
                deleted = diff.count(DiffType::Deleted),
                moved = diff.count(DiffType::AddedMove),
                "hierarchy diff complete"
            );
        }
        Ok(diff)
    }
}

/// State for one comparison: the engine's callbacks plus both indexes.
struct DiffRun<'a, 'e, K, F, M> {
    engine: &'e TreeDiffEngine<K, F, M>,
    new_index: IdentityIndex<'a, K>,
    old_index: IdentityIndex<'a, K>,
}

impl<'a, K, F, M> DiffRun<'a, '_, K, F, M>
where
    K: Eq + Hash + Debug,
    F: Fn(&Node) -> K,
    M: Fn(&Node, &Node) -> bool,
{
    fn key(&self, node: &Node) -> K {
        (self.engine.id_of)(node)
    }

    /// Same key under the same parent on both sides.
    fn matched(&self, new: &'a Node, old: &'a Node) -> DiffNode {
        let diff_type = if (self.engine.is_modified)(new, old) {
            DiffType::Modified
        } else {
            DiffType::None
        };
        DiffNode {
            children: self.merge_children(&new.children, &old.children),
            ..DiffNode::from_node(new, diff_type)
        }
    }

    /// A node whose key exists in the old tree under a different parent. Its
    /// children are compared against wherever the old counterpart lived.
    fn moved_in(&self, new: &'a Node, old_counterpart: &'a Node) -> DiffNode {
        DiffNode {
            children: self.merge_children(&new.children, &old_counterpart.children),
            ..DiffNode::from_node(new, DiffType::AddedMove)
        }
    }

    /// A node with no counterpart at all. Descendants that were reparented
    /// into it from elsewhere are still reported as moves.
    fn added(&self, new: &'a Node) -> DiffNode {
        let children = new
            .children
            .iter()
            .map(|child| match self.old_index.get(&self.key(child)) {
                Some(old) => self.moved_in(child, old),
                None => self.added(child),
            })
            .collect();
        DiffNode {
            children,
            ..DiffNode::from_node(new, DiffType::Added)
        }
    }

    /// An old node that was not consumed at its parent.
    fn ghost(&self, old: &'a Node) -> DiffNode {
        if self.new_index.contains(&self.key(old)) {
            DiffNode::stamped(old, DiffType::DeletedMove)
        } else {
            DiffNode {
                children: old.children.iter().map(|c| self.ghost(c)).collect(),
                ..DiffNode::from_node(old, DiffType::Deleted)
            }
        }
    }

    /// Merge the child lists of a matched (or moved) pair.
    ///
    /// New order is the skeleton. Old children that were not matched here
    /// are inserted right after the output entry of their nearest matched
    /// old predecessor, or at the front if there is none.
    fn merge_children(&self, new_children: &'a [Node], old_children: &'a [Node]) -> Vec<DiffNode> {
        let old_positions: HashMap<K, usize> = old_children
            .iter()
            .enumerate()
            .map(|(i, child)| (self.key(child), i))
            .collect();

        let mut entries: Vec<DiffNode> = Vec::with_capacity(new_children.len());
        // Output position of each old child consumed as a match.
        let mut consumed: Vec<Option<usize>> = vec![None; old_children.len()];

        for child in new_children {
            let key = self.key(child);
            let entry = if let Some(&old_pos) = old_positions.get(&key) {
                consumed[old_pos] = Some(entries.len());
                self.matched(child, &old_children[old_pos])
            } else if let Some(old) = self.old_index.get(&key) {
                self.moved_in(child, old)
            } else {
                self.added(child)
            };
            entries.push(entry);
        }

        if consumed.iter().all(Option::is_some) {
            return entries;
        }

        let mut leading: Vec<DiffNode> = Vec::new();
        let mut trailing: Vec<Vec<DiffNode>> = vec![Vec::new(); entries.len()];
        let mut anchor: Option<usize> = None;
        for (old_child, placed) in old_children.iter().zip(&consumed) {
            match placed {
                Some(pos) => anchor = Some(*pos),
                None => {
                    let ghost = self.ghost(old_child);
                    match anchor {
                        Some(pos) => trailing[pos].push(ghost),
                        None => leading.push(ghost),
                    }
                }
            }
        }

        let mut merged = leading;
        merged.reserve(entries.len() + trailing.iter().map(Vec::len).sum::<usize>());
        for (entry, ghosts) in entries.into_iter().zip(trailing) {
            merged.push(entry);
            merged.extend(ghosts);
        }
        merged
    }
}
