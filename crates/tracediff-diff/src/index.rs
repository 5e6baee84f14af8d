//! Flat identity indexes over a whole tree.
//!
//! Move detection needs to know whether an id exists *anywhere* in the other
//! snapshot, not just among the siblings being merged. An [`IdentityIndex`]
//! answers that with a single hash lookup.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracediff_types::Node;

use crate::error::{DiffError, DiffResult, TreeSide};

/// Map from identity key to node, covering every node of one tree.
#[derive(Debug)]
pub struct IdentityIndex<'a, K> {
    nodes: HashMap<K, &'a Node>,
}

impl<'a, K> IdentityIndex<'a, K>
where
    K: Eq + Hash + Debug,
{
    /// Index every node under `root` (inclusive).
    ///
    /// Returns [`DiffError::DuplicateId`] if two nodes share a key.
    pub fn build<F>(root: &'a Node, id_of: &F, side: TreeSide) -> DiffResult<Self>
    where
        F: Fn(&Node) -> K,
    {
        let mut nodes = HashMap::with_capacity(root.len());
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let key = id_of(node);
            if nodes.contains_key(&key) {
                return Err(DiffError::DuplicateId {
                    id: format!("{key:?}"),
                    side,
                });
            }
            nodes.insert(key, node);
            stack.extend(node.children.iter().rev());
        }
        Ok(Self { nodes })
    }

    /// The node with the given key, wherever it sits in the tree.
    pub fn get(&self, key: &K) -> Option<&'a Node> {
        self.nodes.get(key).copied()
    }

    /// Returns `true` if some node in the tree has this key.
    pub fn contains(&self, key: &K) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
