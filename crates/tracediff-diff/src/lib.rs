//! Diff engine for tracediff.
//!
//! Compares successive snapshot trees and flattens inspected values into
//! property trees, annotating both with the shared [`DiffType`] vocabulary.
//!
//! # Key Types
//!
//! - [`TreeDiffEngine`] / [`diff_trees`] -- Move-aware hierarchy diff producing a [`DiffNode`] tree
//! - [`IdentityIndex`] -- Whole-tree key lookup used for move detection
//! - [`ObjectTreeBuilder`] / [`ObjectNode`] -- Property trees from JSON values, with optional diff
//!
//! # Quick Start
//!
//! ```rust
//! use tracediff_diff::diff_trees;
//! use tracediff_types::{DiffType, Node};
//!
//! let old = Node::new("1").with_children(vec![Node::new("2"), Node::new("3")]);
//! let new = Node::new("1").with_children(vec![Node::new("3"), Node::new("2")]);
//! let diff = diff_trees(&new, &old).unwrap();
//! assert_eq!(diff.child_ids(), vec!["3", "2"]);
//! assert_eq!(diff.count(DiffType::None), 3);
//! ```
//!
//! [`DiffType`]: tracediff_types::DiffType
//! [`DiffNode`]: tracediff_types::DiffNode

pub mod config;
pub mod error;
pub mod index;
pub mod object_tree;
pub mod tree_diff;

pub use config::BuilderConfig;
pub use error::{DiffError, DiffResult, TreeSide};
pub use index::IdentityIndex;
pub use object_tree::{ObjectNode, ObjectTreeBuilder};
pub use tree_diff::{attributes_differ, diff_trees, node_id, TreeDiffEngine};
