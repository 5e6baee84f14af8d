//! Foundation types for tracediff.
//!
//! This crate provides the tree and classification vocabulary shared by the
//! diff engine, the property tree builder, and the hierarchy view. Every
//! other tracediff crate depends on `tracediff-types`.
//!
//! # Key Types
//!
//! - [`Node`] / [`NodeAttributes`] - Decoded snapshot tree element and its opaque display bag
//! - [`DiffType`] - Change classification (none, modified, added, deleted, moved)
//! - [`DiffNode`] - A node of an annotated diff tree

pub mod diff_node;
pub mod diff_type;
pub mod error;
pub mod node;

pub use diff_node::{DiffNode, Walk};
pub use diff_type::DiffType;
pub use error::TypeError;
pub use node::{Node, NodeAttributes};
