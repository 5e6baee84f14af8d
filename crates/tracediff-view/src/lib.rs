//! Hierarchy presentation for tracediff.
//!
//! Turns an annotated [`DiffNode`](tracediff_types::DiffNode) tree into what a
//! hierarchy panel shows: filtered by text and visibility, optionally
//! flattened, decorated with chips, and with pinned nodes collected.

pub mod hierarchy;
pub mod options;

pub use hierarchy::{HierarchyView, ViewNode, ViewTree, MISSING_CHIP, VISIBLE_CHIP};
pub use options::ViewOptions;
