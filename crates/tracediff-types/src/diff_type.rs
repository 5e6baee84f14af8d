use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Change classification shared by the hierarchy diff and the property tree
/// builder.
///
/// `Added`/`AddedMove` nodes take their attributes from the new snapshot,
/// `Deleted`/`DeletedMove` nodes from the old one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffType {
    /// Present on both sides, unchanged.
    #[default]
    None,
    /// Present on both sides under the same parent, attributes changed.
    Modified,
    /// Only present in the new snapshot.
    Added,
    /// Only present in the old snapshot.
    Deleted,
    /// Present in both snapshots; this is its new position under a new parent.
    AddedMove,
    /// Present in both snapshots; this is the ghost left at its old parent.
    DeletedMove,
}

impl DiffType {
    /// All variants, in declaration order.
    pub const ALL: [DiffType; 6] = [
        DiffType::None,
        DiffType::Modified,
        DiffType::Added,
        DiffType::Deleted,
        DiffType::AddedMove,
        DiffType::DeletedMove,
    ];

    /// Returns `true` for `Added` and `AddedMove`.
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added | Self::AddedMove)
    }

    /// Returns `true` for `Deleted` and `DeletedMove`.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted | Self::DeletedMove)
    }

    /// Returns `true` for either half of a reparenting.
    pub fn is_move(&self) -> bool {
        matches!(self, Self::AddedMove | Self::DeletedMove)
    }

    /// Returns `true` for anything but `None`.
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The canonical upper-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Modified => "MODIFIED",
            Self::Added => "ADDED",
            Self::Deleted => "DELETED",
            Self::AddedMove => "ADDED_MOVE",
            Self::DeletedMove => "DELETED_MOVE",
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownDiffType(s.to_string()))
    }
}
