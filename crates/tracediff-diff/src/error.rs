//! Error types for the diff crate.

/// Errors that can occur during diff operations.
///
/// Every variant is a caller contract violation; no partial tree is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// Two nodes of the same tree produced the same identity key.
    #[error("duplicate node id {id} in {side} tree")]
    DuplicateId {
        /// The offending key, rendered with `Debug`.
        id: String,
        /// Which input tree contained the duplicate.
        side: TreeSide,
    },

    /// The roots passed to the engine do not share an identity key.
    #[error("root ids differ: new {new}, old {old}")]
    RootMismatch { new: String, old: String },

    /// A value nested deeper than the builder allows.
    #[error("value nesting exceeds the depth limit of {limit}")]
    DepthExceeded { limit: usize },
}

/// Which of the two compared trees an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeSide {
    New,
    Old,
}

impl std::fmt::Display for TreeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Old => write!(f, "old"),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
