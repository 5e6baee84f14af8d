use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown diff type: {0}")]
    UnknownDiffType(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
