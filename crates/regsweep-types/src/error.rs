use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid image id {id:?}: {reason}")]
    InvalidImageId { id: String, reason: String },

    #[error("invalid tag name {name:?}: {reason}")]
    InvalidTagName { name: String, reason: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
