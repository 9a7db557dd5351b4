use std::path::PathBuf;

use regsweep_types::{ImageId, TypeError};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store root does not exist or is not a directory.
    #[error("store root not found: {0}")]
    RootNotFound(PathBuf),

    /// The ancestry of an image is missing.
    #[error("ancestry not found for image {0}")]
    AncestryNotFound(ImageId),

    /// A metadata file exists but cannot be decoded.
    #[error("corrupt metadata at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// An identifier read from the store failed validation.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] TypeError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Backend-internal failure (e.g. a poisoned lock).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` if the error reports missing data rather than
    /// unreadable data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RootNotFound(_) | Self::AncestryNotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
