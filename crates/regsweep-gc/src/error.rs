//! Error types for the collector.

use std::path::PathBuf;

use regsweep_store::StoreError;
use regsweep_types::{ImageId, TagKey, TypeError};

/// The tag/image universe could not be loaded. Always fatal: a partial tag
/// set would make reachability unsound.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The store could not be opened or its tag records listed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A raw tag name failed validation.
    #[error("invalid tag in {repository}: {source}")]
    InvalidTag {
        repository: String,
        #[source]
        source: TypeError,
    },

    /// The last-update value of a tag is not a usable timestamp.
    #[error("malformed last_update {raw:?} for tag {tag}: {reason}")]
    MalformedTimestamp {
        tag: TagKey,
        raw: String,
        reason: String,
    },

    /// The image pointer of a tag is not a valid image id.
    #[error("malformed image reference {raw:?} for tag {tag}: {source}")]
    MalformedImageRef {
        tag: TagKey,
        raw: String,
        #[source]
        source: TypeError,
    },

    /// Only one of the two record kinds was found for a tag.
    #[error("tag {tag} has no {missing} record")]
    Incomplete { tag: TagKey, missing: &'static str },

    /// The same record kind appeared twice with different values.
    #[error("tag {tag} has conflicting {field} records: {first:?} vs {second:?}")]
    Conflict {
        tag: TagKey,
        field: &'static str,
        first: String,
        second: String,
    },

    /// The ancestry of a tag's image could not be read.
    #[error("cannot resolve ancestry of tag {tag}: {source}")]
    Ancestry {
        tag: TagKey,
        #[source]
        source: StoreError,
    },

    /// The ancestry does not start with the tag's current image.
    #[error("ancestry of tag {tag} does not start with its image {image}")]
    AncestryMismatch { tag: TagKey, image: ImageId },
}

/// A configuration file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Terminal error of a collection run.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// Loading failed before anything was deleted.
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    /// A deletion failed. Deletions performed before it stay done.
    #[error("failed to delete image {image} (after {completed} deletions): {source}")]
    Delete {
        image: ImageId,
        completed: usize,
        #[source]
        source: StoreError,
    },
}

impl From<StoreError> for GcError {
    fn from(e: StoreError) -> Self {
        Self::Load(LoadError::Store(e))
    }
}

/// Convenience alias for collector results.
pub type GcResult<T> = Result<T, GcError>;
