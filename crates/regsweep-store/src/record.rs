//! Raw tag records as yielded by a store backend.
//!
//! A registry keeps two separate files per tag: a pointer naming the
//! current image and a metadata document carrying the last update time.
//! Backends report each file as its own record; the loader merges them.

use serde::{Deserialize, Serialize};

/// One raw fact about a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTagRecord {
    /// Repository path relative to the store, e.g. `library/ubuntu`.
    pub repository: String,
    /// Tag name as found in the store, not yet validated.
    pub name: String,
    /// The fact this record carries.
    pub field: RawTagField,
}

/// The two record kinds a registry stores per tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawTagField {
    /// Unparsed last-update timestamp, in seconds (may be fractional).
    LastUpdate(String),
    /// Unparsed id of the image the tag currently points at.
    ImageRef(String),
}

impl RawTagRecord {
    /// A metadata record.
    pub fn last_update(
        repository: impl Into<String>,
        name: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            field: RawTagField::LastUpdate(raw.into()),
        }
    }

    /// A pointer record.
    pub fn image_ref(
        repository: impl Into<String>,
        name: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            name: name.into(),
            field: RawTagField::ImageRef(raw.into()),
        }
    }
}
