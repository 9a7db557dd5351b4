//! Tag identity.
//!
//! A tag name is only unique within its repository, so the collector keys
//! tags by `(repository, name)`. Ordering follows that tuple, which gives
//! reports a stable, grouped-by-repository order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A tag name qualified by the repository it lives in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagKey {
    /// Repository path relative to the store, e.g. `library/ubuntu`.
    pub repository: String,
    /// Tag name within the repository, e.g. `latest`.
    pub name: String,
}

impl TagKey {
    /// Build a key, validating the tag name.
    pub fn new(repository: impl Into<String>, name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidTagName {
                name,
                reason: "must not be empty".into(),
            });
        }
        if name.contains('/') || name.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidTagName {
                name,
                reason: "must not contain '/' or whitespace".into(),
            });
        }
        Ok(Self {
            repository: repository.into(),
            name,
        })
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repository.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.repository, self.name)
        }
    }
}
