use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration for a collection run.
///
/// Every field has a default, so a config file only names what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GcConfig {
    /// Root directory of the registry store.
    pub root: PathBuf,
    /// Tags not updated for this many days are stale.
    pub retention_days: u64,
    /// When `true`, only report what would be deleted.
    pub pretend: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("registry"),
            retention_days: 20,
            pretend: true,
        }
    }
}

impl GcConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The retention window.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(SECS_PER_DAY))
    }
}
