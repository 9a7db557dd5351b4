//! Filesystem store over the docker-registry v1 layout.
//!
//! On-disk format:
//! ```text
//! <root>/repositories/<namespace>/<repo>/tag_<name>        current image id
//! <root>/repositories/<namespace>/<repo>/tag<name>_json    {"last_update": <secs>, ...}
//! <root>/repositories/<namespace>/<repo>/_index_images     ignored
//! <root>/repositories/<namespace>/<repo>/json              ignored
//! <root>/images/<image_id>/ancestry                        ["<image_id>", "<parent>", ...]
//! ```
//!
//! An image is removed by deleting its whole `images/<image_id>` directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use regsweep_types::ImageId;

use crate::error::{StoreError, StoreResult};
use crate::record::RawTagRecord;
use crate::traits::{ImageSink, TagSource};

const REPOSITORIES_DIR: &str = "repositories";
const IMAGES_DIR: &str = "images";
const ANCESTRY_FILE: &str = "ancestry";

/// Files in a repository directory that carry no tag information.
const IGNORED_FILES: &[&str] = &["_index_images", "json"];

/// How a file in a repository directory is interpreted.
#[derive(Debug, PartialEq, Eq)]
enum TagFile<'a> {
    /// `tag<name>_json`: tag metadata.
    Metadata(&'a str),
    /// `tag_<name>`: current image pointer.
    Pointer(&'a str),
    Ignored,
    Unknown,
}

impl<'a> TagFile<'a> {
    fn classify(file_name: &'a str) -> Self {
        if IGNORED_FILES.contains(&file_name) {
            return Self::Ignored;
        }
        // The metadata form is checked first: `tag_x_json` is the metadata
        // of tag `_x`, not the pointer of tag `x_json`.
        if let Some(name) = file_name
            .strip_prefix("tag")
            .and_then(|rest| rest.strip_suffix("_json"))
        {
            return Self::Metadata(name);
        }
        if let Some(name) = file_name.strip_prefix("tag_") {
            return Self::Pointer(name);
        }
        Self::Unknown
    }
}

/// Registry store rooted at a directory on disk.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`. The directory must exist.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RootNotFound(root));
        }
        Ok(Self { root })
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repositories_dir(&self) -> PathBuf {
        self.root.join(REPOSITORIES_DIR)
    }

    fn image_dir(&self, image: &ImageId) -> PathBuf {
        self.root.join(IMAGES_DIR).join(image.as_str())
    }

    /// Repository path of a tag file: its directory relative to
    /// `repositories/`, joined with `/` regardless of platform.
    fn repository_of(repos: &Path, file: &Path) -> String {
        file.parent()
            .and_then(|dir| dir.strip_prefix(repos).ok())
            .map(|rel| {
                rel.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }

    fn read_last_update(path: &Path) -> StoreResult<String> {
        let data = fs::read(path)?;
        let doc: Value = serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        match doc.get("last_update") {
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: format!("last_update is not a number: {other}"),
            }),
            None => Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: "missing last_update".into(),
            }),
        }
    }

    fn read_image_ref(path: &Path) -> StoreResult<String> {
        let data = fs::read_to_string(path)?;
        Ok(data.trim().to_string())
    }
}

impl TagSource for FsStore {
    fn tag_records(&self) -> StoreResult<Vec<RawTagRecord>> {
        let repos = self.repositories_dir();
        if !repos.is_dir() {
            debug!(path = %repos.display(), "no repositories directory, store is empty");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&repos).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy();
            let repository = Self::repository_of(&repos, path);

            match TagFile::classify(&file_name) {
                TagFile::Metadata(name) => {
                    let raw = Self::read_last_update(path)?;
                    debug!(%repository, tag = name, last_update = %raw, "read tag metadata");
                    records.push(RawTagRecord::last_update(repository, name, raw));
                }
                TagFile::Pointer(name) => {
                    let raw = Self::read_image_ref(path)?;
                    debug!(%repository, tag = name, image = %raw, "read tag pointer");
                    records.push(RawTagRecord::image_ref(repository, name, raw));
                }
                TagFile::Ignored => {}
                TagFile::Unknown => {
                    return Err(StoreError::Corrupt {
                        path: path.to_path_buf(),
                        reason: "unrecognized file in repositories tree".into(),
                    });
                }
            }
        }

        Ok(records)
    }

    fn ancestry(&self, image: &ImageId) -> StoreResult<Vec<ImageId>> {
        let path = self.image_dir(image).join(ANCESTRY_FILE);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::AncestryNotFound(image.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            path,
            reason: e.to_string(),
        })
    }
}

impl ImageSink for FsStore {
    fn delete_image(&self, image: &ImageId) -> StoreResult<bool> {
        let dir = self.image_dir(image);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(image = %image, path = %dir.display(), "removed image directory");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(image = %image, "image already absent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
