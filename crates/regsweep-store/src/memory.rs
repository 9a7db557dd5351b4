//! In-memory registry store for testing and embedding.
//!
//! [`InMemoryStore`] keeps raw tag records and ancestry lists in memory
//! behind `RwLock`s. It implements both [`TagSource`] and [`ImageSink`] and
//! records every delete call it receives, which lets tests assert that a
//! dry run never reaches the write side.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use regsweep_types::ImageId;

use crate::error::{StoreError, StoreResult};
use crate::record::RawTagRecord;
use crate::traits::{ImageSink, TagSource};

/// An in-memory implementation of [`TagSource`] and [`ImageSink`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<RawTagRecord>>,
    /// Present images and their ancestry chains.
    images: RwLock<HashMap<ImageId, Vec<ImageId>>>,
    /// Every id passed to `delete_image`, in call order.
    delete_calls: RwLock<Vec<ImageId>>,
    /// Images whose deletion fails with an I/O error.
    failing: RwLock<HashSet<ImageId>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw record as-is.
    pub fn add_record(&self, record: RawTagRecord) -> StoreResult<()> {
        self.records.write().map_err(poisoned)?.push(record);
        Ok(())
    }

    /// Add a well-formed tag: a pointer record and a metadata record.
    pub fn add_tag(
        &self,
        repository: &str,
        name: &str,
        image: &ImageId,
        last_update_secs: i64,
    ) -> StoreResult<()> {
        self.add_record(RawTagRecord::image_ref(repository, name, image.as_str()))?;
        self.add_record(RawTagRecord::last_update(
            repository,
            name,
            last_update_secs.to_string(),
        ))
    }

    /// Register an image with its ancestry chain (the image itself first).
    ///
    /// Every ancestor is registered as present too, with its own suffix of
    /// the chain as ancestry, unless it is already known.
    pub fn add_image(&self, chain: &[ImageId]) -> StoreResult<()> {
        let mut images = self.images.write().map_err(poisoned)?;
        for (i, image) in chain.iter().enumerate() {
            if i == 0 {
                images.insert(image.clone(), chain.to_vec());
            } else {
                images
                    .entry(image.clone())
                    .or_insert_with(|| chain[i..].to_vec());
            }
        }
        Ok(())
    }

    /// Make every future deletion of `image` fail with an I/O error.
    pub fn fail_deletes_of(&self, image: &ImageId) -> StoreResult<()> {
        self.failing.write().map_err(poisoned)?.insert(image.clone());
        Ok(())
    }

    /// Returns `true` if the image is still present.
    pub fn contains_image(&self, image: &ImageId) -> StoreResult<bool> {
        Ok(self.images.read().map_err(poisoned)?.contains_key(image))
    }

    /// Sorted ids of all images still present.
    pub fn image_ids(&self) -> StoreResult<Vec<ImageId>> {
        let images = self.images.read().map_err(poisoned)?;
        let mut ids: Vec<ImageId> = images.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Every id passed to `delete_image` so far, in call order.
    pub fn delete_calls(&self) -> StoreResult<Vec<ImageId>> {
        Ok(self.delete_calls.read().map_err(poisoned)?.clone())
    }
}

impl TagSource for InMemoryStore {
    fn tag_records(&self) -> StoreResult<Vec<RawTagRecord>> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    fn ancestry(&self, image: &ImageId) -> StoreResult<Vec<ImageId>> {
        self.images
            .read()
            .map_err(poisoned)?
            .get(image)
            .cloned()
            .ok_or_else(|| StoreError::AncestryNotFound(image.clone()))
    }
}

impl ImageSink for InMemoryStore {
    fn delete_image(&self, image: &ImageId) -> StoreResult<bool> {
        self.delete_calls
            .write()
            .map_err(poisoned)?
            .push(image.clone());

        if self.failing.read().map_err(poisoned)?.contains(image) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("cannot remove image {image}"),
            )));
        }

        Ok(self.images.write().map_err(poisoned)?.remove(image).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawTagField;

    fn id(s: &str) -> ImageId {
        ImageId::parse(s).unwrap()
    }

    #[test]
    fn add_tag_yields_two_records() {
        let store = InMemoryStore::new();
        store.add_tag("lib/app", "v1", &id("aaa"), 1234).unwrap();
        let records = store.tag_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field, RawTagField::ImageRef("aaa".into()));
        assert_eq!(records[1].field, RawTagField::LastUpdate("1234".into()));
    }

    #[test]
    fn add_image_registers_ancestors() {
        let store = InMemoryStore::new();
        store.add_image(&[id("a"), id("b"), id("c")]).unwrap();
        assert_eq!(store.ancestry(&id("a")).unwrap(), vec![id("a"), id("b"), id("c")]);
        assert_eq!(store.ancestry(&id("b")).unwrap(), vec![id("b"), id("c")]);
        assert_eq!(store.image_ids().unwrap(), vec![id("a"), id("b"), id("c")]);
    }

    #[test]
    fn add_image_keeps_existing_chains() {
        let store = InMemoryStore::new();
        store.add_image(&[id("b"), id("c")]).unwrap();
        store.add_image(&[id("a"), id("b"), id("c")]).unwrap();
        assert_eq!(store.ancestry(&id("b")).unwrap(), vec![id("b"), id("c")]);
    }

    #[test]
    fn missing_ancestry_is_not_found() {
        let store = InMemoryStore::new();
        assert!(store.ancestry(&id("x")).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryStore::new();
        store.add_image(&[id("a")]).unwrap();
        assert!(store.delete_image(&id("a")).unwrap());
        assert!(!store.delete_image(&id("a")).unwrap());
        assert!(!store.contains_image(&id("a")).unwrap());
        assert_eq!(store.delete_calls().unwrap(), vec![id("a"), id("a")]);
    }

    #[test]
    fn injected_failure_surfaces_as_io_error() {
        let store = InMemoryStore::new();
        store.add_image(&[id("a")]).unwrap();
        store.fail_deletes_of(&id("a")).unwrap();
        assert!(matches!(
            store.delete_image(&id("a")).unwrap_err(),
            StoreError::Io(_)
        ));
        assert!(store.contains_image(&id("a")).unwrap());
    }
}
