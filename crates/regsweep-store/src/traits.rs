use regsweep_types::ImageId;

use crate::error::StoreResult;
use crate::record::RawTagRecord;

/// Read side of a registry store.
///
/// Implementations must present a consistent snapshot for the duration of a
/// collection run; the collector assumes no concurrent writers.
pub trait TagSource: Send + Sync {
    /// Every raw tag record in the store.
    ///
    /// Returns an empty vec for a store without repositories.
    fn tag_records(&self) -> StoreResult<Vec<RawTagRecord>>;

    /// The lineage of an image, the image itself first, then its parent,
    /// up to the base image.
    ///
    /// Returns `Err` when the ancestry is missing or cannot be decoded.
    fn ancestry(&self, image: &ImageId) -> StoreResult<Vec<ImageId>>;
}

/// Write side of a registry store. Only the collector's executor uses it.
pub trait ImageSink: Send + Sync {
    /// Physically remove an image. Returns `true` if the image existed.
    ///
    /// Removing an image that is already gone is success (`Ok(false)`), so
    /// an interrupted run can simply be repeated.
    fn delete_image(&self, image: &ImageId) -> StoreResult<bool>;
}
