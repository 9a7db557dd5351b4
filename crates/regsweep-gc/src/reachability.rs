//! Mark phase: images reachable from live tags.

use std::collections::HashSet;

use tracing::info;

use regsweep_types::ImageId;

use crate::retention::StaleSet;
use crate::tag::Tag;

/// Every image reachable from a live tag. Nothing in it may be deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeSet(HashSet<ImageId>);

impl SafeSet {
    /// Returns `true` if the image is reachable from a live tag.
    pub fn contains(&self, image: &ImageId) -> bool {
        self.0.contains(image)
    }

    /// Number of safe images.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no image is safe.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Safe image ids, sorted.
    pub fn to_sorted_vec(&self) -> Vec<ImageId> {
        let mut ids: Vec<ImageId> = self.0.iter().cloned().collect();
        ids.sort();
        ids
    }
}

/// Union of the current image and full ancestry of every live tag.
///
/// Ancestry chains arrive flattened from the loader, so no graph walk is
/// needed.
pub fn compute_safe_set(tags: &[Tag], stale: &StaleSet) -> SafeSet {
    let safe: HashSet<ImageId> = tags
        .iter()
        .filter(|tag| !stale.is_stale(&tag.key))
        .flat_map(|tag| tag.images())
        .cloned()
        .collect();

    info!(safe_images = safe.len(), "computed safe set");
    SafeSet(safe)
}
