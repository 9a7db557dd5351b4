use serde::{Deserialize, Serialize};

use regsweep_types::{ImageId, TagKey, UpdateTime};

/// A fully loaded tag: its pointer, its last update, and the flattened
/// lineage of the image it points at.
///
/// `ancestry` is never empty and its first element is `current_image`; the
/// loader rejects records that violate this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Repository-qualified tag name.
    pub key: TagKey,
    /// The image the tag currently points at.
    pub current_image: ImageId,
    /// When the tag was last pushed.
    pub last_update: UpdateTime,
    /// Image ids from `current_image` back to the base image.
    pub ancestry: Vec<ImageId>,
}

impl Tag {
    /// Ancestors of the current image, excluding the image itself.
    pub fn parents(&self) -> &[ImageId] {
        self.ancestry.get(1..).unwrap_or_default()
    }

    /// Every image this tag references: the current image and its lineage.
    pub fn images(&self) -> impl Iterator<Item = &ImageId> {
        std::iter::once(&self.current_image).chain(self.ancestry.iter())
    }
}
