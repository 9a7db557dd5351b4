//! Retention marking: which tags are stale.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use regsweep_types::{TagKey, UpdateTime};

use crate::tag::Tag;

/// The tags classified as stale in one run, with the cutoff used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StaleSet {
    cutoff: Option<UpdateTime>,
    tags: BTreeSet<TagKey>,
}

impl StaleSet {
    /// Tags last updated strictly before this instant are stale. `None`
    /// when the retention window reaches back past the epoch.
    pub fn cutoff(&self) -> Option<UpdateTime> {
        self.cutoff
    }

    /// Returns `true` if the tag is stale.
    pub fn is_stale(&self, key: &TagKey) -> bool {
        self.tags.contains(key)
    }

    /// Number of stale tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no tag is stale.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Stale tag keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &TagKey> {
        self.tags.iter()
    }
}

/// Classify every tag against `now - retention`.
///
/// A tag is stale when its last update is strictly older than the cutoff;
/// a tag updated exactly at the cutoff is live.
pub fn classify_stale(tags: &[Tag], retention: Duration, now: UpdateTime) -> StaleSet {
    let Some(cutoff) = now.checked_sub(retention) else {
        info!(?retention, "retention window precedes the epoch, nothing is stale");
        return StaleSet::default();
    };

    let stale: BTreeSet<TagKey> = tags
        .iter()
        .filter(|tag| tag.last_update < cutoff)
        .inspect(|tag| debug!(tag = %tag.key, last_update = %tag.last_update, "stale"))
        .map(|tag| tag.key.clone())
        .collect();

    info!(
        cutoff = %cutoff,
        live = tags.len().saturating_sub(stale.len()),
        stale = stale.len(),
        "classified tags"
    );
    StaleSet {
        cutoff: Some(cutoff),
        tags: stale,
    }
}
