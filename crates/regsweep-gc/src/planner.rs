//! Sweep phase: which images of stale tags can go.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use regsweep_types::ImageId;

use crate::reachability::SafeSet;
use crate::retention::StaleSet;
use crate::tag::Tag;

/// Images planned for physical removal, sorted. Membership is a flag, not a
/// count: an image reached through several stale tags appears once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeletionPlan(BTreeSet<ImageId>);

impl DeletionPlan {
    /// Returns `true` if the image is planned for removal.
    pub fn contains(&self, image: &ImageId) -> bool {
        self.0.contains(image)
    }

    /// Number of planned images.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is planned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Planned image ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageId> {
        self.0.iter()
    }
}

/// Plan the removal of every image that only stale tags reference.
///
/// A stale tag whose current image is safe is skipped whole. Otherwise each
/// image of its ancestry is checked against the safe set on its own, so an
/// ancestor shared with a live tag survives even when the stale tag's own
/// image goes.
pub fn plan_deletions(tags: &[Tag], stale: &StaleSet, safe: &SafeSet) -> DeletionPlan {
    let mut plan = BTreeSet::new();

    for tag in tags.iter().filter(|t| stale.is_stale(&t.key)) {
        if safe.contains(&tag.current_image) {
            debug!(tag = %tag.key, image = %tag.current_image.short(), "current image still live, skipping");
            continue;
        }

        for image in tag.ancestry.iter().filter(|img| !safe.contains(img)) {
            if plan.insert(image.clone()) {
                debug!(tag = %tag.key, image = %image.short(), "planned for deletion");
            }
        }
    }

    info!(images = plan.len(), "planned deletions");
    DeletionPlan(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reachability::compute_safe_set;
    use crate::retention::classify_stale;
    use crate::tag::fixtures::{id, tag};
    use proptest::prelude::*;
    use regsweep_types::UpdateTime;
    use std::time::Duration;

    const NOW: i64 = 1_000_000;
    const LIVE: i64 = NOW;
    const STALE: i64 = 0;

    fn plan(tags: &[Tag]) -> DeletionPlan {
        let stale = classify_stale(tags, Duration::from_secs(10), UpdateTime::from_secs(NOW));
        let safe = compute_safe_set(tags, &stale);
        plan_deletions(tags, &stale, &safe)
    }

    fn ids(plan: &DeletionPlan) -> Vec<ImageId> {
        plan.iter().cloned().collect()
    }

    #[test]
    fn shared_ancestor_with_live_tag_survives() {
        let tags = vec![
            tag("t1", &["a", "b", "c"], LIVE),
            tag("t2", &["d", "b"], STALE),
        ];
        assert_eq!(ids(&plan(&tags)), vec![id("d")]);
    }

    #[test]
    fn lone_stale_tag_loses_whole_chain() {
        let tags = vec![tag("t3", &["e", "f", "g"], STALE)];
        assert_eq!(ids(&plan(&tags)), vec![id("e"), id("f"), id("g")]);
    }

    #[test]
    fn stale_tags_sharing_an_ancestor_plan_it_once() {
        let tags = vec![
            tag("t4", &["x", "y"], STALE),
            tag("t5", &["x", "z"], STALE),
        ];
        let first = plan(&tags);
        assert_eq!(ids(&first), vec![id("x"), id("y"), id("z")]);
        assert_eq!(first, plan(&tags));
    }

    #[test]
    fn stale_tag_on_live_image_is_skipped() {
        // "old" points at an image a live tag still reaches, while its own
        // ancestry also contains an otherwise unreachable image.
        let tags = vec![
            tag("live", &["b", "c"], LIVE),
            tag("old", &["b", "orphan"], STALE),
        ];
        assert!(plan(&tags).is_empty());
    }

    #[test]
    fn stale_tag_pointing_at_live_ancestor_is_skipped() {
        let tags = vec![
            tag("live", &["a", "b", "c"], LIVE),
            tag("old", &["b", "c"], STALE),
        ];
        assert!(plan(&tags).is_empty());
    }

    #[test]
    fn no_stale_tags_plans_nothing() {
        let tags = vec![tag("t1", &["a", "b"], LIVE), tag("t2", &["c"], LIVE)];
        assert!(plan(&tags).is_empty());
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan(&[]).is_empty());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    /// Random forests: each tag's chain is drawn from a small id pool so
    /// that chains overlap often.
    fn arb_tags() -> impl Strategy<Value = Vec<Tag>> {
        let chain = prop::collection::vec(0u8..12, 1..6);
        prop::collection::vec((chain, any::<bool>()), 0..8).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (chain, live))| {
                    let names: Vec<String> = chain.iter().map(|n| format!("img{n}")).collect();
                    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                    tag(&format!("t{i}"), &refs, if live { LIVE } else { STALE })
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn nothing_reachable_from_a_live_tag_is_planned(tags in arb_tags()) {
            let planned = plan(&tags);
            for t in tags.iter().filter(|t| t.last_update.as_secs() == LIVE) {
                for image in t.images() {
                    prop_assert!(!planned.contains(image), "{} planned but live", image);
                }
            }
        }

        #[test]
        fn planning_is_idempotent(tags in arb_tags()) {
            prop_assert_eq!(plan(&tags), plan(&tags));
        }

        #[test]
        fn planning_ignores_tag_order(tags in arb_tags()) {
            let mut reversed = tags.clone();
            reversed.reverse();
            prop_assert_eq!(plan(&tags), plan(&reversed));
        }

        #[test]
        fn stale_tags_on_safe_images_contribute_nothing(tags in arb_tags()) {
            let stale = classify_stale(&tags, Duration::from_secs(10), UpdateTime::from_secs(NOW));
            let safe = compute_safe_set(&tags, &stale);
            let contributing: Vec<Tag> = tags
                .iter()
                .filter(|t| !(stale.is_stale(&t.key) && safe.contains(&t.current_image)))
                .cloned()
                .collect();
            // Dropping skipped stale tags leaves the live set, and so the
            // safe set, unchanged; the plan must not change either.
            prop_assert_eq!(plan(&tags), plan(&contributing));
        }

        #[test]
        fn planned_images_come_from_stale_tags(tags in arb_tags()) {
            let planned = plan(&tags);
            for image in planned.iter() {
                let owned_by_stale = tags
                    .iter()
                    .filter(|t| t.last_update.as_secs() == STALE)
                    .any(|t| t.ancestry.contains(image));
                prop_assert!(owned_by_stale);
            }
        }
    }
}
