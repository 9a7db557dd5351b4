//! Execution: report the plan, or carry it out.

use std::collections::HashSet;

use tracing::{info, warn};

use regsweep_store::ImageSink;
use regsweep_types::ImageId;

use crate::error::{GcError, GcResult};
use crate::planner::DeletionPlan;
use crate::report::{GcReport, TagSummary};
use crate::retention::StaleSet;
use crate::tag::Tag;

/// Report the run and, unless `pretend` is set, delete the planned images.
///
/// Deletion walks the stale tags in order and removes each planned image of
/// their ancestry once. The first failure aborts the run; images removed
/// before it stay removed. A dry run never calls `sink`.
pub fn execute<W: ImageSink + ?Sized>(
    tags: &[Tag],
    stale: &StaleSet,
    plan: &DeletionPlan,
    sink: &W,
    pretend: bool,
) -> GcResult<GcReport> {
    let (stale_tags, kept_tags): (Vec<&Tag>, Vec<&Tag>) =
        tags.iter().partition(|t| stale.is_stale(&t.key));

    let mut report = GcReport {
        pretend,
        cutoff: stale.cutoff(),
        kept: kept_tags.into_iter().map(TagSummary::from).collect(),
        stale: stale_tags.iter().copied().map(TagSummary::from).collect(),
        planned: plan.iter().cloned().collect(),
        ..Default::default()
    };

    if pretend {
        info!(
            kept = report.kept.len(),
            stale = report.stale.len(),
            planned = report.planned.len(),
            "dry run, nothing deleted"
        );
        return Ok(report);
    }

    let mut handled: HashSet<&ImageId> = HashSet::new();
    for tag in stale_tags {
        for image in tag.ancestry.iter().filter(|img| plan.contains(img)) {
            if !handled.insert(image) {
                continue;
            }
            match sink.delete_image(image) {
                Ok(true) => {
                    info!(tag = %tag.key, image = %image, "deleted image");
                    report.removed.push(image.clone());
                }
                Ok(false) => {
                    warn!(tag = %tag.key, image = %image, "image already absent");
                    report.already_absent.push(image.clone());
                }
                Err(source) => {
                    return Err(GcError::Delete {
                        image: image.clone(),
                        completed: report.collected(),
                        source,
                    });
                }
            }
        }
    }

    info!(
        removed = report.removed.len(),
        already_absent = report.already_absent.len(),
        "collection complete"
    );
    Ok(report)
}
