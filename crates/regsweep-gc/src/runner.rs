//! The collection pipeline end to end.

use std::time::Duration;

use tracing::info;

use regsweep_store::{FsStore, ImageSink, TagSource};
use regsweep_types::UpdateTime;

use crate::config::GcConfig;
use crate::error::GcResult;
use crate::executor::execute;
use crate::loader::load_tags;
use crate::planner::plan_deletions;
use crate::reachability::compute_safe_set;
use crate::report::GcReport;
use crate::retention::classify_stale;

/// Run one collection against `store` using the current time.
pub fn run_gc<S>(store: &S, retention: Duration, pretend: bool) -> GcResult<GcReport>
where
    S: TagSource + ImageSink + ?Sized,
{
    run_gc_at(store, retention, pretend, UpdateTime::now())
}

/// Run one collection as if the current time were `now`.
///
/// Loading finishes before anything is deleted, so a load error leaves the
/// store untouched.
pub fn run_gc_at<S>(
    store: &S,
    retention: Duration,
    pretend: bool,
    now: UpdateTime,
) -> GcResult<GcReport>
where
    S: TagSource + ImageSink + ?Sized,
{
    info!(?retention, pretend, "starting collection");

    let tags = load_tags(store)?;
    let stale = classify_stale(&tags, retention, now);
    let safe = compute_safe_set(&tags, &stale);
    let plan = plan_deletions(&tags, &stale, &safe);
    execute(&tags, &stale, &plan, store, pretend)
}

/// Open the filesystem store named by `config` and run one collection.
pub fn run_from_config(config: &GcConfig) -> GcResult<GcReport> {
    let store = FsStore::open(&config.root)?;
    run_gc(&store, config.retention(), config.pretend)
}
