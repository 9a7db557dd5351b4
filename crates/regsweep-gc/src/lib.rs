//! Mark-sweep garbage collection for a registry image store.
//!
//! A run is a strictly sequential pipeline over one snapshot of the store:
//!
//! 1. [`load_tags`] merges raw tag records and resolves each tag's ancestry.
//! 2. [`classify_stale`] splits tags into live and stale against a cutoff.
//! 3. [`compute_safe_set`] marks every image reachable from a live tag.
//! 4. [`plan_deletions`] sweeps: the images of stale tags outside the safe
//!    set.
//! 5. [`execute`] reports the plan, or removes the planned images.
//!
//! [`run_gc`] composes the stages. Each stage returns a new value rather
//! than mutating shared state, so stages can be tested in isolation.
//!
//! # Safety
//!
//! An image reachable from any live tag is never planned for deletion, and
//! a stale tag whose current image is still reachable contributes nothing
//! to the plan.

pub mod config;
pub mod error;
pub mod executor;
pub mod loader;
pub mod planner;
pub mod reachability;
pub mod report;
pub mod retention;
pub mod runner;
pub mod tag;

pub use config::GcConfig;
pub use error::{ConfigError, GcError, GcResult, LoadError};
pub use executor::execute;
pub use loader::load_tags;
pub use planner::{plan_deletions, DeletionPlan};
pub use reachability::{compute_safe_set, SafeSet};
pub use report::{format_row, GcReport, TagSummary, NAME_WIDTH};
pub use retention::{classify_stale, StaleSet};
pub use runner::{run_from_config, run_gc, run_gc_at};
pub use tag::Tag;
