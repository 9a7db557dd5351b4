//! Run report and its two-column text rendering.

use std::fmt;

use serde::Serialize;

use regsweep_types::{ImageId, TagKey, UpdateTime};

use crate::tag::Tag;

/// Width of the tag name column in text reports.
pub const NAME_WIDTH: usize = 32;

/// One tag as it appears in a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub tag: TagKey,
    pub image: ImageId,
    pub last_update: UpdateTime,
    pub depth: usize,
}

impl From<&Tag> for TagSummary {
    fn from(tag: &Tag) -> Self {
        Self {
            tag: tag.key.clone(),
            image: tag.current_image.clone(),
            last_update: tag.last_update,
            depth: tag.ancestry.len(),
        }
    }
}

/// Format one report row: marker, tag name padded to [`NAME_WIDTH`], and
/// the last update time.
///
/// The marker is taken as-is so callers can colour it.
pub fn format_row(marker: &str, summary: &TagSummary) -> String {
    format!(
        "{marker} {:<width$} {}",
        summary.tag.to_string(),
        summary.last_update,
        width = NAME_WIDTH
    )
}

/// Outcome of one collection run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GcReport {
    /// Whether the run was a dry run.
    pub pretend: bool,
    /// Tags last updated before this instant were stale.
    pub cutoff: Option<UpdateTime>,
    /// Live tags, sorted by key.
    pub kept: Vec<TagSummary>,
    /// Stale tags, sorted by key.
    pub stale: Vec<TagSummary>,
    /// Images planned for removal, sorted.
    pub planned: Vec<ImageId>,
    /// Images actually removed, in deletion order. Empty on a dry run.
    pub removed: Vec<ImageId>,
    /// Planned images that were already gone when deleted.
    pub already_absent: Vec<ImageId>,
}

impl GcReport {
    /// Number of images the run removed or found already removed.
    pub fn collected(&self) -> usize {
        self.removed.len() + self.already_absent.len()
    }
}

impl fmt::Display for GcReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.kept {
            writeln!(f, "{}", format_row("+", summary))?;
        }
        for summary in &self.stale {
            writeln!(f, "{}", format_row("-", summary))?;
        }
        if !self.pretend {
            writeln!(
                f,
                "removed {} of {} planned images ({} already absent)",
                self.removed.len(),
                self.planned.len(),
                self.already_absent.len()
            )?;
        }
        Ok(())
    }
}
