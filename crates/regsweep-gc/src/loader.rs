//! Metadata loading: raw store records to fully resolved [`Tag`]s.
//!
//! A registry describes each tag with two independent records (pointer and
//! metadata). They are merged by `(repository, name)`, in any arrival
//! order, before each tag's ancestry is resolved. Any malformed, missing or
//! conflicting record aborts the load.

use std::collections::BTreeMap;

use tracing::{debug, info};

use regsweep_store::{RawTagField, RawTagRecord, TagSource};
use regsweep_types::{ImageId, TagKey, UpdateTime};

use crate::error::LoadError;
use crate::tag::Tag;

/// Fields of a tag collected so far.
#[derive(Debug, Default)]
struct PartialTag {
    image: Option<(ImageId, String)>,
    last_update: Option<(UpdateTime, String)>,
}

/// Load every tag in the store with its ancestry resolved.
///
/// The result is sorted by tag key.
pub fn load_tags<S: TagSource + ?Sized>(source: &S) -> Result<Vec<Tag>, LoadError> {
    let records = source.tag_records()?;
    debug!(records = records.len(), "read raw tag records");

    let mut partial: BTreeMap<TagKey, PartialTag> = BTreeMap::new();
    for record in records {
        merge_record(&mut partial, record)?;
    }

    let mut tags = Vec::with_capacity(partial.len());
    for (key, fields) in partial {
        let Some((current_image, _)) = fields.image else {
            return Err(LoadError::Incomplete {
                tag: key,
                missing: "image pointer",
            });
        };
        let Some((last_update, _)) = fields.last_update else {
            return Err(LoadError::Incomplete {
                tag: key,
                missing: "last_update metadata",
            });
        };

        let ancestry = match source.ancestry(&current_image) {
            Ok(chain) => chain,
            Err(source) => return Err(LoadError::Ancestry { tag: key, source }),
        };
        if ancestry.first() != Some(&current_image) {
            return Err(LoadError::AncestryMismatch {
                tag: key,
                image: current_image,
            });
        }

        debug!(
            tag = %key,
            image = %current_image.short(),
            depth = ancestry.len(),
            "resolved tag"
        );
        tags.push(Tag {
            key,
            current_image,
            last_update,
            ancestry,
        });
    }

    info!(tags = tags.len(), "loaded tags");
    Ok(tags)
}

fn merge_record(
    partial: &mut BTreeMap<TagKey, PartialTag>,
    record: RawTagRecord,
) -> Result<(), LoadError> {
    let key = TagKey::new(record.repository.clone(), record.name).map_err(|source| {
        LoadError::InvalidTag {
            repository: record.repository,
            source,
        }
    })?;

    match record.field {
        RawTagField::ImageRef(raw) => {
            let image = ImageId::parse(raw.trim()).map_err(|source| LoadError::MalformedImageRef {
                tag: key.clone(),
                raw: raw.clone(),
                source,
            })?;
            let entry = partial.entry(key.clone()).or_default();
            set_once(&key, "image pointer", &mut entry.image, image, raw)
        }
        RawTagField::LastUpdate(raw) => {
            let time = parse_last_update(&key, &raw)?;
            let entry = partial.entry(key.clone()).or_default();
            set_once(&key, "last_update", &mut entry.last_update, time, raw)
        }
    }
}

/// Store a field, accepting an identical duplicate and rejecting a
/// conflicting one.
fn set_once<T: PartialEq>(
    key: &TagKey,
    field: &'static str,
    slot: &mut Option<(T, String)>,
    value: T,
    raw: String,
) -> Result<(), LoadError> {
    match slot {
        Some((existing, _)) if *existing == value => Ok(()),
        Some((_, first)) => Err(LoadError::Conflict {
            tag: key.clone(),
            field,
            first: first.clone(),
            second: raw,
        }),
        None => {
            *slot = Some((value, raw));
            Ok(())
        }
    }
}

/// Parse a last-update value in seconds. Whole numbers are read exactly;
/// fractional values are truncated.
fn parse_last_update(key: &TagKey, raw: &str) -> Result<UpdateTime, LoadError> {
    let malformed = |reason: String| LoadError::MalformedTimestamp {
        tag: key.clone(),
        raw: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    if let Ok(secs) = trimmed.parse::<i64>() {
        if secs < 0 {
            return Err(malformed("timestamp is before the epoch".into()));
        }
        return Ok(UpdateTime::from_secs(secs));
    }

    let secs: f64 = trimmed.parse().map_err(|e| malformed(format!("{e}")))?;
    UpdateTime::from_fractional_secs(secs).map_err(|e| malformed(e.to_string()))
}
