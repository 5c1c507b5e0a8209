//! Turns the raw release list into the ordered candidate list
//!
//! Steps, in order:
//! 1. single-version override short-circuits everything else
//! 2. map to entries, disabling known negative hits
//! 3. drop disabled entries when hiding negative hits
//! 4. drop entries outside the inclusive min/max bounds
//! 5. sort newest first
//! 6. reverse when inverse ordering is requested
//! 7. keep one entry per major when only the newest major is wanted
//! 8. limit to the result count, always keeping the newest entries
//!
//! With inverse ordering the limit drops entries from the front, so
//! `inverse` with `results = 2` yields the two newest versions oldest first.

use crate::config::Config;
use crate::version::entry::{MappedEntry, RawRelease};
use crate::version::error::StoreError;
use crate::version::store::NegativeHitStorer;
use crate::version::value::Version;

/// Builds the candidate list for a run; performs no I/O beyond store lookups
pub fn filter_and_map<I, S>(
    raw: I,
    config: &Config,
    store: &S,
) -> Result<Vec<MappedEntry>, StoreError>
where
    I: IntoIterator<Item = RawRelease>,
    S: NegativeHitStorer + ?Sized,
{
    if let Some(single) = config.single {
        return Ok(vec![MappedEntry::new(single)]);
    }

    let mut entries = raw
        .into_iter()
        .map(|raw| {
            let version = raw.version();
            let disabled = store.is_negative_hit(config.platform, version)?;
            Ok(MappedEntry::new(version)
                .with_branch_position(raw.branch_position())
                .with_disabled(disabled))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    if config.hide_negative_hits {
        entries.retain(|entry| !entry.is_disabled());
    }

    entries.retain(|entry| within_bounds(entry.version(), config.min, config.max));

    entries.sort_by(|a, b| b.version().cmp(&a.version()));
    entries.dedup_by_key(|entry| entry.version());

    if config.inverse {
        entries.reverse();
    }

    if config.only_newest_major {
        entries = newest_per_major(entries);
    }

    if let Some(limit) = config.results {
        if config.inverse {
            let excess = entries.len().saturating_sub(limit);
            entries.drain(..excess);
        } else {
            entries.truncate(limit);
        }
    }

    Ok(entries)
}

fn within_bounds(version: Version, min: Option<Version>, max: Option<Version>) -> bool {
    min.is_none_or(|min| version >= min) && max.is_none_or(|max| version <= max)
}

/// Keeps one representative per major, in current order
///
/// The representative is the first enabled entry of its major. A major
/// whose entries are all disabled is represented by its first entry.
fn newest_per_major(entries: Vec<MappedEntry>) -> Vec<MappedEntry> {
    let mut representatives: Vec<MappedEntry> = Vec::new();

    for entry in entries {
        let major = entry.version().major();
        match representatives
            .iter_mut()
            .find(|r| r.version().major() == major)
        {
            None => representatives.push(entry),
            Some(current) if current.is_disabled() && !entry.is_disabled() => *current = entry,
            Some(_) => {}
        }
    }

    representatives
}
