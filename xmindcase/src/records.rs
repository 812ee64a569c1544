//! Persisted flat-record interchange.
//!
//! Storage keeps a JSON array of [`CaseRecord`]s per uploaded document. Reading is
//! lenient: a payload that is not an array is treated as "no cases", and a single
//! unreadable record is dropped without losing the rest.

use serde_json::Value;
use snafu::prelude::*;
use tracing::warn;

use crate::{
    Result,
    error::{DeserializationSnafu, SerializationSnafu},
    model::CaseRecord,
};

/// Parse a persisted record array, reporting malformed content.
pub fn try_records_from_json(text: &str) -> Result<Vec<CaseRecord>> {
    serde_json::from_str(text).context(DeserializationSnafu {
        what: "case records",
    })
}

/// Parse a persisted record array. Blank or malformed content yields an empty list;
/// records that fail to decode are skipped.
pub fn records_from_json(text: &str) -> Vec<CaseRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let items: Vec<Value> = match serde_json::from_str(text) {
        Ok(items) => items,
        Err(err) => {
            warn!("stored case records unreadable, treating as empty: {err}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(index, "skipping unreadable case record: {err}");
                None
            }
        })
        .collect()
}

/// Serialize records to the persisted JSON form.
pub fn records_to_json(records: &[CaseRecord]) -> Result<String> {
    serde_json::to_string(records).context(SerializationSnafu)
}

/// Keep only the records at the listed indices, in the listed order.
///
/// `selection` is a comma-separated index list such as `"0,2,5"`. Entries that are not
/// plain non-negative integers, and indices past the end, are skipped.
pub fn select_cases(records: &[CaseRecord], selection: &str) -> Vec<CaseRecord> {
    selection
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty() && item.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|item| item.parse::<usize>().ok())
        .filter_map(|idx| records.get(idx).cloned())
        .collect()
}
