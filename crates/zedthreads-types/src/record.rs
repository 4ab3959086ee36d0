//! Raw archive rows and their public-facing projection.

use crate::thread::Thread;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row from the threads archive: searchable metadata plus the
/// compressed thread blob. The archive is read-only; records are never
/// written back.
#[derive(Debug, Clone)]
pub struct ThreadRecord {
    pub id: String,
    pub summary: String,
    /// Timestamp text as stored, RFC 3339 with fractional seconds.
    pub updated_at: String,
    pub data_type: String,
    pub data: Vec<u8>,
}

/// The shape handed to callers: record metadata with an optionally decoded
/// thread body.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumableThread {
    pub id: String,
    pub summary: String,
    pub last_update: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
}

impl ConsumableThread {
    /// Assemble the projection. `now` is the fallback used when the stored
    /// timestamp does not parse; taking it as a parameter keeps this a pure
    /// function of its inputs.
    pub fn project(record: &ThreadRecord, thread: Option<Thread>, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id.clone(),
            summary: record.summary.clone(),
            last_update: parse_last_update(&record.updated_at, now),
            thread,
        }
    }
}

/// Parse a stored RFC 3339 timestamp (fractional seconds accepted),
/// falling back to `fallback` when the text does not parse. The fallback
/// is lossy by design: an unparsable timestamp is not an error.
pub fn parse_last_update(text: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or(fallback)
}
