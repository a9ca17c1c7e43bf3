//! Core data model.
//!
//! An asset (an engine on the line) is identified externally by its tag and
//! internally by a store-assigned id. Its scan history is kept in the event
//! log (see [`crate::event`]); everything else here is either the asset's
//! accrual state or a projection derived from that log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::ScanEvent;

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Newtype for asset IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered asset and its accrual state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,

    /// External identifier presented by the reader (the EPC of the tag).
    pub tag: String,

    /// Human label. Mutable; registration with an existing tag renames.
    pub name: String,

    /// Time of the most recent accepted scan. None until the first scan.
    pub last_seen: Option<DateTime<Utc>>,

    /// Seconds of continuous observation. Reset by long gaps.
    pub active_time_seconds: f64,
}

/// An asset together with its ordered scan log, as read from the store.
#[derive(Debug, Clone)]
pub struct AssetHistory {
    pub record: AssetRecord,
    pub scans: Vec<ScanEvent>,
}

impl AssetHistory {
    /// Station of the most recent scan, if any.
    pub fn current_station(&self) -> Option<&str> {
        self.scans.last().map(|s| s.station.as_str())
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// What happened to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Accrual updated and the scan appended to the log.
    Accepted,
    /// The tag is not registered. Nothing was written.
    IgnoredUnknownTag,
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScanOutcome::Accepted => "accepted",
            ScanOutcome::IgnoredUnknownTag => "ignored_unknown_tag",
        };
        write!(f, "{s}")
    }
}

/// Accrual state to persist for an asset after a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accrual {
    pub last_seen: DateTime<Utc>,
    pub active_time_seconds: f64,
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A contiguous stay at one station, derived from the scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub station: String,
    pub start: DateTime<Utc>,
    /// When the asset left. None means the segment is still open.
    pub end: Option<DateTime<Utc>>,
}

impl Segment {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// End of the segment, with an open end resolved to `now`.
    pub fn end_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }
}
