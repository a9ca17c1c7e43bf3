//! The scan event log.
//!
//! Every accepted scan is appended here exactly once and never rewritten.
//! Timelines, completion and the Gantt view are all recomputed from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::AssetId;

/// One accepted scan of an asset at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Store-assigned insertion sequence. Breaks timestamp ties.
    pub seq: i64,
    pub asset_id: AssetId,
    pub timestamp: DateTime<Utc>,
    pub station: String,
}
