//! Scan ingestion: active-time accrual and the append to the scan log.
//!
//! Accrual rule: a scan arriving less than [`IngestConfig::gap_threshold`]
//! after the previous one adds the elapsed time to the asset's active time;
//! a gap at or over the threshold resets it to zero. The first scan of an
//! asset starts it at zero.

pub mod payload;

pub use payload::{RegisterPayload, ScanPayload, ScanRequest};

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, debug, warn};

use crate::error::Result;
use crate::model::{Accrual, AssetRecord, ScanOutcome};
use crate::store::AssetStore;
use crate::telemetry::metrics;
use crate::telemetry::scan::{record_scan_outcome, start_scan_span};
use crate::timestamp::seconds_between;

/// Tuning for the ingestor.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Gap at or over which active time resets.
    pub gap_threshold: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            gap_threshold: Duration::from_secs(10),
        }
    }
}

/// Applies scans to the store, one at a time.
pub struct Ingestor<S> {
    store: Arc<S>,
    config: IngestConfig,
}

impl<S> Clone for Ingestor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: AssetStore> Ingestor<S> {
    pub fn new(store: Arc<S>, config: IngestConfig) -> Self {
        Self { store, config }
    }

    /// Process one scan of `tag` at `station`, observed at `now`.
    ///
    /// Unknown tags are dropped without writing anything and reported as
    /// [`ScanOutcome::IgnoredUnknownTag`]; that is not an error.
    pub async fn process_scan(
        &self,
        tag: &str,
        station: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome> {
        let span = start_scan_span(tag, station);
        let threshold = self.config.gap_threshold.as_secs_f64();

        let updated = self
            .store
            .record_scan(tag, station, now, |record| Accrual {
                last_seen: now,
                active_time_seconds: next_active_time(record, now, threshold),
            })
            .instrument(span.clone())
            .await?;

        let outcome = match updated {
            Some(record) => {
                record_scan_outcome(&span, ScanOutcome::Accepted, Some(record.active_time_seconds));
                metrics::scans_processed().add(1, &[KeyValue::new("result", "accepted")]);
                ScanOutcome::Accepted
            }
            None => {
                span.in_scope(|| debug!("unregistered tag, scan dropped"));
                record_scan_outcome(&span, ScanOutcome::IgnoredUnknownTag, None);
                metrics::scans_processed().add(1, &[KeyValue::new("result", "ignored")]);
                ScanOutcome::IgnoredUnknownTag
            }
        };

        Ok(outcome)
    }
}

/// New active time for `record` given a scan at `now`.
fn next_active_time(record: &AssetRecord, now: DateTime<Utc>, threshold_secs: f64) -> f64 {
    let Some(last_seen) = record.last_seen else {
        return 0.0;
    };

    let delta = seconds_between(last_seen, now);
    if delta < 0.0 {
        // Kept as-is: the negative delta is still added below.
        warn!(
            tag = %record.tag,
            delta_s = delta,
            %last_seen,
            %now,
            "scan predates last-seen time"
        );
        metrics::accrual_negative_delta().add(1, &[]);
    } else if delta >= threshold_secs {
        debug!(tag = %record.tag, gap_s = delta, "gap over threshold, active time reset");
        metrics::accrual_resets().add(1, &[]);
    }

    accrue(Some(last_seen), record.active_time_seconds, now, threshold_secs)
}

/// The accrual rule on its own.
///
/// `None` for `last_seen` means the asset has never been scanned.
pub fn accrue(
    last_seen: Option<DateTime<Utc>>,
    active_time_seconds: f64,
    now: DateTime<Utc>,
    gap_threshold_secs: f64,
) -> f64 {
    match last_seen {
        None => 0.0,
        Some(last) => {
            let delta = seconds_between(last, now);
            if delta < gap_threshold_secs {
                active_time_seconds + delta
            } else {
                0.0
            }
        }
    }
}
