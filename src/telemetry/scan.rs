//! Scan processing span helpers.
//!
//! One span per ingested scan; the outcome and accrued time are filled in
//! once the store has answered.

use tracing::Span;

use crate::model::ScanOutcome;

/// Start a span for processing one scan.
///
/// `scan.outcome` and `scan.active_time_s` are declared empty and set via
/// [`record_scan_outcome`].
pub fn start_scan_span(tag: &str, station: &str) -> Span {
    tracing::info_span!(
        "scan.process",
        "scan.tag" = tag,
        "scan.station" = station,
        "scan.outcome" = tracing::field::Empty,
        "scan.active_time_s" = tracing::field::Empty,
    )
}

/// Record how a scan ended on its span.
pub fn record_scan_outcome(span: &Span, outcome: ScanOutcome, active_time_seconds: Option<f64>) {
    span.record("scan.outcome", tracing::field::display(outcome));
    if let Some(secs) = active_time_seconds {
        span.record("scan.active_time_s", secs);
    }
}

/// Start a span for a read-side projection (rows, Gantt, timeline).
pub fn start_projection_span(operation: &'static str) -> Span {
    tracing::debug_span!(
        "projection",
        "projection.operation" = operation,
        "projection.assets" = tracing::field::Empty,
    )
}
