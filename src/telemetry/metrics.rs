//! Metric instrument factories for scanline.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"scanline"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for scanline instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("scanline")
}

/// Counter: scans received by the ingestor.
/// Labels: `result` ("accepted" | "ignored").
pub fn scans_processed() -> Counter<u64> {
    meter()
        .u64_counter("scanline.scans.processed")
        .with_description("Number of scans received")
        .build()
}

/// Counter: accrual resets caused by a gap at or over the threshold.
pub fn accrual_resets() -> Counter<u64> {
    meter()
        .u64_counter("scanline.accrual.resets")
        .with_description("Active-time resets after a long gap")
        .build()
}

/// Counter: scans whose time preceded the asset's last-seen time.
pub fn accrual_negative_delta() -> Counter<u64> {
    meter()
        .u64_counter("scanline.accrual.negative_delta")
        .with_description("Scans older than the stored last-seen time")
        .build()
}

/// Counter: asset registrations (new or rename).
pub fn assets_registered() -> Counter<u64> {
    meter()
        .u64_counter("scanline.assets.registered")
        .with_description("Number of asset registrations")
        .build()
}

/// Histogram: projection duration in milliseconds.
/// Labels: `operation`.
pub fn projection_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("scanline.projection.duration_ms")
        .with_description("Read-side projection duration in milliseconds")
        .with_unit("ms")
        .build()
}
