//! # scanline
//!
//! Tracks engines through a fixed route of work stations from a stream of
//! tag scans: active-time accrual on ingestion, station timelines and route
//! completion derived from the scan log, and a rolling Gantt layout.
//!
//! Storage is Postgres (sqlx) behind the [`store::AssetStore`] trait;
//! observability is tracing with optional OpenTelemetry export.

pub mod completion;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod event;
pub mod gantt;
pub mod ingest;
pub mod model;
pub mod store;
pub mod telemetry;
pub mod timeline;
pub mod timestamp;
pub mod tracker;

pub use tracker::{Timeline, Tracker};
