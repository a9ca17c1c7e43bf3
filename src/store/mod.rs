//! Asset repository abstraction.
//!
//! The ingestor and the projections depend only on [`AssetStore`]. The
//! Postgres [`Db`](crate::db::Db) is the production implementation;
//! [`MemoryStore`] backs tests and local tooling.

pub mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::error::Result;
use crate::event::ScanEvent;
use crate::model::{Accrual, AssetHistory, AssetId, AssetRecord};

/// Read/upsert/append access to asset records and the scan log.
pub trait AssetStore: Send + Sync {
    /// Create the asset, or rename it if the tag is already registered.
    ///
    /// An existing asset keeps its id, last-seen time and accrued time.
    fn register(&self, tag: &str, name: &str) -> impl Future<Output = Result<AssetRecord>> + Send;

    fn find_by_tag(&self, tag: &str) -> impl Future<Output = Result<Option<AssetRecord>>> + Send;

    /// All assets, ordered by name.
    fn list_assets(&self) -> impl Future<Output = Result<Vec<AssetRecord>>> + Send;

    /// Scan log of one asset, ordered by timestamp then insertion sequence.
    fn scans_for(&self, id: AssetId) -> impl Future<Output = Result<Vec<ScanEvent>>> + Send;

    /// Apply a scan to the asset registered under `tag`.
    ///
    /// Looks the asset up, computes its new accrual with `accrue`, persists
    /// it and appends `{asset, now, station}` to the log, all while holding
    /// the asset's write lock so concurrent scans of one tag serialize.
    /// Returns the updated record, or None if the tag is unknown (in which
    /// case nothing is written).
    fn record_scan<F>(
        &self,
        tag: &str,
        station: &str,
        now: DateTime<Utc>,
        accrue: F,
    ) -> impl Future<Output = Result<Option<AssetRecord>>> + Send
    where
        F: FnOnce(&AssetRecord) -> Accrual + Send;

    /// Every asset with its scan log, for the read-side projections.
    fn histories(&self) -> impl Future<Output = Result<Vec<AssetHistory>>> + Send {
        async move {
            let assets = self.list_assets().await?;
            let mut out = Vec::with_capacity(assets.len());
            for record in assets {
                let scans = self.scans_for(record.id).await?;
                out.push(AssetHistory { record, scans });
            }
            Ok(out)
        }
    }
}
