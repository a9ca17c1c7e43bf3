//! In-memory asset store.
//!
//! One mutex guards records and log together, so `record_scan` is a single
//! critical section per call.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::AssetStore;
use crate::error::Result;
use crate::event::ScanEvent;
use crate::model::{Accrual, AssetId, AssetRecord};

#[derive(Debug, Default)]
struct Inner {
    /// tag → record
    assets: HashMap<String, AssetRecord>,
    scans: Vec<ScanEvent>,
    next_seq: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total scans in the log, across all assets.
    pub async fn scan_count(&self) -> usize {
        self.inner.lock().await.scans.len()
    }

    /// Number of registered assets.
    pub async fn asset_count(&self) -> usize {
        self.inner.lock().await.assets.len()
    }

    /// Overwrite an asset's accrual state, bypassing ingestion.
    ///
    /// For seeding fixtures that start mid-history.
    pub async fn set_accrual(&self, tag: &str, accrual: Accrual) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.assets.get_mut(tag) {
            Some(record) => {
                record.last_seen = Some(accrual.last_seen);
                record.active_time_seconds = accrual.active_time_seconds;
                true
            }
            None => false,
        }
    }
}

impl AssetStore for MemoryStore {
    async fn register(&self, tag: &str, name: &str) -> Result<AssetRecord> {
        let mut inner = self.inner.lock().await;
        let record = inner
            .assets
            .entry(tag.to_string())
            .and_modify(|r| r.name = name.to_string())
            .or_insert_with(|| AssetRecord {
                id: AssetId::new(),
                tag: tag.to_string(),
                name: name.to_string(),
                last_seen: None,
                active_time_seconds: 0.0,
            });
        Ok(record.clone())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Option<AssetRecord>> {
        Ok(self.inner.lock().await.assets.get(tag).cloned())
    }

    async fn list_assets(&self) -> Result<Vec<AssetRecord>> {
        let inner = self.inner.lock().await;
        let mut assets: Vec<AssetRecord> = inner.assets.values().cloned().collect();
        assets.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.tag.cmp(&b.tag)));
        Ok(assets)
    }

    async fn scans_for(&self, id: AssetId) -> Result<Vec<ScanEvent>> {
        let inner = self.inner.lock().await;
        let mut scans: Vec<ScanEvent> = inner
            .scans
            .iter()
            .filter(|s| s.asset_id == id)
            .cloned()
            .collect();
        scans.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.seq.cmp(&b.seq)));
        Ok(scans)
    }

    async fn record_scan<F>(
        &self,
        tag: &str,
        station: &str,
        now: DateTime<Utc>,
        accrue: F,
    ) -> Result<Option<AssetRecord>>
    where
        F: FnOnce(&AssetRecord) -> Accrual + Send,
    {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.assets.get_mut(tag) else {
            return Ok(None);
        };

        let accrual = accrue(record);
        record.last_seen = Some(accrual.last_seen);
        record.active_time_seconds = accrual.active_time_seconds;
        let updated = record.clone();

        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.scans.push(ScanEvent {
            seq,
            asset_id: updated.id,
            timestamp: now,
            station: station.to_string(),
        });

        Ok(Some(updated))
    }
}
