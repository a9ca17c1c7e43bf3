//! Asset registry and scan log on Postgres.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::event::ScanEvent;
use crate::model::{Accrual, AssetId, AssetRecord};
use crate::store::AssetStore;

impl AssetStore for super::Db {
    async fn register(&self, tag: &str, name: &str) -> Result<AssetRecord> {
        let row: AssetRow = sqlx::query_as(
            "INSERT INTO assets (id, tag, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (tag) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, tag, name, last_seen, active_time_seconds",
        )
        .bind(Uuid::new_v4())
        .bind(tag)
        .bind(name)
        .fetch_one(self.pool())
        .await?;
        Ok(row.into())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Option<AssetRecord>> {
        let row: Option<AssetRow> = sqlx::query_as(
            "SELECT id, tag, name, last_seen, active_time_seconds FROM assets WHERE tag = $1",
        )
        .bind(tag)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(AssetRecord::from))
    }

    async fn list_assets(&self) -> Result<Vec<AssetRecord>> {
        let rows: Vec<AssetRow> = sqlx::query_as(
            "SELECT id, tag, name, last_seen, active_time_seconds
             FROM assets ORDER BY name ASC, tag ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(AssetRecord::from).collect())
    }

    async fn scans_for(&self, id: AssetId) -> Result<Vec<ScanEvent>> {
        let rows: Vec<ScanRow> = sqlx::query_as(
            "SELECT seq, asset_id, scanned_at, station FROM scans
             WHERE asset_id = $1
             ORDER BY scanned_at ASC, seq ASC",
        )
        .bind(id.0)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(ScanEvent::from).collect())
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
        let mut tx = self.pool().begin().await?;

        // Row lock: concurrent scans of the same tag queue up here, so each
        // one computes its accrual from the previous one's write.
        let row: Option<AssetRow> = sqlx::query_as(
            "SELECT id, tag, name, last_seen, active_time_seconds
             FROM assets WHERE tag = $1 FOR UPDATE",
        )
        .bind(tag)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let mut record = AssetRecord::from(row);
        let accrual = accrue(&record);

        sqlx::query("UPDATE assets SET last_seen = $1, active_time_seconds = $2 WHERE id = $3")
            .bind(accrual.last_seen)
            .bind(accrual.active_time_seconds)
            .bind(record.id.0)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO scans (asset_id, scanned_at, station) VALUES ($1, $2, $3)")
            .bind(record.id.0)
            .bind(now)
            .bind(station)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        record.last_seen = Some(accrual.last_seen);
        record.active_time_seconds = accrual.active_time_seconds;
        Ok(Some(record))
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    tag: String,
    name: String,
    last_seen: Option<DateTime<Utc>>,
    active_time_seconds: f64,
}

impl From<AssetRow> for AssetRecord {
    fn from(row: AssetRow) -> Self {
        Self {
            id: AssetId(row.id),
            tag: row.tag,
            name: row.name,
            last_seen: row.last_seen,
            active_time_seconds: row.active_time_seconds,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScanRow {
    seq: i64,
    asset_id: Uuid,
    scanned_at: DateTime<Utc>,
    station: String,
}

impl From<ScanRow> for ScanEvent {
    fn from(row: ScanRow) -> Self {
        Self {
            seq: row.seq,
            asset_id: AssetId(row.asset_id),
            timestamp: row.scanned_at,
            station: row.station,
        }
    }
}
