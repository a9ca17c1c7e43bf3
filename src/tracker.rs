//! Tracker: the public API over a store.
//!
//! Writes go through the ingestor; reads fetch a fresh snapshot from the
//! store and project it. Nothing is cached between calls.

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info};

use crate::completion::is_complete;
use crate::config::{StationConfig, StationSet};
use crate::dashboard::{AssetFilter, AssetRow, ListQuery, list_rows};
use crate::error::{Error, Result};
use crate::gantt::{self, GanttChart, GanttConfig};
use crate::ingest::{IngestConfig, Ingestor, ScanRequest};
use crate::model::{AssetRecord, ScanOutcome, Segment};
use crate::store::AssetStore;
use crate::telemetry::metrics;
use crate::telemetry::scan::start_projection_span;
use crate::timeline::build_segments;

/// An asset's reconstructed route.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub asset: AssetRecord,
    pub segments: Vec<Segment>,
    pub complete: bool,
}

pub struct Tracker<S> {
    store: Arc<S>,
    ingestor: Ingestor<S>,
    stations: StationConfig,
    gantt: GanttConfig,
}

impl<S> Clone for Tracker<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ingestor: self.ingestor.clone(),
            stations: self.stations.clone(),
            gantt: self.gantt.clone(),
        }
    }
}

impl<S: AssetStore> Tracker<S> {
    pub fn new(store: Arc<S>, stations: StationConfig, gantt: GanttConfig) -> Self {
        Self::with_ingest_config(store, stations, gantt, IngestConfig::default())
    }

    pub fn with_ingest_config(
        store: Arc<S>,
        stations: StationConfig,
        gantt: GanttConfig,
        ingest: IngestConfig,
    ) -> Self {
        Self {
            ingestor: Ingestor::new(Arc::clone(&store), ingest),
            store,
            stations,
            gantt,
        }
    }

    pub fn stations(&self) -> &StationSet {
        &self.stations.stations
    }

    pub fn gantt_config(&self) -> &GanttConfig {
        &self.gantt
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a tag, or rename the asset already holding it.
    pub async fn register_asset(&self, tag: &str, name: &str) -> Result<AssetRecord> {
        let tag = non_empty(tag, "tag")?;
        let name = non_empty(name, "name")?;
        let record = self.store.register(tag, name).await?;
        metrics::assets_registered().add(1, &[]);
        info!(%tag, %name, id = %record.id, "asset registered");
        Ok(record)
    }

    /// Ingest one scan observed at `now`.
    pub async fn record_scan(
        &self,
        tag: &str,
        station: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome> {
        let tag = non_empty(tag, "tag")?;
        let station = non_empty(station, "station")?;
        self.ingestor.process_scan(tag, station, now).await
    }

    /// Ingest a decoded payload, using its device time when present.
    pub async fn ingest(&self, request: &ScanRequest, now: DateTime<Utc>) -> Result<ScanOutcome> {
        self.record_scan(&request.tag, &request.station, request.observed_at(now))
            .await
    }

    /// Dashboard table rows.
    pub async fn list_rows(&self, query: &ListQuery) -> Result<Vec<AssetRow>> {
        let span = start_projection_span("list_rows");
        let started = Instant::now();
        let histories = self.store.histories().instrument(span.clone()).await?;
        let rows = span.in_scope(|| list_rows(&histories, self.stations(), query));
        span.record("projection.assets", rows.len());
        record_duration("list_rows", started);
        Ok(rows)
    }

    /// Gantt chart of the window ending at `now`.
    pub async fn render_gantt(
        &self,
        filter: &AssetFilter,
        now: DateTime<Utc>,
    ) -> Result<GanttChart> {
        let span = start_projection_span("render_gantt");
        let started = Instant::now();
        let histories = self.store.histories().instrument(span.clone()).await?;
        let stations = self.stations();
        let chart = span.in_scope(|| {
            gantt::layout(
                &self.gantt,
                &self.stations.palette,
                now,
                &histories,
                |h| filter.matches(h, stations),
            )
        });
        span.record("projection.assets", chart.rows.len());
        record_duration("render_gantt", started);
        Ok(chart)
    }

    /// Segments and completion state of the asset holding `tag`.
    pub async fn timeline(&self, tag: &str) -> Result<Timeline> {
        let tag = non_empty(tag, "tag")?;
        let asset = self
            .store
            .find_by_tag(tag)
            .await?
            .ok_or_else(|| Error::NotFound(format!("asset with tag {tag}")))?;
        let scans = self.store.scans_for(asset.id).await?;
        Ok(Timeline {
            segments: build_segments(&scans),
            complete: is_complete(&scans, self.stations()),
            asset,
        })
    }
}

fn non_empty<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::InvalidPayload(format!("missing field {field}")))
    } else {
        Ok(trimmed)
    }
}

fn record_duration(operation: &'static str, started: Instant) {
    metrics::projection_duration_ms().record(
        started.elapsed().as_secs_f64() * 1000.0,
        &[KeyValue::new("operation", operation)],
    );
}
