//! Rolling Gantt layout.
//!
//! Turns station segments into pixel boxes over a trailing window that ends
//! at `now`. Geometry is integer display units; x grows with time.

pub mod svg;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::config::{DEFAULT_GANTT_WINDOW_MIN, StationPalette};
use crate::model::{AssetHistory, Segment};
use crate::timeline::build_segments;

/// Canvas geometry and window length.
#[derive(Debug, Clone)]
pub struct GanttConfig {
    pub width: i64,
    pub left_margin: i64,
    pub right_margin: i64,
    pub top_margin: i64,
    pub bottom_margin: i64,
    pub row_height: i64,
    pub row_gap: i64,
    pub window: Duration,
    /// Offset used for tick labels.
    pub label_offset: FixedOffset,
}

impl GanttConfig {
    pub fn with_window_minutes(mut self, minutes: i64) -> Self {
        self.window = Duration::minutes(minutes);
        self
    }

    /// Horizontal span available for boxes.
    pub fn usable(&self) -> i64 {
        (self.width - self.left_margin - self.right_margin).max(0)
    }

    pub fn window_minutes(&self) -> i64 {
        self.window.num_minutes()
    }
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            width: 1100,
            left_margin: 120,
            right_margin: 20,
            top_margin: 40,
            bottom_margin: 30,
            row_height: 22,
            row_gap: 8,
            window: Duration::minutes(DEFAULT_GANTT_WINDOW_MIN),
            label_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttBox {
    pub station: String,
    pub color: String,
    pub x: i64,
    pub width: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttRow {
    pub name: String,
    pub tag: String,
    pub boxes: Vec<GanttBox>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttTick {
    pub x: i64,
    pub at: DateTime<Utc>,
    /// Wall-clock `HH:MM` in the configured offset.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttChart {
    pub window_start: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub rows: Vec<GanttRow>,
    pub ticks: Vec<GanttTick>,
    pub width: i64,
    pub height: i64,
}

/// Lay out every asset that passes `filter` over the window ending at `now`.
///
/// Rows are sorted by asset name. Assets with nothing inside the window get
/// no row.
pub fn layout<F>(
    config: &GanttConfig,
    palette: &StationPalette,
    now: DateTime<Utc>,
    histories: &[AssetHistory],
    filter: F,
) -> GanttChart
where
    F: Fn(&AssetHistory) -> bool,
{
    let window = Window::new(config, now);

    let mut rows: Vec<GanttRow> = histories
        .iter()
        .filter(|h| !h.scans.is_empty() && filter(h))
        .filter_map(|h| {
            let boxes: Vec<GanttBox> = build_segments(&h.scans)
                .iter()
                .filter_map(|seg| window.place(seg, palette))
                .collect();
            (!boxes.is_empty()).then(|| GanttRow {
                name: h.record.name.clone(),
                tag: h.record.tag.clone(),
                boxes,
            })
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let height = config.top_margin
        + rows.len() as i64 * (config.row_height + config.row_gap)
        + config.bottom_margin;

    GanttChart {
        window_start: window.start,
        now,
        rows,
        ticks: ticks(config, &window),
        width: config.width,
        height,
    }
}

/// Place a single segment in the window ending at `now`.
///
/// Returns None when nothing of the segment falls inside the window.
pub fn place_segment(
    config: &GanttConfig,
    palette: &StationPalette,
    now: DateTime<Utc>,
    segment: &Segment,
) -> Option<GanttBox> {
    Window::new(config, now).place(segment, palette)
}

struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    total_ms: i64,
    left: i64,
    usable: i64,
}

impl Window {
    fn new(config: &GanttConfig, now: DateTime<Utc>) -> Self {
        Self {
            start: now - config.window,
            end: now,
            total_ms: config.window.num_milliseconds(),
            left: config.left_margin,
            usable: config.usable(),
        }
    }

    /// Linear time → x offset from the left margin, floored.
    fn offset(&self, span: Duration) -> i64 {
        let ms = span.num_milliseconds().clamp(0, self.total_ms);
        ((ms as i128 * self.usable as i128) / self.total_ms as i128) as i64
    }

    fn place(&self, segment: &Segment, palette: &StationPalette) -> Option<GanttBox> {
        if self.total_ms <= 0 || self.usable <= 0 {
            return None;
        }

        let t0 = segment.start.max(self.start);
        let t1 = segment.end_or(self.end).min(self.end);
        if t1 <= t0 {
            return None;
        }

        let x = self.offset(t0 - self.start);
        // Zero-width boxes would vanish; keep at least one unit, inside the track.
        let width = self.offset(t1 - t0).max(1).min(self.usable - x);

        Some(GanttBox {
            station: segment.station.clone(),
            color: palette.color(&segment.station).to_string(),
            x: self.left + x,
            width,
        })
    }
}

fn ticks(config: &GanttConfig, window: &Window) -> Vec<GanttTick> {
    let steps = (config.window_minutes() / 60).max(4);
    (0..=steps)
        .map(|i| {
            let at = window.start + Duration::milliseconds(window.total_ms * i / steps);
            GanttTick {
                x: window.left + window.usable * i / steps,
                at,
                label: at.with_timezone(&config.label_offset).format("%H:%M").to_string(),
            }
        })
        .collect()
}
