//! Tests for the rolling Gantt layout and its SVG rendering.

use chrono::{DateTime, Duration, TimeZone, Utc};
use scanline::config::{StationPalette, StationSet};
use scanline::dashboard::AssetFilter;
use scanline::event::ScanEvent;
use scanline::gantt::{GanttConfig, layout, place_segment, svg};
use scanline::model::{AssetHistory, AssetId, AssetRecord, Segment};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 16, 0, 0).unwrap()
}

fn mins_ago(m: i64) -> DateTime<Utc> {
    now() - Duration::minutes(m)
}

fn history(name: &str, tag: &str, entries: &[(&str, DateTime<Utc>)]) -> AssetHistory {
    let id = AssetId::new();
    AssetHistory {
        record: AssetRecord {
            id,
            tag: tag.to_string(),
            name: name.to_string(),
            last_seen: entries.last().map(|(_, t)| *t),
            active_time_seconds: 0.0,
        },
        scans: entries
            .iter()
            .enumerate()
            .map(|(i, (station, ts))| ScanEvent {
                seq: i as i64 + 1,
                asset_id: id,
                timestamp: *ts,
                station: station.to_string(),
            })
            .collect(),
    }
}

fn segment(station: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Segment {
    Segment {
        station: station.to_string(),
        start,
        end,
    }
}

// ---------------------------------------------------------------------------
// Box geometry
// ---------------------------------------------------------------------------

#[test]
fn segment_covering_whole_window_fills_track() {
    let config = GanttConfig::default();
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station1", mins_ago(600), None),
    )
    .unwrap();

    assert_eq!(b.x, config.left_margin);
    assert_eq!(b.width, config.usable());
    assert_eq!(b.color, "#60a5fa");
}

#[test]
fn segment_in_second_half_starts_mid_track() {
    let config = GanttConfig::default();
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station2", mins_ago(240), Some(mins_ago(120))),
    )
    .unwrap();

    // 960 usable units over 480 minutes: 2 units per minute.
    assert_eq!(config.usable(), 960);
    assert_eq!(b.x, 120 + 480);
    assert_eq!(b.width, 240);
}

#[test]
fn segment_entirely_before_window_is_dropped() {
    let config = GanttConfig::default();
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station1", mins_ago(900), Some(mins_ago(600))),
    );
    assert!(b.is_none());
}

#[test]
fn segment_ending_at_window_start_is_dropped() {
    let config = GanttConfig::default();
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station1", mins_ago(900), Some(mins_ago(480))),
    );
    assert!(b.is_none());
}

#[test]
fn very_short_segment_gets_minimum_width() {
    let config = GanttConfig::default();
    let start = mins_ago(60);
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station3", start, Some(start + Duration::seconds(2))),
    )
    .unwrap();
    assert_eq!(b.width, 1);
}

#[test]
fn open_segment_that_just_started_stays_inside_track() {
    let config = GanttConfig::default();
    let b = place_segment(
        &config,
        &StationPalette::default(),
        now(),
        &segment("Station3", now() - Duration::milliseconds(10), None),
    )
    .unwrap();

    let right = config.left_margin + config.usable();
    assert_eq!(b.width, 1);
    assert!(b.x >= config.left_margin);
    assert!(b.x + b.width <= right);
}

#[test]
fn boxes_always_lie_within_track() {
    let config = GanttConfig::default();
    let palette = StationPalette::default();
    let left = config.left_margin;
    let right = left + config.usable();

    let mut starts = Vec::new();
    for m in (0..=700).step_by(37) {
        starts.push(mins_ago(m));
    }
    for &start in &starts {
        for len_s in [0, 1, 59, 600, 3_600, 40_000] {
            let end = start + Duration::seconds(len_s);
            for end in [Some(end), None] {
                if let Some(b) = place_segment(&config, &palette, now(), &segment("X", start, end)) {
                    assert!(b.width >= 1, "width {} for {start} {end:?}", b.width);
                    assert!(b.x >= left, "x {} for {start} {end:?}", b.x);
                    assert!(b.x + b.width <= right, "right edge {} for {start} {end:?}", b.x + b.width);
                }
            }
        }
    }
}

#[test]
fn unknown_station_gets_fallback_color() {
    let b = place_segment(
        &GanttConfig::default(),
        &StationPalette::default(),
        now(),
        &segment("Paint", mins_ago(30), None),
    )
    .unwrap();
    assert_eq!(b.color, "#a78bfa");
}

// ---------------------------------------------------------------------------
// Full layout
// ---------------------------------------------------------------------------

#[test]
fn rows_sorted_by_name_and_empty_rows_omitted() {
    let config = GanttConfig::default();
    let histories = vec![
        history("Zeta", "Z", &[("Station1", mins_ago(30))]),
        history("Alpha", "A", &[("Station1", mins_ago(90)), ("Station2", mins_ago(45))]),
        // Last scanned before the window; its open segment still reaches now.
        history("Mid", "M", &[("Station2", mins_ago(2000))]),
        // Never scanned.
        history("Nobody", "N", &[]),
    ];

    let chart = layout(&config, &StationPalette::default(), now(), &histories, |_| true);

    let names: Vec<&str> = chart.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    assert_eq!(chart.rows[0].boxes.len(), 2);
    assert_eq!(chart.height, 40 + 3 * (22 + 8) + 30);
    assert_eq!(chart.window_start, now() - Duration::minutes(480));
}

#[test]
fn no_assets_gives_bare_canvas() {
    let chart = layout(&GanttConfig::default(), &StationPalette::default(), now(), &[], |_| true);
    assert!(chart.rows.is_empty());
    assert_eq!(chart.height, 40 + 30);
}

#[test]
fn long_idle_asset_still_shows_its_open_segment() {
    let histories = vec![history(
        "Old",
        "O",
        &[("Station1", mins_ago(2000)), ("Station2", mins_ago(1900))],
    )];
    let chart = layout(&GanttConfig::default(), &StationPalette::default(), now(), &histories, |_| true);

    assert_eq!(chart.rows.len(), 1);
    assert_eq!(chart.rows[0].boxes.len(), 1);
    assert_eq!(chart.rows[0].boxes[0].station, "Station2");
}

#[test]
fn asset_scanned_only_after_now_gets_no_row() {
    let histories = vec![history("Skewed", "S", &[("Station1", now() + Duration::minutes(5))])];
    let chart = layout(&GanttConfig::default(), &StationPalette::default(), now(), &histories, |_| true);
    assert!(chart.rows.is_empty());
}

#[test]
fn filter_selects_rows() {
    let config = GanttConfig::default();
    let stations = StationSet::default();
    let histories = vec![
        history(
            "Done",
            "D",
            &[("Station1", mins_ago(90)), ("Station2", mins_ago(60)), ("Station3", mins_ago(30))],
        ),
        history("Busy", "B", &[("Station1", mins_ago(90)), ("Station2", mins_ago(60))]),
    ];

    let active = AssetFilter::Active;
    let chart = layout(&config, &StationPalette::default(), now(), &histories, |h| {
        active.matches(h, &stations)
    });
    assert_eq!(chart.rows.len(), 1);
    assert_eq!(chart.rows[0].name, "Busy");

    let completed = AssetFilter::Completed;
    let chart = layout(&config, &StationPalette::default(), now(), &histories, |h| {
        completed.matches(h, &stations)
    });
    assert_eq!(chart.rows.len(), 1);
    assert_eq!(chart.rows[0].name, "Done");

    let at2 = AssetFilter::AtStation("Station2".to_string());
    let chart = layout(&config, &StationPalette::default(), now(), &histories, |h| {
        at2.matches(h, &stations)
    });
    assert_eq!(chart.rows[0].name, "Busy");
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

#[test]
fn eight_hour_window_has_one_tick_per_hour() {
    let config = GanttConfig::default();
    let chart = layout(&config, &StationPalette::default(), now(), &[], |_| true);

    assert_eq!(chart.ticks.len(), 9);
    assert_eq!(chart.ticks[0].x, config.left_margin);
    assert_eq!(chart.ticks[8].x, config.left_margin + config.usable());
    assert_eq!(chart.ticks[0].label, "08:00");
    assert_eq!(chart.ticks[1].label, "09:00");
    assert_eq!(chart.ticks[8].label, "16:00");
}

#[test]
fn short_window_still_has_four_intervals() {
    let config = GanttConfig::default().with_window_minutes(60);
    let chart = layout(&config, &StationPalette::default(), now(), &[], |_| true);

    assert_eq!(chart.ticks.len(), 5);
    let labels: Vec<&str> = chart.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["15:00", "15:15", "15:30", "15:45", "16:00"]);
}

#[test]
fn tick_labels_use_configured_offset() {
    let mut config = GanttConfig::default();
    config.label_offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
    let chart = layout(&config, &StationPalette::default(), now(), &[], |_| true);
    assert_eq!(chart.ticks[8].label, "18:00");
}

// ---------------------------------------------------------------------------
// SVG
// ---------------------------------------------------------------------------

#[test]
fn svg_contains_rows_and_escapes_names() {
    let config = GanttConfig::default();
    let histories = vec![history("A&B <1>", "T1", &[("Station1", mins_ago(30))])];
    let chart = layout(&config, &StationPalette::default(), now(), &histories, |_| true);

    let out = svg::render(&chart, &config);
    assert!(out.starts_with("<svg width='1100'"));
    assert!(out.ends_with("</svg>"));
    assert!(out.contains("A&amp;B &lt;1&gt;"));
    assert!(out.contains("fill='#60a5fa'"));
    assert!(out.contains(">16:00</text>"));
}

#[test]
fn svg_emits_one_element_per_tick_track_and_box() {
    let config = GanttConfig::default();
    let histories = vec![
        history("Engine 1", "T1", &[("Station1", mins_ago(90)), ("Station2", mins_ago(30))]),
        history("Engine 2", "T2", &[("Station3", mins_ago(10))]),
    ];
    let chart = layout(&config, &StationPalette::default(), now(), &histories, |_| true);
    let boxes: usize = chart.rows.iter().map(|r| r.boxes.len()).sum();
    assert_eq!(boxes, 3);

    let out = svg::render(&chart, &config);
    assert_eq!(out.matches("<line ").count(), chart.ticks.len());
    // Background, one track per row, one rect per box.
    assert_eq!(out.matches("<rect ").count(), 1 + chart.rows.len() + boxes);
    assert_eq!(out.matches("<title>").count(), boxes);
}
