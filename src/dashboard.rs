//! Table rows for the dashboard: filtering, search and sorting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::completion::is_complete;
use crate::config::StationSet;
use crate::model::{AssetHistory, AssetId};

/// Which assets a view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssetFilter {
    /// Not yet complete (includes never-scanned assets).
    #[default]
    Active,
    Completed,
    /// Most recent scan is at this station.
    AtStation(String),
    All,
}

impl AssetFilter {
    /// Parse a filter parameter.
    ///
    /// `active`, `completed`, `all`, or a station of the route. Anything
    /// else shows everything.
    pub fn from_param(param: &str, stations: &StationSet) -> Self {
        match param {
            "active" => AssetFilter::Active,
            "completed" => AssetFilter::Completed,
            "all" => AssetFilter::All,
            st if stations.contains(st) => AssetFilter::AtStation(st.to_string()),
            other => {
                tracing::debug!(filter = other, "unrecognized filter, showing all assets");
                AssetFilter::All
            }
        }
    }

    pub fn matches(&self, history: &AssetHistory, stations: &StationSet) -> bool {
        match self {
            AssetFilter::Active => !is_complete(&history.scans, stations),
            AssetFilter::Completed => is_complete(&history.scans, stations),
            AssetFilter::AtStation(st) => history.current_station() == Some(st.as_str()),
            AssetFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Tag,
    Station,
    #[default]
    LastSeen,
}

impl SortField {
    /// `engine`, `epc`, `station` or `last`; unknown values sort by last seen.
    pub fn from_param(param: &str) -> Self {
        match param {
            "engine" | "name" => SortField::Name,
            "epc" | "tag" => SortField::Tag,
            "station" => SortField::Station,
            _ => SortField::LastSeen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only `desc` sorts descending.
    pub fn from_param(param: &str) -> Self {
        if param == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Parameters of a table listing.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: AssetFilter,
    /// Case-insensitive substring of name or tag. Empty matches everything.
    pub query: String,
    pub sort: SortField,
    pub direction: SortDirection,
}

/// One dashboard table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRow {
    pub name: String,
    pub tag: String,
    pub station: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    /// `MM:SS`
    pub active_time: String,
    pub id: AssetId,
}

/// Filter, search and sort asset histories into table rows.
pub fn list_rows(
    histories: &[AssetHistory],
    stations: &StationSet,
    query: &ListQuery,
) -> Vec<AssetRow> {
    let needle = query.query.to_lowercase();

    let mut rows: Vec<AssetRow> = histories
        .iter()
        .filter(|h| query.filter.matches(h, stations))
        .filter(|h| {
            needle.is_empty()
                || h.record.name.to_lowercase().contains(&needle)
                || h.record.tag.to_lowercase().contains(&needle)
        })
        .map(|h| AssetRow {
            name: h.record.name.clone(),
            tag: h.record.tag.clone(),
            station: h.current_station().map(str::to_string),
            last_seen: h.record.last_seen,
            active_time: format_active_time(h.record.active_time_seconds),
            id: h.record.id,
        })
        .collect();

    rows.sort_by(|a, b| {
        let ord = compare_rows(a, b, query.sort);
        match query.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    rows
}

fn compare_rows(a: &AssetRow, b: &AssetRow, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Tag => a.tag.cmp(&b.tag),
        SortField::Station => a
            .station
            .as_deref()
            .unwrap_or("")
            .cmp(b.station.as_deref().unwrap_or("")),
        SortField::LastSeen => a.last_seen.cmp(&b.last_seen),
    }
}

/// Render active seconds as `MM:SS`, dropping the fraction.
///
/// Minutes are not capped at 59. Negative values display as `00:00`.
pub fn format_active_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
