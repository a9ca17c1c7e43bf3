//! Station route and palette.
//!
//! The route is an ordered list of station names; the last one is final.
//! It is immutable configuration, passed explicitly to the projections
//! rather than read from process-wide state.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_STATIONS: [&str; 3] = ["Station1", "Station2", "Station3"];
const DEFAULT_COLORS: [&str; 3] = ["#60a5fa", "#34d399", "#fbbf24"];
const FALLBACK_COLOR: &str = "#a78bfa";

/// Ordered, non-empty list of stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationSet {
    stations: Vec<String>,
}

impl StationSet {
    pub fn new<I, S>(stations: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stations: Vec<String> = stations.into_iter().map(Into::into).collect();
        if stations.is_empty() {
            return Err(Error::Config("station list must not be empty".to_string()));
        }
        if let Some(blank) = stations.iter().position(|s| s.trim().is_empty()) {
            return Err(Error::Config(format!("station #{blank} has an empty name")));
        }
        Ok(Self { stations })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(String::as_str)
    }

    /// The final station of the route.
    pub fn last(&self) -> &str {
        // Non-empty by construction.
        self.stations.last().map(String::as_str).unwrap_or_default()
    }

    pub fn contains(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }
}

impl Default for StationSet {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Station → fill color. Total: unknown stations get the fallback color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationPalette {
    colors: HashMap<String, String>,
    fallback: String,
}

impl StationPalette {
    pub fn new(colors: HashMap<String, String>, fallback: impl Into<String>) -> Self {
        Self {
            colors,
            fallback: fallback.into(),
        }
    }

    pub fn color(&self, station: &str) -> &str {
        self.colors
            .get(station)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

impl Default for StationPalette {
    fn default() -> Self {
        let colors = DEFAULT_STATIONS
            .iter()
            .zip(DEFAULT_COLORS)
            .map(|(s, c)| (s.to_string(), c.to_string()))
            .collect();
        Self::new(colors, FALLBACK_COLOR)
    }
}

/// On-disk shape of a station file.
#[derive(Debug, Deserialize)]
struct StationFile {
    stations: Vec<String>,
    #[serde(default)]
    default_color: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

/// Route plus palette, loaded together.
#[derive(Debug, Clone, Default)]
pub struct StationConfig {
    pub stations: StationSet,
    pub palette: StationPalette,
}

impl StationConfig {
    /// Load a station file:
    ///
    /// ```toml
    /// stations = ["Intake", "Teardown", "Test"]
    /// default_color = "#a78bfa"
    ///
    /// [colors]
    /// Intake = "#60a5fa"
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read station file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("bad station file {}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: StationFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            stations: StationSet::new(file.stations)?,
            palette: StationPalette::new(
                file.colors,
                file.default_color.unwrap_or_else(|| FALLBACK_COLOR.to_string()),
            ),
        })
    }
}
