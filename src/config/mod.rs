//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! Sensitive values wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;
pub mod stations;

pub use stations::{StationConfig, StationPalette, StationSet};

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Default length of the rolling Gantt window, in minutes.
pub const DEFAULT_GANTT_WINDOW_MIN: i64 = 480;

#[derive(Debug)]
pub struct Config {
    pub database_url: SecretString,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
    /// TOML file describing the station route. Built-in route when unset.
    pub stations_file: Option<PathBuf>,
    pub gantt_window_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In production, systemd EnvironmentFile provides the vars.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: SecretString::from(required_var("DATABASE_URL")?),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            stations_file: std::env::var("SCANLINE_STATIONS").ok().map(PathBuf::from),
            gantt_window_minutes: window_minutes()?,
        })
    }

    /// Station route and palette, from `stations_file` or the built-in default.
    pub fn station_config(&self) -> Result<StationConfig> {
        match &self.stations_file {
            Some(path) => StationConfig::load(path),
            None => Ok(StationConfig::default()),
        }
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

fn window_minutes() -> Result<i64> {
    let Ok(raw) = std::env::var("GANTT_WINDOW_MIN") else {
        return Ok(DEFAULT_GANTT_WINDOW_MIN);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!(
            "GANTT_WINDOW_MIN must be a positive integer, got {raw:?}"
        ))),
    }
}
