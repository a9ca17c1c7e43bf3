//! Ingestion payloads as sent by the readers.
//!
//! Readers post JSON: `{"epc": "...", "station": "..."}` for a scan and
//! `{"epc": "...", "eng": "..."}` for a registration. A scan may carry a
//! device `timestamp` when a reader replays its buffer; otherwise the
//! ingestion clock is used. Anything malformed is rejected before any write.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::timestamp::parse_timestamp;

#[derive(Debug, Deserialize)]
pub struct ScanPayload {
    pub epc: Option<String>,
    pub station: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A validated scan, ready for the ingestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub tag: String,
    pub station: String,
    /// Device-supplied time, if any.
    pub at: Option<DateTime<Utc>>,
}

impl ScanRequest {
    /// Time to ingest at: the device time if given, else `now`.
    pub fn observed_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.at.unwrap_or(now)
    }
}

impl ScanPayload {
    /// Decode and validate a JSON scan body.
    pub fn parse(body: &str) -> Result<ScanRequest> {
        let payload: ScanPayload = serde_json::from_str(body)
            .map_err(|e| Error::InvalidPayload(format!("invalid JSON: {e}")))?;
        payload.validate()
    }

    pub fn validate(self) -> Result<ScanRequest> {
        let tag = required(self.epc, "epc")?;
        let station = required(self.station, "station")?;
        let at = self.timestamp.as_deref().map(parse_timestamp).transpose()?;
        Ok(ScanRequest { tag, station, at })
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub epc: Option<String>,
    pub eng: Option<String>,
}

impl RegisterPayload {
    /// Decode and validate a JSON registration body into `(tag, name)`.
    pub fn parse(body: &str) -> Result<(String, String)> {
        let payload: RegisterPayload = serde_json::from_str(body)
            .map_err(|e| Error::InvalidPayload(format!("invalid JSON: {e}")))?;
        Ok((required(payload.epc, "epc")?, required(payload.eng, "eng")?))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::InvalidPayload(format!("missing field {field}"))),
    }
}
