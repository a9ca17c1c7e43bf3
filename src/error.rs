//! Error types for scanline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the caller sent something we could not accept.
    ///
    /// Transports map these to a client-error status; everything else is
    /// a failure on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidPayload(_) | Error::InvalidTimestamp(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
