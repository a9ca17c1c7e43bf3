//! Secret handling utilities.
//!
//! Re-exports secrecy types so callers (the CLI, tests) can unwrap the
//! database URL without depending on secrecy directly.

pub use secrecy::{ExposeSecret, SecretString};
