//! fb_io: the engine's only file-touching crate.
//!
//! - JSON loading of baseline data, simulated scenarios and mapping tables
//! - Per-year constants files layered over the built-in bundles
//! - Canonical JSON (sorted keys, compact) and SHA-256 digests
//!
//! Shared error type (`IoError`) with `From` conversions used across modules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for fb_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors.
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON (de)serialization errors with a location hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Hashing-related errors.
    #[error("hash error: {0}")]
    Hash(String),

    /// Constants bundle rejected (bad domain, duplicate year, unknown year).
    #[error("constants: {0}")]
    Constants(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no JSON pointer; line/column is the best hint.
        let pointer = if e.line() == 0 { "/".to_string() } else { format!("line {} column {}", e.line(), e.column()) };
        IoError::Json { pointer, msg: e.to_string() }
    }
}

impl From<fb_core::CoreError> for IoError {
    fn from(e: fb_core::CoreError) -> Self {
        IoError::Constants(e.to_string())
    }
}

pub mod canonical_json;
pub mod constants;
pub mod hasher;
pub mod loader;

