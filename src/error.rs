//! Error types for gopro-transfer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gopro-transfer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gopro-transfer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GoPro SD card not found at {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Media directory '{name}' not found under {dcim}")]
    MediaDirNotFound { name: String, dcim: PathBuf },

    #[error("Failed to copy {source_path} to {dest}: {message}")]
    Copy {
        source_path: PathBuf,
        dest: PathBuf,
        message: String,
    },

    #[error("Destination {dest} already exists with different size ({existing} vs {incoming} bytes)")]
    DestinationConflict {
        dest: PathBuf,
        existing: u64,
        incoming: u64,
    },

    #[error("Copy verification failed for {dest}: expected {expected} bytes, found {actual}")]
    CopyVerification {
        dest: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("Failed to decode telemetry from {path}: {message}")]
    TelemetryDecode { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
