//! GoPro Transfer - SD card media organization tool
//!
//! This library locates a mounted GoPro SD card, enumerates its media files,
//! and transfers them into date-organized destination folders with support
//! for:
//! - Layered configuration (.env file, GOPRO_* environment, CLI flags)
//! - GoPro filename convention parsing (main/chapter files)
//! - Skip/conflict handling on re-runs with explicit overwrite
//! - Size-verified move semantics
//! - Telemetry sidecar extraction (JSON/CSV) delegated to exiftool

pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod locate;
pub mod media;
pub mod telemetry;
pub mod transfer;

pub use cli::{Cli, Command};
pub use config::{Config, TelemetryFormat};
pub use date::{DateKey, DateSource};
pub use error::{Error, Result};
pub use media::{GoProFileInfo, GoProFileKind, MediaFile};
pub use telemetry::{ExifToolDecoder, TelemetryData, TelemetryDecoder};
pub use transfer::{RunSummary, TransferOutcome, TransferResult};
