//! Configuration types and layered resolution
//!
//! Effective configuration is built once per run: compiled defaults, then an
//! optional `.env` file, then `GOPRO_*` environment variables, then CLI flag
//! overrides. The resulting [`Config`] is immutable and passed by reference
//! into each component.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable prefix shared by all settings
pub const ENV_PREFIX: &str = "GOPRO_";

/// Output format for telemetry sidecar files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryFormat {
    /// Single `<name>_telemetry.json` sidecar
    Json,
    /// Per-channel `<name>_<channel>.csv` sidecars
    Csv,
}

impl TelemetryFormat {
    fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(TelemetryFormat::Json),
            "csv" => Ok(TelemetryFormat::Csv),
            other => Err(Error::Config(format!(
                "Unknown telemetry format '{other}' (expected 'json' or 'csv')"
            ))),
        }
    }
}

/// Configuration for a transfer run
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the mounted GoPro SD card
    pub source_path: PathBuf,

    /// Base destination directory for organized files
    pub destination_path: PathBuf,

    /// Media directory name under DCIM (e.g. `100GOPRO`).
    /// `None` enumerates every GoPro media folder on the card.
    pub media_dir: Option<String>,

    /// chrono format string for date folder names
    pub date_format: String,

    /// File extensions to transfer (matched case-insensitively)
    pub file_extensions: Vec<String>,

    /// Move files instead of copying
    pub move_files: bool,

    /// Overwrite destination files that exist with a different size
    pub overwrite: bool,

    /// Extract telemetry sidecars for transferred videos
    pub extract_telemetry: bool,

    /// Sidecar formats to write when telemetry extraction is enabled
    pub telemetry_formats: Vec<TelemetryFormat>,

    /// Log level for console and file output
    pub log_level: String,

    /// Explicit log file path (overrides the daily-rolling default)
    pub log_file: Option<PathBuf>,

    /// Directory for daily-rolling log files
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("/Volumes/GoPro"),
            destination_path: home_dir().join("Documents/Videos/GoPro"),
            media_dir: Some("100GOPRO".to_string()),
            date_format: "%Y-%m-%d".to_string(),
            file_extensions: vec![".MP4".into(), ".JPG".into(), ".RAW".into()],
            move_files: false,
            overwrite: false,
            extract_telemetry: false,
            telemetry_formats: vec![TelemetryFormat::Json],
            log_level: "info".to_string(),
            log_file: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Build configuration from defaults, `.env` file, and environment
    ///
    /// The `.env` file (if present in the working directory) is loaded into
    /// the process environment first, so its keys resolve exactly like real
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(env_file = %path.display(), "Loaded .env file"),
            Err(dotenvy::Error::Io(_)) => {} // no .env file, fine
            Err(e) => return Err(e.into()),
        }

        let mut config = Self::default();

        if let Some(v) = env_var("SOURCE_PATH") {
            config.source_path = expand_path(&v);
        }
        if let Some(v) = env_var("DESTINATION_PATH") {
            config.destination_path = expand_path(&v);
        }
        if let Some(v) = env_var("MEDIA_DIR") {
            config.media_dir = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = env_var("DATE_FORMAT") {
            config.date_format = v;
        }
        if let Some(v) = env_var("FILE_EXTENSIONS") {
            config.file_extensions = parse_extension_list(&v);
        }
        if let Some(v) = env_var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = env_var("LOG_FILE") {
            config.log_file = Some(expand_path(&v));
        }
        if let Some(v) = env_var("LOG_DIR") {
            config.log_dir = Some(expand_path(&v));
        }

        Ok(config)
    }

    /// Check whether a file extension is in the configured set
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.file_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').to_lowercase() == ext)
    }

    /// Parse a comma-separated telemetry format list (e.g. `json,csv`)
    pub fn parse_telemetry_formats(s: &str) -> Result<Vec<TelemetryFormat>> {
        let mut formats = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let format = TelemetryFormat::parse(part)?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(Error::Config(format!("No telemetry formats in '{s}'")));
        }
        Ok(formats)
    }

    /// Directory for daily-rolling log files, with the default fallback
    pub fn log_directory(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".logs/gopro-transfer"))
    }

    /// Validate settings that must hold before any transfer starts
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(Error::Config("Date format must not be empty".into()));
        }
        if self.file_extensions.is_empty() {
            return Err(Error::Config("At least one file extension is required".into()));
        }
        if self.destination_path.starts_with(&self.source_path) {
            return Err(Error::Config(format!(
                "Destination {} is inside the source {}",
                self.destination_path.display(),
                self.source_path.display()
            )));
        }
        Ok(())
    }
}

/// Read a `GOPRO_`-prefixed environment variable
fn env_var(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{key}")).ok()
}

/// Parse a comma-separated extension list (`.MP4,.JPG` or `mp4, jpg`)
pub fn parse_extension_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Expand a leading `~` to the user's home directory
fn expand_path(s: &str) -> PathBuf {
    if let Some(rest) = s.strip_prefix("~/") {
        home_dir().join(rest)
    } else if s == "~" {
        home_dir()
    } else {
        PathBuf::from(s)
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_path, PathBuf::from("/Volumes/GoPro"));
        assert_eq!(config.media_dir.as_deref(), Some("100GOPRO"));
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert!(!config.move_files);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_matches_extension_case_insensitive() {
        let config = Config::default();
        assert!(config.matches_extension("mp4"));
        assert!(config.matches_extension("MP4"));
        assert!(config.matches_extension(".JPG"));
        assert!(config.matches_extension("jpg"));
        assert!(!config.matches_extension("png"));
        assert!(!config.matches_extension("lrv"));
    }

    #[test]
    fn test_parse_extension_list() {
        assert_eq!(
            parse_extension_list(".MP4, .JPG ,.RAW"),
            vec![".MP4", ".JPG", ".RAW"]
        );
        assert_eq!(parse_extension_list("mp4"), vec!["mp4"]);
        assert!(parse_extension_list("").is_empty());
    }

    #[test]
    fn test_parse_telemetry_formats() {
        let formats = Config::parse_telemetry_formats("json,csv").unwrap();
        assert_eq!(formats, vec![TelemetryFormat::Json, TelemetryFormat::Csv]);

        let formats = Config::parse_telemetry_formats("CSV").unwrap();
        assert_eq!(formats, vec![TelemetryFormat::Csv]);

        // Duplicates collapse
        let formats = Config::parse_telemetry_formats("json,json").unwrap();
        assert_eq!(formats, vec![TelemetryFormat::Json]);

        assert!(Config::parse_telemetry_formats("xml").is_err());
        assert!(Config::parse_telemetry_formats("").is_err());
    }

    #[test]
    fn test_validate_rejects_destination_inside_source() {
        let config = Config {
            source_path: PathBuf::from("/Volumes/GoPro"),
            destination_path: PathBuf::from("/Volumes/GoPro/organized"),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/tmp/x"), PathBuf::from("/tmp/x"));
        let expanded = expand_path("~/videos");
        assert!(expanded.ends_with("videos"));
        assert!(!expanded.starts_with("~"));
    }
}
