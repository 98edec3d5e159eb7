//! CLI argument parsing with clap

use crate::config::{Config, parse_extension_list};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GoPro Transfer - organize GoPro SD card media by capture date
///
/// Detects a mounted GoPro SD card, enumerates media files in its camera
/// media directory, and copies or moves them into date-organized destination
/// folders. Telemetry (GPS, accelerometer, gyroscope, temperature) can be
/// extracted into JSON/CSV sidecar files alongside the transferred videos.
#[derive(Parser, Debug)]
#[command(name = "gopro-transfer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transfer media files into date-organized destination folders
    Transfer(TransferArgs),
    /// List media files on the card without transferring anything
    List(ListArgs),
    /// Extract telemetry sidecars from a single video file
    Telemetry(TelemetryArgs),
}

/// Flags shared by `transfer` and `list` for locating the card
#[derive(clap::Args, Debug, Default)]
pub struct SourceArgs {
    /// Path to the mounted GoPro SD card
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Media directory name under DCIM (e.g. 100GOPRO).
    /// Pass "all" to enumerate every GoPro media folder on the card.
    #[arg(short, long)]
    pub media_dir: Option<String>,

    /// File extensions to include, comma-separated (e.g. ".MP4,.JPG")
    #[arg(short, long)]
    pub extensions: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct TransferArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Destination path for organized files
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// chrono format string for date folder names (e.g. "%Y-%m-%d")
    #[arg(long)]
    pub date_format: Option<String>,

    /// Move files instead of copying them
    #[arg(long = "move")]
    pub move_files: bool,

    /// Overwrite destination files that exist with a different size.
    /// Without this flag, such files are reported as conflicts.
    #[arg(long)]
    pub overwrite: bool,

    /// Extract telemetry sidecars for each transferred video
    #[arg(long = "extract-tel")]
    pub extract_telemetry: bool,

    /// Telemetry sidecar formats, comma-separated (json, csv)
    #[arg(long = "tel-formats")]
    pub telemetry_formats: Option<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(clap::Args, Debug, Default)]
pub struct TelemetryArgs {
    /// Path to the GoPro video file
    pub path: PathBuf,

    /// Directory for sidecar output (defaults to the video's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Sidecar formats, comma-separated (json, csv)
    #[arg(short, long)]
    pub formats: Option<String>,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(clap::Args, Debug, Default)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Explicit log file path (disables the daily-rolling default)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory for daily-rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Merge card-location flags into the config.
    /// CLI arguments take precedence over environment settings.
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_path = source.clone();
        }
        if let Some(ref media_dir) = self.media_dir {
            config.media_dir = if media_dir.eq_ignore_ascii_case("all") {
                None
            } else {
                Some(media_dir.clone())
            };
        }
        if let Some(ref extensions) = self.extensions {
            config.file_extensions = parse_extension_list(extensions);
        }
        config
    }
}

impl TransferArgs {
    /// Merge transfer flags into the config
    pub fn merge_with_config(&self, config: Config) -> Result<Config> {
        let mut config = self.source.merge_with_config(config);

        if let Some(ref destination) = self.destination {
            config.destination_path = destination.clone();
        }
        if let Some(ref date_format) = self.date_format {
            config.date_format = date_format.clone();
        }
        if self.move_files {
            config.move_files = true;
        }
        if self.overwrite {
            config.overwrite = true;
        }
        if self.extract_telemetry {
            config.extract_telemetry = true;
        }
        if let Some(ref formats) = self.telemetry_formats {
            config.telemetry_formats = Config::parse_telemetry_formats(formats)?;
        }
        config = self.log.merge_with_config(config);

        Ok(config)
    }
}

impl LogArgs {
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if let Some(ref file) = self.log_file {
            config.log_file = Some(file.clone());
        }
        if let Some(ref dir) = self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelemetryFormat;

    #[test]
    fn test_transfer_args_override_config() {
        let args = TransferArgs {
            source: SourceArgs {
                source: Some(PathBuf::from("/mnt/card")),
                media_dir: Some("101GOPRO".into()),
                extensions: Some(".MP4".into()),
            },
            destination: Some(PathBuf::from("/data/videos")),
            date_format: Some("%Y/%m/%d".into()),
            move_files: true,
            overwrite: true,
            extract_telemetry: true,
            telemetry_formats: Some("json,csv".into()),
            log: LogArgs::default(),
        };

        let config = args.merge_with_config(Config::default()).unwrap();
        assert_eq!(config.source_path, PathBuf::from("/mnt/card"));
        assert_eq!(config.destination_path, PathBuf::from("/data/videos"));
        assert_eq!(config.media_dir.as_deref(), Some("101GOPRO"));
        assert_eq!(config.date_format, "%Y/%m/%d");
        assert_eq!(config.file_extensions, vec![".MP4"]);
        assert!(config.move_files);
        assert!(config.overwrite);
        assert!(config.extract_telemetry);
        assert_eq!(
            config.telemetry_formats,
            vec![TelemetryFormat::Json, TelemetryFormat::Csv]
        );
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let mut base = Config::default();
        base.move_files = true;
        let args = TransferArgs::default();
        let config = args.merge_with_config(base).unwrap();

        // Absent flags never reset prior layers
        assert!(config.move_files);
        assert_eq!(config.media_dir.as_deref(), Some("100GOPRO"));
    }

    #[test]
    fn test_media_dir_all_scans_every_folder() {
        let args = SourceArgs {
            media_dir: Some("all".into()),
            ..SourceArgs::default()
        };
        let config = args.merge_with_config(Config::default());
        assert_eq!(config.media_dir, None);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "gopro-transfer",
            "transfer",
            "--source",
            "/mnt/card",
            "--move",
            "--extract-tel",
            "--tel-formats",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Command::Transfer(args) => {
                assert!(args.move_files);
                assert!(args.extract_telemetry);
                assert_eq!(args.telemetry_formats.as_deref(), Some("csv"));
            }
            _ => panic!("expected transfer subcommand"),
        }

        let cli =
            Cli::try_parse_from(["gopro-transfer", "telemetry", "/tmp/GX010001.MP4"]).unwrap();
        match cli.command {
            Command::Telemetry(args) => {
                assert_eq!(args.path, PathBuf::from("/tmp/GX010001.MP4"));
                assert!(args.output_dir.is_none());
            }
            _ => panic!("expected telemetry subcommand"),
        }
    }
}
