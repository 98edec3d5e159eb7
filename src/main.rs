//! GoPro Transfer - CLI shell
//!
//! Argument parsing, logging setup, and subcommand dispatch. All transfer
//! logic lives in the library; this binary wires configuration into it and
//! maps the run summary onto the process exit code.

use anyhow::Result;
use clap::Parser;
use gopro_transfer::telemetry::{self, ExifToolDecoder};
use gopro_transfer::{Cli, Command, Config, locate, transfer};
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// The appender guard must drop (flushing buffered file logs) before the
/// process exits, so failures map onto the exit code instead of calling
/// `process::exit` directly.
fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Transfer(args) => {
            let config = args.merge_with_config(Config::from_env()?)?;
            let _guard = setup_logging(&config)?;
            let summary = run_transfer(&config)?;
            Ok(if summary.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::List(args) => {
            let mut config = args.source.merge_with_config(Config::from_env()?);
            config = args.log.merge_with_config(config);
            let _guard = setup_logging(&config)?;
            run_list(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Telemetry(args) => {
            let config = args.log.merge_with_config(Config::from_env()?);
            let _guard = setup_logging(&config)?;

            let formats = match args.formats {
                Some(ref s) => Config::parse_telemetry_formats(s)?,
                None => config.telemetry_formats.clone(),
            };
            let output_dir = args
                .output_dir
                .clone()
                .or_else(|| args.path.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| ".".into());

            let decoder = ExifToolDecoder::new();
            let written =
                telemetry::extract_sidecars(&decoder, &args.path, &output_dir, &formats)?;
            if written.is_empty() {
                println!("No telemetry track found in {}", args.path.display());
            } else {
                for path in written {
                    println!("Wrote {}", path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run a full transfer: discover, copy/move, optional telemetry sidecars
fn run_transfer(config: &Config) -> Result<transfer::RunSummary> {
    info!(version = env!("CARGO_PKG_VERSION"), "GoPro Transfer starting");
    config.validate()?;

    let files = locate::discover(config)?;
    if files.is_empty() {
        println!("No media files found on the card");
        return Ok(transfer::RunSummary::default());
    }

    let results = transfer::transfer_all(&files, config);

    if config.extract_telemetry {
        let decoder = ExifToolDecoder::new();
        for result in &results {
            if result.outcome != transfer::TransferOutcome::Transferred {
                continue;
            }
            let Some(dest) = result.destination.as_deref() else {
                continue;
            };
            if !is_video(dest) {
                continue;
            }
            let output_dir = dest.parent().unwrap_or(Path::new("."));
            telemetry::extract_for_video(
                &decoder,
                dest,
                output_dir,
                &config.telemetry_formats,
            );
        }
    }

    let summary = transfer::RunSummary::from_results(&results, &files);
    info!("{}", summary.summary());
    println!("{}", summary.summary());
    println!(
        "Files organized in date folders at: {}",
        config.destination_path.display()
    );

    if summary.has_failures() {
        for result in results
            .iter()
            .filter(|r| r.outcome == transfer::TransferOutcome::Failed)
        {
            let message = result.error.as_deref().unwrap_or("unknown error");
            error!(source = %result.source.display(), "{message}");
            eprintln!("Failed: {} - {}", result.source.display(), message);
        }
    }

    Ok(summary)
}

/// List discovered media files without transferring anything
fn run_list(config: &Config) -> Result<()> {
    let files = locate::discover(config)?;

    for file in &files {
        let date = match file.created.or(file.modified) {
            Some(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "unknown date".to_string(),
        };
        let kind = match file.gopro_info() {
            Some(info) => match info.kind {
                gopro_transfer::GoProFileKind::Main => {
                    format!("main #{}", info.file_number)
                }
                gopro_transfer::GoProFileKind::Chapter(n) => {
                    format!("chapter {} of #{}", n, info.file_number)
                }
            },
            None => "unrecognized name".to_string(),
        };
        println!(
            "{} ({:.1} MB) - {} - {}",
            file.filename,
            file.size_mb(),
            date,
            kind
        );
    }

    println!("{} media files", files.len());
    Ok(())
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"))
}

/// Setup console + file logging
///
/// File output rolls daily under the configured log directory unless an
/// explicit log file path is set.
fn setup_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let parsed_level = config.log_level.parse::<Level>().ok();
    let level = parsed_level.unwrap_or(Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (non_blocking, guard) = match config.log_file {
        Some(ref log_file) => {
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            tracing_appender::non_blocking(file)
        }
        None => {
            let log_dir = config.log_directory();
            std::fs::create_dir_all(&log_dir)?;
            let appender = tracing_appender::rolling::daily(log_dir, "gopro-transfer.log");
            tracing_appender::non_blocking(appender)
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    // Only visible once the subscriber is installed
    if parsed_level.is_none() {
        warn!(level = %config.log_level, "Unknown log level, using INFO");
    }

    Ok(Some(guard))
}
