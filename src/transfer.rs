//! Transfer planning and execution
//!
//! Computes `<dest>/<date-folder>/<filename>` for each discovered file and
//! copies or moves it there. Per-file failures are recorded in the run
//! summary and never abort the run; a source file is only deleted after its
//! copy has been size-verified.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::date::DateKey;
use crate::error::{Error, Result};
use crate::media::MediaFile;

/// Outcome of a single file transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// File was copied or moved to its destination
    Transferred,
    /// Destination already holds an identical-size file
    Skipped,
    /// Transfer failed; the error field holds the cause
    Failed,
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// Source file path
    pub source: PathBuf,
    /// Computed destination path (if one was derived)
    pub destination: Option<PathBuf>,
    /// Outcome of the transfer
    pub outcome: TransferOutcome,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Aggregated counts for a transfer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_transferred: u64,
}

impl RunSummary {
    /// Aggregate results; `results` and `files` are in the same order, as
    /// produced by [`transfer_all`]
    pub fn from_results(results: &[TransferResult], files: &[MediaFile]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for (result, file) in results.iter().zip(files) {
            match result.outcome {
                TransferOutcome::Transferred => {
                    summary.transferred += 1;
                    summary.bytes_transferred += file.size;
                }
                TransferOutcome::Skipped => summary.skipped += 1,
                TransferOutcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Transferred: {} ({:.1} MB), Skipped: {}, Failed: {}",
            self.total,
            self.transferred,
            self.bytes_transferred as f64 / (1024.0 * 1024.0),
            self.skipped,
            self.failed
        )
    }
}

/// Transfer every file sequentially, producing exactly one result per file
pub fn transfer_all(files: &[MediaFile], config: &Config) -> Vec<TransferResult> {
    let operation = if config.move_files { "Moving" } else { "Copying" };
    info!(
        destination = %config.destination_path.display(),
        date_format = %config.date_format,
        "{operation} {} files",
        files.len()
    );

    files
        .iter()
        .map(|file| transfer_file(file, config))
        .collect()
}

/// Transfer a single file to its date-organized destination
pub fn transfer_file(file: &MediaFile, config: &Config) -> TransferResult {
    let date_key = DateKey::resolve(file);
    let folder = date_key.folder_name(&config.date_format);
    let dest = config
        .destination_path
        .join(&folder)
        .join(&file.filename);

    match execute(file, &dest, config) {
        Ok(TransferOutcome::Skipped) => {
            info!(file = %file.filename, "Skipping - already exists in destination");
            TransferResult {
                source: file.path.clone(),
                destination: Some(dest),
                outcome: TransferOutcome::Skipped,
                error: None,
            }
        }
        Ok(outcome) => {
            info!(
                file = %file.filename,
                size_mb = format!("{:.1}", file.size_mb()),
                folder = %folder,
                "Transferred"
            );
            TransferResult {
                source: file.path.clone(),
                destination: Some(dest),
                outcome,
                error: None,
            }
        }
        Err(e) => {
            error!(file = %file.filename, error = %e, "Transfer failed");
            TransferResult {
                source: file.path.clone(),
                destination: Some(dest),
                outcome: TransferOutcome::Failed,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Perform the copy/move, including conflict checks and move verification
fn execute(file: &MediaFile, dest: &Path, config: &Config) -> Result<TransferOutcome> {
    if dest.exists() {
        let existing = fs::metadata(dest)?.len();
        if existing == file.size {
            return Ok(TransferOutcome::Skipped);
        }
        if !config.overwrite {
            return Err(Error::DestinationConflict {
                dest: dest.to_path_buf(),
                existing,
                incoming: file.size,
            });
        }
        debug!(dest = %dest.display(), "Overwriting conflicting destination");
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    copy_file(&file.path, dest).map_err(|e| Error::Copy {
        source_path: file.path.clone(),
        dest: dest.to_path_buf(),
        message: e.to_string(),
    })?;

    // Preserve modification time so date keys survive re-transfer
    if let Ok(mtime) = fs::metadata(&file.path).and_then(|m| m.modified()) {
        let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime));
    }

    if config.move_files {
        let copied = fs::metadata(dest)?.len();
        if copied != file.size {
            return Err(Error::CopyVerification {
                dest: dest.to_path_buf(),
                expected: file.size,
                actual: copied,
            });
        }
        fs::remove_file(&file.path)?;
        debug!(source = %file.path.display(), "Removed source after verified move");
    }

    Ok(TransferOutcome::Transferred)
}

/// Copy file contents with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}
