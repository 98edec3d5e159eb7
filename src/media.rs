//! Media file snapshot and GoPro filename conventions

use chrono::{DateTime, Local};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::Result;

/// Newer naming (Hero5+): `G` + type code + six-digit file number,
/// e.g. GX010001.MP4 (main) or G1010001.MP4 (chapter 1)
static MODERN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Older naming: GOPR0001.MP4 (main) or GP010001.MP4 (chapter 01)
static LEGACY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn modern_pattern() -> &'static Regex {
    MODERN_PATTERN.get_or_init(|| Regex::new(r"^G([A-Z0-9])(\d{6})\.").unwrap())
}

fn legacy_pattern() -> &'static Regex {
    LEGACY_PATTERN.get_or_init(|| Regex::new(r"^(GOPR|GP(\d{2}))(\d{4})\.").unwrap())
}

/// Role of a file within a recording, per GoPro naming conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoProFileKind {
    /// First (or only) file of a recording
    Main,
    /// Continuation chapter of a long recording
    Chapter(u32),
}

/// Metadata parsed from a GoPro filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoProFileInfo {
    pub kind: GoProFileKind,
    pub file_number: String,
}

/// Parse GoPro naming conventions out of a filename.
/// Returns `None` for files that don't follow either convention.
///
/// Legacy names are checked first: `GP011234.MP4` also happens to fit the
/// modern `G` + type code + six digits shape, while `GOPR`/`GP\d{2}`
/// prefixes can never be genuine modern names.
pub fn parse_gopro_filename(filename: &str) -> Option<GoProFileInfo> {
    if let Some(caps) = legacy_pattern().captures(filename) {
        let kind = match caps.get(2) {
            Some(chapter) => GoProFileKind::Chapter(chapter.as_str().parse().ok()?),
            None => GoProFileKind::Main,
        };
        return Some(GoProFileInfo {
            kind,
            file_number: caps[3].to_string(),
        });
    }

    if let Some(caps) = modern_pattern().captures(filename) {
        let type_code = &caps[1];
        let kind = match type_code.parse::<u32>() {
            Ok(chapter) => GoProFileKind::Chapter(chapter),
            Err(_) => GoProFileKind::Main,
        };
        return Some(GoProFileInfo {
            kind,
            file_number: caps[2].to_string(),
        });
    }

    None
}

/// Immutable snapshot of a discovered media file
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute source path
    pub path: PathBuf,
    /// File name component
    pub filename: String,
    /// Extension without leading dot, as found on disk
    pub extension: String,
    /// Size in bytes at discovery time
    pub size: u64,
    /// Filesystem modification timestamp, where the platform exposes one
    pub modified: Option<DateTime<Local>>,
    /// Creation timestamp where the platform exposes it (stands in for
    /// embedded capture metadata, matching what the camera writes)
    pub created: Option<DateTime<Local>>,
}

impl MediaFile {
    /// Snapshot a file's metadata
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            filename,
            extension,
            size: metadata.len(),
            modified: metadata.modified().ok().map(Into::into),
            created: metadata.created().ok().map(Into::into),
        })
    }

    /// GoPro naming metadata, if the filename follows a known convention
    pub fn gopro_info(&self) -> Option<GoProFileInfo> {
        parse_gopro_filename(&self.filename)
    }

    /// Size in mebibytes for human-readable reporting
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}
