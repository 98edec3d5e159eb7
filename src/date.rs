//! Date key resolution for destination folder naming
//!
//! Resolution prefers the capture (creation) timestamp when the platform
//! exposes one, falling back to the modification time. Files with no usable
//! date land in the `unknown` bucket instead of aborting the run.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::media::MediaFile;

/// Folder name used when no date could be resolved
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Which timestamp the date key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Filesystem creation time (the camera's capture time on FAT cards)
    Created,
    /// Filesystem modification time
    Modified,
    /// Nothing usable; file goes to the unknown bucket
    Unknown,
}

/// Resolved date key for a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKey {
    Known(DateTime<Local>, DateSource),
    Unknown,
}

impl DateKey {
    /// Resolve the date key for a file. Never fails; missing timestamps
    /// degrade to the unknown bucket.
    pub fn resolve(file: &MediaFile) -> Self {
        if let Some(created) = file.created {
            debug!(file = %file.filename, date = %created, "Using creation date");
            return DateKey::Known(created, DateSource::Created);
        }

        if let Some(modified) = file.modified {
            debug!(file = %file.filename, date = %modified, "Using modification date");
            return DateKey::Known(modified, DateSource::Modified);
        }

        warn!(file = %file.filename, "No timestamp available for date key");
        DateKey::Unknown
    }

    /// Deterministic destination folder name for this key
    pub fn folder_name(&self, date_format: &str) -> String {
        match self {
            DateKey::Known(timestamp, _) => timestamp.format(date_format).to_string(),
            DateKey::Unknown => {
                warn!("No date available, using '{UNKNOWN_BUCKET}' bucket");
                UNKNOWN_BUCKET.to_string()
            }
        }
    }

    pub fn source(&self) -> DateSource {
        match self {
            DateKey::Known(_, source) => *source,
            DateKey::Unknown => DateSource::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn sample_file(created: Option<DateTime<Local>>) -> MediaFile {
        MediaFile {
            path: PathBuf::from("/card/DCIM/100GOPRO/GX010001.MP4"),
            filename: "GX010001.MP4".to_string(),
            extension: "MP4".to_string(),
            size: 1024,
            modified: Some(Local.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap()),
            created,
        }
    }

    #[test]
    fn test_prefers_creation_date() {
        let created = Local.with_ymd_and_hms(2024, 3, 2, 10, 30, 0).unwrap();
        let key = DateKey::resolve(&sample_file(Some(created)));
        assert_eq!(key.source(), DateSource::Created);
        assert_eq!(key.folder_name("%Y-%m-%d"), "2024-03-02");
    }

    #[test]
    fn test_falls_back_to_modification_date() {
        let key = DateKey::resolve(&sample_file(None));
        assert_eq!(key.source(), DateSource::Modified);
        assert_eq!(key.folder_name("%Y-%m-%d"), "2024-03-05");
    }

    #[test]
    fn test_folder_name_honors_format_string() {
        let created = Local.with_ymd_and_hms(2024, 3, 2, 10, 30, 0).unwrap();
        let key = DateKey::resolve(&sample_file(Some(created)));
        assert_eq!(key.folder_name("%Y/%m"), "2024/03");
        assert_eq!(key.folder_name("%Y%m%d"), "20240302");
        assert_eq!(key.folder_name("%d.%m.%Y"), "02.03.2024");
    }

    #[test]
    fn test_unknown_bucket() {
        let mut file = sample_file(None);
        file.modified = None;
        let key = DateKey::resolve(&file);
        assert_eq!(key, DateKey::Unknown);
        assert_eq!(key.folder_name("%Y-%m-%d"), "unknown");
        assert_eq!(key.source(), DateSource::Unknown);
    }
}
