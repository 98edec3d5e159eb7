//! Card and media file discovery
//!
//! Verifies the SD card mount and its DCIM layout, then enumerates the
//! immediate files of the configured media folder(s). Discovery has no side
//! effects and returns files sorted by filename for deterministic ordering.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::media::MediaFile;

/// Camera media folders are named like 100GOPRO, 101GOPRO, ...
static MEDIA_FOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn media_folder_pattern() -> &'static Regex {
    MEDIA_FOLDER_PATTERN.get_or_init(|| Regex::new(r"^\d{3}GOPRO$").unwrap())
}

/// A camera-assigned media folder under DCIM
#[derive(Debug, Clone)]
pub struct MediaFolder {
    pub name: String,
    pub path: PathBuf,
}

/// Verify that the configured source path is a mounted directory
pub fn find_card(config: &Config) -> Result<PathBuf> {
    let path = &config.source_path;
    if path.exists() && path.is_dir() {
        info!(card = %path.display(), "Found GoPro SD card");
        Ok(path.clone())
    } else {
        Err(Error::SourceNotFound { path: path.clone() })
    }
}

/// Scan the card's DCIM directory for GoPro media folders
pub fn scan_media_folders(card: &Path) -> Result<Vec<MediaFolder>> {
    let dcim = card.join("DCIM");
    if !dcim.is_dir() {
        return Err(Error::MediaDirNotFound {
            name: "DCIM".to_string(),
            dcim: card.to_path_buf(),
        });
    }

    let mut folders = Vec::new();
    for entry in std::fs::read_dir(&dcim)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() && media_folder_pattern().is_match(&name) {
            debug!(folder = %name, "Found media folder");
            folders.push(MediaFolder {
                name,
                path: entry.path(),
            });
        }
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    info!(count = folders.len(), "Scanned DCIM for media folders");
    Ok(folders)
}

/// Enumerate media files matching the configured extensions
///
/// When `config.media_dir` names a folder, only that folder is searched and
/// its absence is fatal. With no media dir configured, every GoPro folder on
/// the card is searched.
pub fn discover(config: &Config) -> Result<Vec<MediaFile>> {
    let card = find_card(config)?;
    let folders = scan_media_folders(&card)?;

    let selected: Vec<MediaFolder> = match &config.media_dir {
        Some(name) => {
            let found: Vec<MediaFolder> =
                folders.into_iter().filter(|f| &f.name == name).collect();
            if found.is_empty() {
                return Err(Error::MediaDirNotFound {
                    name: name.clone(),
                    dcim: card.join("DCIM"),
                });
            }
            found
        }
        None => folders,
    };

    let mut files = Vec::new();
    for folder in &selected {
        let found = enumerate_folder(&folder.path, config)?;
        debug!(folder = %folder.name, count = found.len(), "Enumerated media files");
        files.extend(found);
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    if files.is_empty() {
        warn!("No media files found on the card");
    } else {
        info!(count = files.len(), "Found media files");
    }
    Ok(files)
}

/// List the immediate files of one folder whose extension is configured
fn enumerate_folder(dir: &Path, config: &Config) -> Result<Vec<MediaFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file()
            && let Some(ext) = path.extension().and_then(|e| e.to_str())
            && config.matches_extension(ext)
        {
            files.push(MediaFile::from_path(path)?);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a fake card layout: root/DCIM/<folders>/<files>
    fn fake_card(folders: &[(&str, &[&str])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (folder, files) in folders {
            let folder_path = dir.path().join("DCIM").join(folder);
            std::fs::create_dir_all(&folder_path).unwrap();
            for file in *files {
                std::fs::write(folder_path.join(file), b"data").unwrap();
            }
        }
        dir
    }

    fn config_for(card: &Path) -> Config {
        Config {
            source_path: card.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let config = Config {
            source_path: PathBuf::from("/nonexistent/gopro-card"),
            ..Config::default()
        };
        assert!(matches!(
            discover(&config),
            Err(Error::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_dcim_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        assert!(matches!(
            discover(&config),
            Err(Error::MediaDirNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_media_dir_is_fatal() {
        let card = fake_card(&[("101GOPRO", &["GX010001.MP4"])]);
        let config = config_for(card.path()); // wants 100GOPRO
        assert!(matches!(
            discover(&config),
            Err(Error::MediaDirNotFound { .. })
        ));
    }

    #[test]
    fn test_extension_filter_and_sorting() {
        let card = fake_card(&[(
            "100GOPRO",
            &[
                "GX010002.MP4",
                "GX010001.MP4",
                "GOPR0003.JPG",
                "GX010001.LRV",
                "GX010001.THM",
            ],
        )]);
        let config = config_for(card.path());

        let files = discover(&config).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        // LRV/THM excluded, results sorted by filename
        assert_eq!(names, vec!["GOPR0003.JPG", "GX010001.MP4", "GX010002.MP4"]);
    }

    #[test]
    fn test_only_configured_extensions_survive() {
        let card = fake_card(&[("100GOPRO", &["GX010001.MP4", "GOPR0002.JPG"])]);
        let mut config = config_for(card.path());
        config.file_extensions = vec![".MP4".into()];

        let files = discover(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "GX010001.MP4");
    }

    #[test]
    fn test_case_insensitive_extension_match() {
        let card = fake_card(&[("100GOPRO", &["gx010001.mp4"])]);
        let config = config_for(card.path());
        let files = discover(&config).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_all_folders_when_media_dir_unset() {
        let card = fake_card(&[
            ("100GOPRO", &["GX010001.MP4"]),
            ("101GOPRO", &["GX010002.MP4"]),
            ("MISC", &["GX010003.MP4"]), // not a GoPro folder
        ]);
        let mut config = config_for(card.path());
        config.media_dir = None;

        let files = discover(&config).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["GX010001.MP4", "GX010002.MP4"]);
    }

    #[test]
    fn test_subdirectories_are_not_recursed() {
        let card = fake_card(&[("100GOPRO", &["GX010001.MP4"])]);
        let nested = card.path().join("DCIM/100GOPRO/nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("GX010009.MP4"), b"data").unwrap();

        let config = config_for(card.path());
        let files = discover(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "GX010001.MP4");
    }
}
