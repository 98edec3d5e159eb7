//! Telemetry extraction and sidecar writing
//!
//! Decoding the embedded GPMF telemetry track is delegated to an external
//! tool behind the [`TelemetryDecoder`] trait, so transfer logic can be
//! tested without real GoPro video fixtures. Decode failures are warnings:
//! they never fail the transfer of the video itself.

pub mod exiftool;
pub mod sidecar;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::TelemetryFormat;
use crate::error::Result;

pub use exiftool::ExifToolDecoder;

/// One GPS fix, timestamped relative to video start
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpsSample {
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
    pub speed3d: f64,
}

/// One accelerometer or gyroscope vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One camera temperature reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSample {
    pub timestamp: f64,
    pub temperature: f64,
}

/// Telemetry channels extracted from a video
#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetryData {
    pub gps: Vec<GpsSample>,
    pub accl: Vec<MotionSample>,
    pub gyro: Vec<MotionSample>,
    pub temp: Vec<TemperatureSample>,
}

impl TelemetryData {
    /// True when no channel holds any sample
    pub fn is_empty(&self) -> bool {
        self.gps.is_empty() && self.accl.is_empty() && self.gyro.is_empty() && self.temp.is_empty()
    }
}

/// Capability for decoding a video's telemetry track
pub trait TelemetryDecoder {
    fn decode(&self, video: &Path) -> Result<TelemetryData>;
}

/// Decode a video and write the requested sidecars next to it.
///
/// Returns the paths written. A video without a telemetry track yields no
/// sidecars and an `Ok` result.
pub fn extract_sidecars(
    decoder: &dyn TelemetryDecoder,
    video: &Path,
    output_dir: &Path,
    formats: &[TelemetryFormat],
) -> Result<Vec<PathBuf>> {
    let data = decoder.decode(video)?;
    if data.is_empty() {
        warn!(video = %video.display(), "No telemetry track found, skipping sidecars");
        return Ok(Vec::new());
    }

    let base_name = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "telemetry".to_string());

    let mut written = Vec::new();
    for format in formats {
        match format {
            TelemetryFormat::Json => {
                written.push(sidecar::write_json(&data, output_dir, &base_name)?);
            }
            TelemetryFormat::Csv => {
                written.extend(sidecar::write_csv(&data, output_dir, &base_name)?);
            }
        }
    }

    info!(
        video = %video.display(),
        sidecars = written.len(),
        gps = data.gps.len(),
        accl = data.accl.len(),
        gyro = data.gyro.len(),
        temp = data.temp.len(),
        "Telemetry extracted"
    );
    Ok(written)
}

/// Best-effort extraction used during transfer: logs and swallows failures
pub fn extract_for_video(
    decoder: &dyn TelemetryDecoder,
    video: &Path,
    output_dir: &Path,
    formats: &[TelemetryFormat],
) -> Vec<PathBuf> {
    match extract_sidecars(decoder, video, output_dir, formats) {
        Ok(written) => written,
        Err(e) => {
            warn!(video = %video.display(), error = %e, "Telemetry extraction failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    pub(crate) struct FakeDecoder {
        pub data: TelemetryData,
    }

    impl TelemetryDecoder for FakeDecoder {
        fn decode(&self, _video: &Path) -> Result<TelemetryData> {
            Ok(self.data.clone())
        }
    }

    struct FailingDecoder;

    impl TelemetryDecoder for FailingDecoder {
        fn decode(&self, video: &Path) -> Result<TelemetryData> {
            Err(Error::TelemetryDecode {
                path: video.to_path_buf(),
                message: "no GPMF stream".to_string(),
            })
        }
    }

    pub(crate) fn sample_data() -> TelemetryData {
        TelemetryData {
            gps: vec![GpsSample {
                timestamp: 0.0,
                latitude: 59.33,
                longitude: 18.06,
                altitude: 12.5,
                speed: 3.2,
                speed3d: 3.4,
            }],
            accl: vec![MotionSample {
                timestamp: 0.0,
                x: 0.1,
                y: 9.8,
                z: -0.2,
            }],
            gyro: vec![],
            temp: vec![TemperatureSample {
                timestamp: 0.0,
                temperature: 31.5,
            }],
        }
    }

    #[test]
    fn test_empty_telemetry_writes_no_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = FakeDecoder {
            data: TelemetryData::default(),
        };
        let written = extract_sidecars(
            &decoder,
            Path::new("GX010001.MP4"),
            dir.path(),
            &[TelemetryFormat::Json, TelemetryFormat::Csv],
        )
        .unwrap();
        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_json_and_csv_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let decoder = FakeDecoder {
            data: sample_data(),
        };
        let written = extract_sidecars(
            &decoder,
            Path::new("/card/GX010001.MP4"),
            dir.path(),
            &[TelemetryFormat::Json, TelemetryFormat::Csv],
        )
        .unwrap();

        // JSON plus one CSV per non-empty channel (gps, accl, temp)
        assert_eq!(written.len(), 4);
        assert!(dir.path().join("GX010001_telemetry.json").exists());
        assert!(dir.path().join("GX010001_gps.csv").exists());
        assert!(dir.path().join("GX010001_accl.csv").exists());
        assert!(dir.path().join("GX010001_temp.csv").exists());
        // Empty gyro channel produces no file
        assert!(!dir.path().join("GX010001_gyro.csv").exists());
    }

    #[test]
    fn test_decode_failure_is_soft_during_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let written = extract_for_video(
            &FailingDecoder,
            Path::new("/card/GX010001.MP4"),
            dir.path(),
            &[TelemetryFormat::Json],
        );
        assert!(written.is_empty());
    }
}
