//! Production telemetry decoder backed by exiftool
//!
//! exiftool's embedded-document extraction (`-ee`) exposes the GPMF telemetry
//! track of GoPro videos as `Doc<N>:`-prefixed tag groups. This decoder runs
//! exiftool once per video and maps those groups onto [`TelemetryData`]
//! channels; it performs no binary parsing of its own.

use exiftool::ExifTool;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{Error, Result};
use crate::telemetry::{
    GpsSample, MotionSample, TelemetryData, TelemetryDecoder, TemperatureSample,
};

#[derive(Debug, Default)]
pub struct ExifToolDecoder;

impl ExifToolDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryDecoder for ExifToolDecoder {
    fn decode(&self, video: &Path) -> Result<TelemetryData> {
        if !video.exists() {
            return Err(Error::TelemetryDecode {
                path: video.to_path_buf(),
                message: "Video file not found".to_string(),
            });
        }
        let metadata = run_exiftool(video)?;
        Ok(parse_embedded_docs(&metadata))
    }
}

/// Run exiftool with embedded-document extraction and numeric output
fn run_exiftool(video: &Path) -> Result<HashMap<String, Value>> {
    let decode_err = |message: String| Error::TelemetryDecode {
        path: video.to_path_buf(),
        message,
    };

    let path_str = video
        .to_str()
        .ok_or_else(|| decode_err("Video path is not valid UTF-8".to_string()))?;

    let mut exiftool = ExifTool::new().map_err(|e| decode_err(e.to_string()))?;

    let args = ["-G3", "-ee", "-n", path_str];
    let output = exiftool
        .json_execute(&args)
        .map_err(|e| decode_err(e.to_string()))?;

    let data: Vec<HashMap<String, Value>> =
        serde_json::from_value(output).map_err(|e| decode_err(e.to_string()))?;

    data.into_iter()
        .next()
        .ok_or_else(|| decode_err("exiftool returned no metadata".to_string()))
}

/// Map `Doc<N>:`-grouped tags onto telemetry channels
fn parse_embedded_docs(metadata: &HashMap<String, Value>) -> TelemetryData {
    // Group tags by embedded document number, ordered by document
    let mut docs: BTreeMap<u32, HashMap<&str, &Value>> = BTreeMap::new();
    for (key, value) in metadata {
        if let Some((group, tag)) = key.split_once(':')
            && let Some(num) = group.strip_prefix("Doc")
            && let Ok(n) = num.parse::<u32>()
        {
            docs.entry(n).or_default().insert(tag, value);
        }
    }

    let mut data = TelemetryData::default();

    for (n, doc) in &docs {
        // Seconds from video start; document order stands in when absent
        let timestamp = get_f64(doc, "SampleTime").unwrap_or(*n as f64);

        if let (Some(latitude), Some(longitude)) =
            (get_f64(doc, "GPSLatitude"), get_f64(doc, "GPSLongitude"))
        {
            data.gps.push(GpsSample {
                timestamp,
                latitude,
                longitude,
                altitude: get_f64(doc, "GPSAltitude").unwrap_or(0.0),
                speed: get_f64(doc, "GPSSpeed").unwrap_or(0.0),
                speed3d: get_f64(doc, "GPSSpeed3D").unwrap_or(0.0),
            });
        }

        if let Some(value) = doc.get("Accelerometer") {
            data.accl
                .extend(parse_vector_samples(value, timestamp));
        }

        if let Some(value) = doc.get("Gyroscope") {
            data.gyro.extend(parse_vector_samples(value, timestamp));
        }

        if let Some(temperature) = get_f64(doc, "CameraTemperature") {
            data.temp.push(TemperatureSample {
                timestamp,
                temperature,
            });
        }
    }

    data
}

/// Read a tag as f64 (exiftool emits numbers or numeric strings with `-n`)
fn get_f64(doc: &HashMap<&str, &Value>, tag: &str) -> Option<f64> {
    match doc.get(tag)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an x/y/z sample list. exiftool reports motion channels either as a
/// space-separated string of floats or as a numeric array; both flatten to
/// triples.
fn parse_vector_samples(value: &Value, timestamp: f64) -> Vec<MotionSample> {
    let floats: Vec<f64> = match value {
        Value::String(s) => s
            .split_whitespace()
            .filter_map(|p| p.parse().ok())
            .collect(),
        Value::Array(items) => items.iter().filter_map(|v| v.as_f64()).collect(),
        _ => Vec::new(),
    };

    floats
        .chunks_exact(3)
        .map(|c| MotionSample {
            timestamp,
            x: c[0],
            y: c[1],
            z: c[2],
        })
        .collect()
}
