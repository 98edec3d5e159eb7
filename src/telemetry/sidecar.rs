//! Sidecar file writers
//!
//! One JSON sidecar carries every channel; CSV output writes one file per
//! non-empty channel, named `<basename>_<channel>.csv`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::telemetry::TelemetryData;

/// Write `<base>_telemetry.json` containing all channels
pub fn write_json(data: &TelemetryData, output_dir: &Path, base_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{base_name}_telemetry.json"));
    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(file, data)?;
    debug!(path = %path.display(), "Wrote telemetry JSON sidecar");
    Ok(path)
}

/// Write one `<base>_<channel>.csv` per non-empty channel
pub fn write_csv(data: &TelemetryData, output_dir: &Path, base_name: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if !data.gps.is_empty() {
        let path = output_dir.join(format!("{base_name}_gps.csv"));
        let mut w = BufWriter::new(File::create(&path)?);
        writeln!(w, "timestamp,latitude,longitude,altitude,speed,speed3d")?;
        for p in &data.gps {
            writeln!(
                w,
                "{},{},{},{},{},{}",
                p.timestamp, p.latitude, p.longitude, p.altitude, p.speed, p.speed3d
            )?;
        }
        w.flush()?;
        written.push(path);
    }

    if !data.accl.is_empty() {
        written.push(write_motion_csv(&data.accl, output_dir, base_name, "accl")?);
    }

    if !data.gyro.is_empty() {
        written.push(write_motion_csv(&data.gyro, output_dir, base_name, "gyro")?);
    }

    if !data.temp.is_empty() {
        let path = output_dir.join(format!("{base_name}_temp.csv"));
        let mut w = BufWriter::new(File::create(&path)?);
        writeln!(w, "timestamp,temperature")?;
        for p in &data.temp {
            writeln!(w, "{},{}", p.timestamp, p.temperature)?;
        }
        w.flush()?;
        written.push(path);
    }

    for path in &written {
        debug!(path = %path.display(), "Wrote telemetry CSV sidecar");
    }
    Ok(written)
}

fn write_motion_csv(
    samples: &[crate::telemetry::MotionSample],
    output_dir: &Path,
    base_name: &str,
    channel: &str,
) -> Result<PathBuf> {
    let path = output_dir.join(format!("{base_name}_{channel}.csv"));
    let mut w = BufWriter::new(File::create(&path)?);
    writeln!(w, "timestamp,x,y,z")?;
    for p in samples {
        writeln!(w, "{},{},{},{}", p.timestamp, p.x, p.y, p.z)?;
    }
    w.flush()?;
    Ok(path)
}
