use std::path::Path;
use std::process::Command;

use regex::Regex;
use tracing::debug;

use crate::error::{PreinitError, Result};

use super::ChunkDuration;

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe").arg("-version").output().map_err(|e| {
        PreinitError::Probe(format!(
            "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(PreinitError::Probe("FFprobe check failed".to_string()));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg").arg("-version").output().map_err(|e| {
        PreinitError::Probe(format!(
            "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(PreinitError::Probe("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Get the video stream duration of a chunk in seconds using FFprobe.
///
/// The duration is the first `digits.digits` match in the probe output.
/// A chunk with no parsable duration is fatal; no default is substituted.
pub fn probe_duration(input: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| PreinitError::Probe(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PreinitError::Probe(format!("FFprobe failed: {stderr}")));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_duration_output(&stdout, input)
}

/// Extract the decimal duration value from probe output text.
fn parse_duration_output(output: &str, input: &Path) -> Result<f64> {
    let pattern = Regex::new(r"\d+\.\d+").expect("valid duration pattern");
    let matched = pattern
        .find(output)
        .ok_or_else(|| PreinitError::MissingDuration(input.display().to_string()))?;

    matched.as_str().parse().map_err(|e| {
        PreinitError::Probe(format!(
            "Failed to parse duration '{}': {e}",
            matched.as_str()
        ))
    })
}

/// Format a duration in seconds as "H h M min S sec", truncating each unit.
pub fn human_duration(secs: f64) -> String {
    let hours = (secs / 3600.0).floor();
    let mins = ((secs - hours * 3600.0) / 60.0).floor();
    let secs_left = secs - hours * 3600.0 - mins * 60.0;
    format!(
        "{} h {} min {} sec",
        hours as i64, mins as i64, secs_left as i64
    )
}

/// Estimated frame count for a measured duration.
///
/// The +2 margin absorbs encoder start/stop rounding; truncation happens
/// after the addition.
pub fn raw_frame_count(secs: f64, frame_rate: u32) -> i64 {
    (secs * frame_rate as f64 + 2.0) as i64
}

/// Measure one chunk: probe its duration and derive the frame count.
///
/// Spawns one external process per file and blocks on it.
pub fn measure_chunk(input: &Path, frame_rate: u32) -> Result<ChunkDuration> {
    if !input.exists() {
        return Err(PreinitError::FileNotFound(input.display().to_string()));
    }

    let seconds = probe_duration(input)?;
    debug!("{}: {:.3}s", input.display(), seconds);

    Ok(ChunkDuration {
        seconds,
        human: human_duration(seconds),
        raw_frame_count: raw_frame_count(seconds, frame_rate),
    })
}
