//! Initialization-stack extraction.
//!
//! A thin FFmpeg wrapper that dumps a short JPEG sequence from a chosen
//! chunk. The stack seeds the downstream tracking initialization; nothing
//! here decodes or analyzes frames itself.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{PreinitError, Result};
use crate::video::{check_ffmpeg, list_chunks};

/// A `(minute, second)` offset into a chunk.
pub type TimePoint = (u32, u32);

/// Extract the initialization image stack for a recording.
///
/// Picks the chunk by 1-based position in enumeration order and dumps
/// frames between `start` and `end` as a zero-padded JPEG sequence into
/// `<home>/Initialization_Stack/`. Returns the stack directory.
pub fn extract_init_stack(
    recordings_dir: &Path,
    home_dir: &Path,
    selected_chunk: usize,
    start: TimePoint,
    end: TimePoint,
    frame_rate: u32,
) -> Result<PathBuf> {
    if selected_chunk == 0 {
        return Err(PreinitError::Config(
            "Chunk selection is 1-based; 0 is not a valid chunk number".to_string(),
        ));
    }

    check_ffmpeg()?;

    let chunks = list_chunks(recordings_dir)?;
    let selected = chunks.get(selected_chunk - 1).ok_or_else(|| {
        PreinitError::Config(format!(
            "Chunk {} selected but only {} chunks found in {}",
            selected_chunk,
            chunks.len(),
            recordings_dir.display()
        ))
    })?;

    let stack_dir = home_dir.join("Initialization_Stack");
    std::fs::create_dir_all(&stack_dir)?;

    info!(
        "Extracting initialization stack from {} into {}",
        selected.display(),
        stack_dir.display()
    );

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(selected)
        .args(["-r", &frame_rate.to_string(), "-q:v", "0"])
        .args(["-ss", &format_timepoint(start)])
        .args(["-to", &format_timepoint(end)])
        .arg(stack_dir.join("%06d.jpg"))
        .status()
        .map_err(|e| PreinitError::StackExtraction(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(PreinitError::StackExtraction(
            "FFmpeg frame extraction failed".to_string(),
        ));
    }

    Ok(stack_dir)
}

fn format_timepoint((minute, second): TimePoint) -> String {
    format!("00:{minute:02}:{second:02}")
}

/// Parse a "MM:SS" argument into a time point.
pub fn parse_timepoint(s: &str) -> std::result::Result<TimePoint, String> {
    let (minute, second) = s
        .split_once(':')
        .ok_or_else(|| format!("Expected MM:SS, got '{s}'"))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| format!("Invalid minute in '{s}'"))?;
    let second: u32 = second
        .parse()
        .map_err(|_| format!("Invalid second in '{s}'"))?;
    if second >= 60 {
        return Err(format!("Seconds out of range in '{s}'"));
    }
    Ok((minute, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timepoint() {
        assert_eq!(format_timepoint((0, 0)), "00:00:00");
        assert_eq!(format_timepoint((2, 30)), "00:02:30");
        assert_eq!(format_timepoint((12, 5)), "00:12:05");
    }

    #[test]
    fn test_parse_timepoint() {
        assert_eq!(parse_timepoint("00:30").unwrap(), (0, 30));
        assert_eq!(parse_timepoint("2:05").unwrap(), (2, 5));
    }

    #[test]
    fn test_parse_timepoint_rejects_bad_input() {
        assert!(parse_timepoint("90").is_err());
        assert!(parse_timepoint("a:b").is_err());
        assert!(parse_timepoint("1:75").is_err());
    }

    #[test]
    fn test_zero_chunk_selection_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let result =
            extract_init_stack(dir.path(), dir.path(), 0, (0, 0), (0, 30), 120);
        assert!(matches!(result, Err(PreinitError::Config(_))));
    }
}
