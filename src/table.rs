use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::drift::corrected_frame_count;
use crate::error::Result;
use crate::video::RecordingChunk;

/// One row of the pre-initialization table.
///
/// Column names and order are the contract consumed by the downstream
/// tracking stages; `NumFramesInChunk` carries the drift-corrected count
/// while `NumFramesInChunk_initial` retains the raw count for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreInitRecord {
    #[serde(rename = "RecordingName")]
    pub recording_name: String,
    #[serde(rename = "RecordingDirPath")]
    pub recording_dir_path: String,
    #[serde(rename = "ChunkName")]
    pub chunk_name: String,
    #[serde(rename = "RemoteChunkPath")]
    pub remote_chunk_path: String,
    #[serde(rename = "NumFramesInChunk")]
    pub num_frames_in_chunk: i64,
    #[serde(rename = "RecordingDuration")]
    pub recording_duration: String,
    #[serde(rename = "FrameRate")]
    pub frame_rate: u32,
    #[serde(rename = "NumFramesInChunk_initial")]
    pub num_frames_initial: i64,
}

/// Assemble one record per chunk, applying the frame-drift correction at
/// every capture-date boundary.
///
/// Chunks must be in enumeration order. For each adjacent pair whose
/// capture tokens differ, the corrector runs once and its result replaces
/// the frame count of the first chunk of the pair (the one ending the
/// earlier date group). The correction targets the row by index, so a
/// coincidental raw-count collision elsewhere in the table is never
/// touched. Raw counts are never mutated.
pub fn build_records(
    chunks: &[RecordingChunk],
    recording_name: &str,
    config: &Config,
) -> Result<Vec<PreInitRecord>> {
    let mut records: Vec<PreInitRecord> = chunks
        .iter()
        .map(|chunk| PreInitRecord {
            recording_name: recording_name.to_string(),
            recording_dir_path: config.remote_recording_dir(recording_name),
            chunk_name: chunk.name.clone(),
            remote_chunk_path: config.remote_chunk_path(&chunk.name),
            num_frames_in_chunk: chunk.raw_frame_count(),
            recording_duration: chunk.duration.human.clone(),
            frame_rate: config.frame_rate,
            num_frames_initial: chunk.raw_frame_count(),
        })
        .collect();

    for i in 0..chunks.len().saturating_sub(1) {
        let token = &chunks[i].capture_token;
        let next_token = &chunks[i + 1].capture_token;
        if token == next_token {
            continue;
        }

        // Sum of raw counts over the date group ending at chunk i
        let observed_total_frame: i64 = chunks
            .iter()
            .filter(|c| &c.capture_token == token)
            .map(|c| c.raw_frame_count())
            .sum();

        let corrected = corrected_frame_count(
            token,
            next_token,
            chunks[i].raw_frame_count(),
            observed_total_frame,
            config.frame_rate,
        )?;

        debug!(
            "Chunk {} ends date group {}: corrected {} -> {}",
            chunks[i].name,
            token,
            chunks[i].raw_frame_count(),
            corrected
        );

        records[i].num_frames_in_chunk = corrected;
    }

    Ok(records)
}

/// Path of the persisted table for a recording.
pub fn output_path(home_dir: &Path, recording_name: &str) -> PathBuf {
    home_dir
        .join("Initialization_DF")
        .join(format!("{recording_name}_PreInitializationDF.csv"))
}

/// Write the table to a CSV file, creating the parent directory if needed.
pub fn write_csv(records: &[PreInitRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Read a persisted table back.
pub fn read_csv(path: &Path) -> Result<Vec<PreInitRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{CaptureToken, ChunkDuration, RecordingChunk};
    use tempfile::TempDir;

    fn chunk(order: usize, stem: &str, secs: f64, frame_rate: u32) -> RecordingChunk {
        RecordingChunk {
            path: PathBuf::from(format!("/rec/{stem}.mp4")),
            name: stem.to_string(),
            order,
            capture_token: CaptureToken::from_stem(stem).unwrap(),
            duration: ChunkDuration {
                seconds: secs,
                human: crate::video::human_duration(secs),
                raw_frame_count: crate::video::raw_frame_count(secs, frame_rate),
            },
        }
    }

    fn test_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_build_records_single_group_unchanged() {
        let chunks = vec![
            chunk(0, "rec_20210901_1200", 60.0, 120),
            chunk(1, "rec_20210901_1200_b", 60.0, 120),
        ];

        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.num_frames_in_chunk, record.num_frames_initial);
            assert_eq!(record.num_frames_initial, 7202);
        }
    }

    #[test]
    fn test_build_records_corrects_boundary_chunk_only() {
        // One chunk at 12:00, next group starts 12:05 (300s later)
        let chunks = vec![
            chunk(0, "rec_20210901_1200", 60.0, 120),
            chunk(1, "rec_20210901_1205", 60.0, 120),
        ];

        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        // expected = 300 * 120 = 36000, observed = 7202, drift = 28798
        assert_eq!(records[0].num_frames_in_chunk, 36000);
        assert_eq!(records[0].num_frames_initial, 7202);
        // last chunk has no successor group, stays raw
        assert_eq!(records[1].num_frames_in_chunk, 7202);
    }

    #[test]
    fn test_build_records_sums_whole_group() {
        // Two chunks share 12:00, boundary to 12:05
        let chunks = vec![
            chunk(0, "rec_20210901_1200_a", 60.0, 120),
            chunk(1, "rec_20210901_1200_b", 60.0, 120),
            chunk(2, "rec_20210901_1205", 60.0, 120),
        ];

        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        // observed = 7202 + 7202, corrected applies to the group's last chunk
        let expected = 300 * 120;
        let drift = expected - 2 * 7202;
        assert_eq!(records[0].num_frames_in_chunk, 7202);
        assert_eq!(records[1].num_frames_in_chunk, 7202 + drift);
        assert_eq!(records[2].num_frames_in_chunk, 7202);
    }

    #[test]
    fn test_build_records_targets_row_by_index() {
        // The non-boundary chunk shares the boundary chunk's raw count but
        // must keep it untouched.
        let chunks = vec![
            chunk(0, "rec_20210901_1200", 60.0, 120),
            chunk(1, "rec_20210901_1205", 60.0, 120),
            chunk(2, "rec_20210901_1205_b", 60.0, 120),
        ];

        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        assert_ne!(records[0].num_frames_in_chunk, 7202);
        assert_eq!(records[1].num_frames_in_chunk, 7202);
        assert_eq!(records[2].num_frames_in_chunk, 7202);
    }

    #[test]
    fn test_build_records_multiple_boundaries() {
        let chunks = vec![
            chunk(0, "rec_20210901_1200", 60.0, 120),
            chunk(1, "rec_20210901_1205", 60.0, 120),
            chunk(2, "rec_20210901_1210", 60.0, 120),
        ];

        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        // Each boundary corrects exactly one chunk
        assert_eq!(records[0].num_frames_in_chunk, 36000);
        assert_eq!(records[1].num_frames_in_chunk, 36000);
        assert_eq!(records[2].num_frames_in_chunk, 7202);
        // Raw counts survive in the audit column
        assert!(records.iter().all(|r| r.num_frames_initial == 7202));
    }

    #[test]
    fn test_build_records_out_of_order_boundary_fails() {
        let chunks = vec![
            chunk(0, "rec_20210902_1200", 60.0, 120),
            chunk(1, "rec_20210901_1200", 60.0, 120),
        ];

        let result = build_records(&chunks, "Rebound", &test_config());
        assert!(result.is_err());
    }

    #[test]
    fn test_build_records_empty() {
        let records = build_records(&[], "Rebound", &test_config()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_build_records_paths() {
        let config = Config {
            remote_subdir: Some("Round2".to_string()),
            ..Default::default()
        };
        let chunks = vec![chunk(0, "rec_20210901_1200", 60.0, 120)];

        let records = build_records(&chunks, "Rebound", &config).unwrap();

        assert_eq!(records[0].recording_name, "Rebound");
        assert_eq!(
            records[0].recording_dir_path,
            "/global/scratch/recordings/Round2/Rebound"
        );
        assert_eq!(
            records[0].remote_chunk_path,
            "/tmp/Image_Stacks/rec_20210901_1200"
        );
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/home/jelly/Rebound"), "Rebound");
        assert_eq!(
            path,
            PathBuf::from("/home/jelly/Rebound/Initialization_DF/Rebound_PreInitializationDF.csv")
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Initialization_DF").join("out.csv");

        let chunks = vec![
            chunk(0, "rec_20210901_1200", 3599.973, 120),
            chunk(1, "rec_20210902_0800", 1800.5, 120),
        ];
        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();

        write_csv(&records, &path).unwrap();
        let reloaded = read_csv(&path).unwrap();

        assert_eq!(records, reloaded);
    }

    #[test]
    fn test_csv_round_trip_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_csv(&[], &path).unwrap();
        let reloaded = read_csv(&path).unwrap();

        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_csv_header_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let chunks = vec![chunk(0, "rec_20210901_1200", 60.0, 120)];
        let records = build_records(&chunks, "Rebound", &test_config()).unwrap();
        write_csv(&records, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "RecordingName,RecordingDirPath,ChunkName,RemoteChunkPath,\
             NumFramesInChunk,RecordingDuration,FrameRate,NumFramesInChunk_initial"
        );
    }
}
