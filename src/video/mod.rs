pub mod enumerate;
pub mod probe;
pub mod timestamp;

pub use enumerate::{chunk_stem, list_chunks, CHUNK_EXTENSION};
pub use probe::{check_ffmpeg, check_ffprobe, human_duration, measure_chunk, probe_duration, raw_frame_count};
pub use timestamp::CaptureToken;

use std::path::PathBuf;

/// Measured duration of one chunk, with the derived frame count.
#[derive(Debug, Clone)]
pub struct ChunkDuration {
    /// Duration reported by the probe, in seconds.
    pub seconds: f64,
    /// "H h M min S sec", each unit truncated.
    pub human: String,
    /// Estimated frames in the chunk: `trunc(seconds * frame_rate + 2)`.
    pub raw_frame_count: i64,
}

/// One physical video segment of a recording.
#[derive(Debug, Clone)]
pub struct RecordingChunk {
    pub path: PathBuf,
    /// File stem, carries the embedded capture timestamp.
    pub name: String,
    /// Zero-based position in sorted enumeration.
    pub order: usize,
    pub capture_token: CaptureToken,
    pub duration: ChunkDuration,
}

impl RecordingChunk {
    pub fn raw_frame_count(&self) -> i64 {
        self.duration.raw_frame_count
    }
}
