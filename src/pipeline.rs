use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PreinitError, Result};
use crate::table::{build_records, output_path, write_csv, PreInitRecord};
use crate::video::{
    check_ffprobe, chunk_stem, list_chunks, measure_chunk, CaptureToken, RecordingChunk,
};

/// Statistics from a pre-initialization run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total time taken for the entire run.
    pub total_time: Duration,
    /// Time spent probing chunk durations.
    pub probe_time: Duration,
    /// Number of chunks processed.
    pub chunks_processed: usize,
    /// Number of capture-date boundaries corrected.
    pub boundaries_corrected: usize,
    /// Summed measured duration of all chunks, in seconds.
    pub total_duration_secs: f64,
}

/// Result of a pre-initialization run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path of the persisted table.
    pub output_path: PathBuf,
    /// The table rows, in enumeration order.
    pub records: Vec<PreInitRecord>,
    /// Run statistics.
    pub stats: PipelineStats,
}

/// Enumerate and measure the chunks of a recording.
///
/// Chunks come back in stable enumeration order. Each chunk blocks on one
/// probe subprocess; any probe or naming failure aborts the whole load.
pub fn load_chunks(
    recordings_dir: &Path,
    frame_rate: u32,
    show_progress: bool,
) -> Result<Vec<RecordingChunk>> {
    let paths = list_chunks(recordings_dir)?;
    if !paths.is_empty() {
        check_ffprobe()?;
    }

    let progress = if show_progress && !paths.is_empty() {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green} {pos}/{len} {msg}")
                .expect("valid progress template"),
        );
        Some(pb)
    } else {
        None
    };

    let mut chunks = Vec::with_capacity(paths.len());
    for (order, path) in paths.iter().enumerate() {
        let name = chunk_stem(path)?;
        if let Some(pb) = &progress {
            pb.set_message(name.clone());
        }

        let capture_token = CaptureToken::from_stem(&name)?;
        let duration = measure_chunk(path, frame_rate)?;

        debug!(
            "Chunk {} ({}): {} frames",
            order, name, duration.raw_frame_count
        );

        chunks.push(RecordingChunk {
            path: path.clone(),
            name,
            order,
            capture_token,
            duration,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("probed");
    }

    Ok(chunks)
}

/// Build and persist the pre-initialization table for one recording.
///
/// Walks the recording directory in enumeration order, probes every chunk,
/// applies the frame-drift correction at each capture-date boundary, and
/// writes the table to `<home>/Initialization_DF/`. Fail-fast: no partial
/// table is written on error. An empty recording directory yields an empty
/// table, which is still written.
pub fn run_preinit(
    recordings_dir: &Path,
    home_dir: &Path,
    config: &Config,
    show_progress: bool,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    if !recordings_dir.exists() {
        return Err(PreinitError::FileNotFound(
            recordings_dir.display().to_string(),
        ));
    }

    let recording_name = recording_name(home_dir)?;
    info!(
        "Building pre-initialization table for '{}' from {}",
        recording_name,
        recordings_dir.display()
    );

    let probe_start = Instant::now();
    let chunks = load_chunks(recordings_dir, config.frame_rate, show_progress)?;
    let probe_time = probe_start.elapsed();

    info!(
        "Probed {} chunks in {:.2}s",
        chunks.len(),
        probe_time.as_secs_f64()
    );

    let records = build_records(&chunks, &recording_name, config)?;

    let boundaries_corrected = chunks
        .windows(2)
        .filter(|pair| pair[0].capture_token != pair[1].capture_token)
        .count();
    let total_duration_secs = chunks.iter().map(|c| c.duration.seconds).sum();

    let path = output_path(home_dir, &recording_name);
    write_csv(&records, &path)?;

    let stats = PipelineStats {
        total_time: start_time.elapsed(),
        probe_time,
        chunks_processed: chunks.len(),
        boundaries_corrected,
        total_duration_secs,
    };

    Ok(PipelineResult {
        output_path: path,
        records,
        stats,
    })
}

/// Recording name derived from the home directory stem.
pub fn recording_name(home_dir: &Path) -> Result<String> {
    home_dir
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            PreinitError::Config(format!(
                "Cannot derive recording name from home directory {}",
                home_dir.display()
            ))
        })
}

/// Print a summary of the run.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                 Pre-Initialization Table Complete              ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:      {}", result.output_path.display());
    println!("  Chunks:      {}", result.stats.chunks_processed);
    println!("  Boundaries:  {}", result.stats.boundaries_corrected);
    println!(
        "  Footage:     {:.1}s measured",
        result.stats.total_duration_secs
    );
    println!();
    println!("  Timing:");
    println!(
        "    Probe:     {:.2}s",
        result.stats.probe_time.as_secs_f64()
    );
    println!(
        "    Total:     {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
