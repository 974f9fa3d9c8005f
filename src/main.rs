use anyhow::{Context, Result};
use clap::Parser;
use preinit::config::Config;
use preinit::stack::{extract_init_stack, parse_timepoint};
use preinit::{print_summary, run_preinit};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "preinit")]
#[command(version, about = "Recording metadata and frame alignment for chunked specimen videos")]
#[command(
    long_about = "Build the pre-initialization table for a multi-day chunked recording: probe \
each chunk's duration, align frame counts against wall-clock time at capture-date boundaries, \
and persist one CSV row per chunk for the downstream tracking stages."
)]
struct Cli {
    /// Directory of video chunk files
    recordings_dir: PathBuf,

    /// Home directory of the recording (table and stack are written here)
    home_dir: PathBuf,

    /// Capture frame rate in frames per second
    #[arg(short, long)]
    frame_rate: Option<u32>,

    /// Remote scratch root recorded in the table
    #[arg(long)]
    remote_root: Option<String>,

    /// Additional remote subdirectory recorded in the table
    #[arg(long)]
    remote_subdir: Option<String>,

    /// Remote working directory recorded for chunk image stacks
    #[arg(long)]
    remote_working_root: Option<String>,

    /// Also extract an initialization stack from this chunk (1-based)
    #[arg(long)]
    stack_chunk: Option<usize>,

    /// Stack start time point within the chunk, as MM:SS
    #[arg(long, default_value = "00:00")]
    stack_start: String,

    /// Stack end time point within the chunk, as MM:SS
    #[arg(long, default_value = "00:30")]
    stack_end: String,

    /// Hide the per-chunk progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if !cli.recordings_dir.exists() {
        anyhow::bail!(
            "Recordings directory not found: {}",
            cli.recordings_dir.display()
        );
    }

    std::fs::create_dir_all(&cli.home_dir).with_context(|| {
        format!("Failed to create home directory {}", cli.home_dir.display())
    })?;

    // Load configuration, then apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(rate) = cli.frame_rate {
        config.frame_rate = rate;
    }
    if let Some(root) = cli.remote_root {
        config.remote_root = root;
    }
    if let Some(subdir) = cli.remote_subdir {
        config.remote_subdir = Some(subdir);
    }
    if let Some(working) = cli.remote_working_root {
        config.remote_working_root = working;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Recordings: {}", cli.recordings_dir.display());
    info!("Home:       {}", cli.home_dir.display());
    info!("Frame rate: {} fps", config.frame_rate);

    // Optional initialization stack, extracted before the table build to
    // match the capture workflow's run order
    if let Some(chunk) = cli.stack_chunk {
        let start = parse_timepoint(&cli.stack_start).map_err(|e| anyhow::anyhow!(e))?;
        let end = parse_timepoint(&cli.stack_end).map_err(|e| anyhow::anyhow!(e))?;

        let stack_dir = extract_init_stack(
            &cli.recordings_dir,
            &cli.home_dir,
            chunk,
            start,
            end,
            config.frame_rate,
        )
        .context("Initialization stack extraction failed")?;
        info!("Initialization stack written to {}", stack_dir.display());
    }

    let result = run_preinit(&cli.recordings_dir, &cli.home_dir, &config, !cli.no_progress)
        .context("Pre-initialization table build failed")?;

    print_summary(&result);

    Ok(())
}
