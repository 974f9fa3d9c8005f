use crate::error::{PreinitError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default capture frame rate in frames per second.
pub const DEFAULT_FRAME_RATE: u32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Nominal capture frame rate, constant across a recording.
    pub frame_rate: u32,
    /// Root of the remote scratch directory recorded in the table.
    pub remote_root: String,
    /// Optional additional subdirectory between the root and the recording.
    pub remote_subdir: Option<String>,
    /// Remote working directory where chunk image stacks will live.
    pub remote_working_root: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            remote_root: "global/scratch/recordings".to_string(),
            remote_subdir: None,
            remote_working_root: "/tmp/Image_Stacks".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(rate) = std::env::var("PREINIT_FRAME_RATE") {
            if let Ok(r) = rate.parse() {
                config.frame_rate = r;
            }
        }
        if let Ok(root) = std::env::var("PREINIT_REMOTE_ROOT") {
            config.remote_root = root;
        }
        if let Ok(subdir) = std::env::var("PREINIT_REMOTE_SUBDIR") {
            config.remote_subdir = Some(subdir);
        }
        if let Ok(working) = std::env::var("PREINIT_REMOTE_WORKING_ROOT") {
            config.remote_working_root = working;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(PreinitError::Config(
                "Frame rate must be greater than 0".to_string(),
            ));
        }

        if self.remote_root.is_empty() {
            return Err(PreinitError::Config(
                "Remote root path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Remote directory path recorded for a recording, e.g.
    /// `/global/scratch/recordings/MyJelly` or with the optional subdirectory
    /// `/global/scratch/recordings/Round2/MyJelly`.
    pub fn remote_recording_dir(&self, recording_name: &str) -> String {
        match &self.remote_subdir {
            Some(subdir) => format!("/{}/{}/{}", self.remote_root, subdir, recording_name),
            None => format!("/{}/{}", self.remote_root, recording_name),
        }
    }

    /// Remote working path recorded for a chunk's image stack.
    pub fn remote_chunk_path(&self, chunk_name: &str) -> String {
        format!("{}/{}", self.remote_working_root, chunk_name)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("preinit").join("config.toml"))
    }
}
