use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PreinitError, Result};

/// File extension of recording chunks produced by the capture hardware.
pub const CHUNK_EXTENSION: &str = "mp4";

/// List chunk files in a recording directory.
///
/// Only files with the chunk extension are returned, sorted lexically by
/// path so enumeration order is stable across runs. An empty directory
/// yields an empty list, not an error.
pub fn list_chunks(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut chunks: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext == CHUNK_EXTENSION)
                .unwrap_or(false)
        })
        .collect();

    chunks.sort();

    debug!("Found {} chunk files in {}", chunks.len(), dir.display());
    Ok(chunks)
}

/// Stem identifier of a chunk file.
pub fn chunk_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| PreinitError::MalformedChunkName(path.display().to_string()))
}
