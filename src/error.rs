use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreinitError {
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("No duration found in probe output for {0}")]
    MissingDuration(String),

    #[error("Chunk name has no capture timestamp: {0}")]
    MalformedChunkName(String),

    #[error("Invalid capture timestamp '{token}': {source}")]
    BadTimestamp {
        token: String,
        source: chrono::format::ParseError,
    },

    #[error("Capture timestamps at boundary are not chronological: {start} -> {end}")]
    NonChronologicalBoundary { start: String, end: String },

    #[error("Stack extraction failed: {0}")]
    StackExtraction(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PreinitError>;
