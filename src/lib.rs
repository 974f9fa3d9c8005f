pub mod config;
pub mod drift;
pub mod error;
pub mod pipeline;
pub mod stack;
pub mod table;
pub mod video;

pub use config::Config;
pub use error::{PreinitError, Result};
pub use pipeline::{print_summary, run_preinit, PipelineResult, PipelineStats};
