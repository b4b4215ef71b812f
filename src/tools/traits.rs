// traits.rs - External alignment tool seam

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure talking to an external alignment or validation tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to start {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {status}: {stderr}")]
    Failed {
        tool: String,
        status: i32,
        stderr: String,
    },

    #[error("{tool} did not produce {path}")]
    MissingOutput { tool: String, path: PathBuf },
}

/// Multiple sequence alignment tool plus its FASTA validator.
///
/// Calls block until the external process exits.
pub trait MsaTool: Send + Sync {
    /// Tool name for log lines
    fn name(&self) -> &str;

    /// Align `input` into `output`. Success requires `output` to exist afterwards.
    fn align(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Whether `path` is well-formed FASTA
    fn validate(&self, path: &Path) -> Result<bool, ToolError>;
}
