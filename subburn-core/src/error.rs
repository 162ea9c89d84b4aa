//! Error types for the render pipeline.
//!
//! Every stage failure surfaces as a single `CoreError` at the pipeline
//! boundary; callers see one error per job.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for subburn
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Required asset missing: {0}")]
    MissingAsset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio probe failed: {0}")]
    Probe(String),

    #[error("Invalid audio duration: {0} seconds")]
    InvalidDuration(f64),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Render timed out after {0} seconds")]
    RenderTimeout(u64),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, String),

    #[error("Command '{cmd}' failed ({status}): {stderr}")]
    CommandFailed {
        cmd: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for subburn operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: impl std::fmt::Display) -> CoreError {
    CoreError::CommandStart(cmd.into(), err.to_string())
}

/// Creates a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status: status.to_string(),
        stderr: stderr.into(),
    }
}
