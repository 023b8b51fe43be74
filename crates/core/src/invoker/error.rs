//! Error types for the invoker module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when driving the external image tool.
#[derive(Debug, Error)]
pub enum InvokerError {
    /// The magick binary could not be found.
    #[error("ImageMagick not found at path: {path}")]
    MagickNotFound { path: PathBuf },

    /// The tool ran but exited with a non-zero status.
    #[error("{operation} failed with exit code {code:?}")]
    CommandFailed {
        operation: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The operation exceeded the configured timeout.
    #[error("{operation} timed out after {timeout_secs} seconds")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    /// I/O error while spawning or waiting on the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InvokerError {
    /// Creates a command failure carrying captured stderr.
    pub fn command_failed(
        operation: impl Into<String>,
        code: Option<i32>,
        stderr: Option<String>,
    ) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            code,
            stderr,
        }
    }
}
