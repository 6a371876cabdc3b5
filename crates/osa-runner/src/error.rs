//! Errors raised while running scripts.
//!
//! I/O errors are wrapped in `Arc` so the enum stays cheap to clone and move
//! between threads.

use std::sync::Arc;

use thiserror::Error;

/// Failure of a single script run.
#[derive(Debug, Clone, Error)]
pub enum ExecutionError {
    /// The interpreter process could not be started.
    #[error("failed to start '{interpreter}': {source}")]
    Spawn {
        /// Interpreter program.
        interpreter: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The interpreter ran but reported failure.
    #[error("script execution failed: {message}")]
    Failed {
        /// Exit code, when the process exited normally.
        status: Option<i32>,
        /// Trimmed standard error, or a status description when stderr was
        /// empty.
        message: String,
    },

    /// The interpreter did not finish within the configured limit.
    #[error("script execution timed out after {timeout_secs}s")]
    Timeout {
        /// Configured limit in seconds.
        timeout_secs: u64,
    },

    /// Communication with the child process failed.
    #[error("I/O error while running '{interpreter}': {source}")]
    Io {
        /// Interpreter program.
        interpreter: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ExecutionError {
    /// Creates a failure with a free-form message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            status: None,
            message: message.into(),
        }
    }
}
