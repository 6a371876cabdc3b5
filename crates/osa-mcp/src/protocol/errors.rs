//! Errors raised while reading requests and writing responses.

use std::io;

use thiserror::Error;

/// Failures of the stdio transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading a request line or writing a response failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A message could not be encoded as JSON.
    #[error("failed to serialise message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The shared output writer was poisoned by a panicking thread.
    #[error("output writer is unavailable after a thread panicked")]
    Poisoned,
}
