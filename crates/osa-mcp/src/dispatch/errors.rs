//! Errors that escape tool dispatch.
//!
//! Production and execution failures are folded into error envelopes, so the
//! only failure a caller sees is a tool name that does not resolve. The
//! protocol layer reports it as a method-not-found fault.

use osa_catalog::ResolveError;
use thiserror::Error;

/// Tool dispatch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The tool name does not address a registered operation.
    #[error("{source}")]
    UnknownTool {
        /// Requested tool name.
        tool: String,
        /// Lookup failure.
        #[source]
        source: ResolveError,
    },
}

impl DispatchError {
    /// Creates an unknown-tool error.
    pub fn unknown_tool(tool: impl Into<String>, source: ResolveError) -> Self {
        Self::UnknownTool {
            tool: tool.into(),
            source,
        }
    }

    /// Requested tool name.
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool { tool, .. } => tool,
        }
    }
}
