//! Shared configuration for the AppleScript MCP server.
//!
//! Values are layered by `ortho_config`: built-in defaults first, then an
//! optional configuration file (`--config-path` or `OSA_CONFIG_PATH`), then
//! `OSA_*` environment variables, and finally command-line flags. The server
//! binary loads a [`Config`] once during bootstrap and hands the relevant
//! pieces to the telemetry layer and the script executor.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_INTERPRETER, DEFAULT_LOG_FILTER, DEFAULT_SCRIPT_FLAG, DEFAULT_SERVER_NAME,
    default_interpreter, default_log_filter, default_log_filter_string, default_log_format,
    default_script_flag, default_server_name,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "OSA")]
pub struct Config {
    /// Tracing filter expression applied to stderr logging.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for stderr logging.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Name reported to clients during the `initialize` handshake.
    #[serde(default = "defaults::default_server_name")]
    pub server_name: String,
    /// Program used to run generated scripts.
    #[serde(default = "defaults::default_interpreter")]
    pub interpreter: String,
    /// Flag passed to the interpreter ahead of the script text.
    #[serde(default = "defaults::default_script_flag")]
    pub script_flag: String,
    /// Upper bound on a single script run. Unset means wait indefinitely.
    #[serde(default)]
    pub script_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            server_name: defaults::default_server_name(),
            interpreter: defaults::default_interpreter(),
            script_flag: defaults::default_script_flag(),
            script_timeout_secs: None,
        }
    }
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the server name advertised to clients.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Returns the interpreter program.
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Returns the flag that introduces the script argument.
    #[must_use]
    pub fn script_flag(&self) -> &str {
        &self.script_flag
    }

    /// Returns the script timeout, if one is configured.
    #[must_use]
    pub fn script_timeout(&self) -> Option<Duration> {
        self.script_timeout_secs.map(Duration::from_secs)
    }
}
