/// Default log filter expression used by the server.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default name advertised during the MCP handshake.
pub const DEFAULT_SERVER_NAME: &str = "applescript-server";

/// Default interpreter used to run generated scripts.
pub const DEFAULT_INTERPRETER: &str = "osascript";

/// Default flag introducing an inline script.
pub const DEFAULT_SCRIPT_FLAG: &str = "-e";

/// Default log filter expression used by the server.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format. Compact lines read better next to a client that
/// captures the server's stderr.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Owned default server name.
#[must_use]
pub fn default_server_name() -> String {
    DEFAULT_SERVER_NAME.to_owned()
}

/// Owned default interpreter program.
#[must_use]
pub fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_owned()
}

/// Owned default script flag.
#[must_use]
pub fn default_script_flag() -> String {
    DEFAULT_SCRIPT_FLAG.to_owned()
}
