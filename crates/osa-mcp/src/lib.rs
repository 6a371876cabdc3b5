//! Model Context Protocol server that runs AppleScript on the host.
//!
//! The server speaks JSON-RPC 2.0 over stdin and stdout, one message per
//! line. Clients discover tools with `tools/list` and invoke them with
//! `tools/call`; every tool is an operation from [`osa_scripts`] addressed as
//! `<category>_<operation>`. A call resolves the operation, renders its
//! script from the request arguments and runs it through the configured
//! interpreter (`osascript -e` by default).
//!
//! Bootstrap loads configuration through [`ConfigLoader`], installs a
//! stderr `tracing` subscriber and freezes the catalog into a shared
//! [`osa_catalog::Registry`]. Lifecycle events are reported through a
//! [`HealthReporter`]. Dispatch records are logged through `tracing` and,
//! once the client has completed the handshake, forwarded to it as
//! `notifications/message`.

mod bootstrap;
pub mod dispatch;
mod health;
pub mod logger;
pub mod protocol;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Server, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
