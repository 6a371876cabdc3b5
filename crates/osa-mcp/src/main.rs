//! Entry point for the AppleScript MCP server.
//!
//! Configuration comes from defaults, an optional file, `OSA_*` environment
//! variables and command-line flags. The protocol runs on stdin and stdout;
//! logs go to stderr.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use osa_mcp::{StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

fn main() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    let server = match bootstrap_with(&SystemConfigLoader, reporter) {
        Ok(server) => server,
        Err(error) => {
            #[expect(
                clippy::let_underscore_must_use,
                reason = "telemetry is not installed yet and stderr is the only channel left"
            )]
            let _ = writeln!(io::stderr().lock(), "osa-mcp: {error}");
            return ExitCode::FAILURE;
        }
    };

    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(
                target: "osa_mcp::transport",
                error = %error,
                "server stopped with an error"
            );
            ExitCode::FAILURE
        }
    }
}
