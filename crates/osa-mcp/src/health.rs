//! Structured health reporting for server lifecycle events.

use std::sync::Arc;

use osa_config::Config;

use crate::bootstrap::BootstrapError;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked once per category as the catalog is assembled.
    fn category_registered(&self, name: &str, operations: usize);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked after the request loop has finished.
    fn server_stopped(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn category_registered(&self, name: &str, operations: usize) {
        (**self).category_registered(name, operations);
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn server_stopped(&self) {
        (**self).server_stopped();
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: "osa_mcp::health",
            event = "bootstrap_starting",
            "starting server bootstrap"
        );
    }

    fn category_registered(&self, name: &str, operations: usize) {
        tracing::debug!(
            target: "osa_mcp::health",
            event = "category_registered",
            category = name,
            operations,
            "registered category"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: "osa_mcp::health",
            event = "bootstrap_succeeded",
            server_name = %config.server_name(),
            interpreter = %config.interpreter(),
            timeout_secs = ?config.script_timeout_secs,
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "server bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "osa_mcp::health",
            event = "bootstrap_failed",
            error = %error,
            "server bootstrap failed"
        );
    }

    fn server_stopped(&self) {
        tracing::info!(
            target: "osa_mcp::health",
            event = "server_stopped",
            "input closed; server stopped"
        );
    }
}
