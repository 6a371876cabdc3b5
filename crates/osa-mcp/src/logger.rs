//! Severity-tagged log records for tool dispatch.
//!
//! Every record is emitted through `tracing`. [`SessionLogger`] additionally
//! forwards records to the client as `notifications/message` once the
//! session is connected. Logging never fails from the caller's point of view:
//! forwarding errors are reported to `tracing` and otherwise dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::{debug, error, info, warn};

use crate::protocol::{Notification, Session};
use crate::transport::OutputSink;

/// Tracing target for dispatch records.
pub(crate) const LOG_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// RFC 5424 severities, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    /// Debug-level messages.
    #[default]
    Debug,
    /// Informational messages.
    Info,
    /// Normal but significant conditions.
    Notice,
    /// Warning conditions.
    Warning,
    /// Error conditions.
    Error,
    /// Critical conditions.
    Critical,
    /// Action must be taken immediately.
    Alert,
    /// The system is unusable.
    Emergency,
}

/// Sink for dispatch log records.
pub trait Logger: Send + Sync {
    /// Records `message` at `level` with structured `data`.
    fn log(&self, level: LogLevel, message: &str, data: &Value);
}

impl<T> Logger for Arc<T>
where
    T: Logger + ?Sized,
{
    fn log(&self, level: LogLevel, message: &str, data: &Value) {
        (**self).log(level, message, data);
    }
}

/// Logger that only emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, data: &Value) {
        trace_record(level, message, data);
    }
}

/// Logger that also forwards records to a connected client.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session: Arc<Session>,
    sink: OutputSink,
    name: String,
}

impl SessionLogger {
    /// Creates a logger that forwards through `sink` while `session` is
    /// connected. `name` is reported as the notification's logger.
    pub fn new(session: Arc<Session>, sink: OutputSink, name: impl Into<String>) -> Self {
        Self {
            session,
            sink,
            name: name.into(),
        }
    }
}

impl Logger for SessionLogger {
    fn log(&self, level: LogLevel, message: &str, data: &Value) {
        trace_record(level, message, data);
        if !self.session.forwards(level) {
            return;
        }
        let notification = Notification::log_message(level, &self.name, message, data);
        if let Err(forward_error) = self.sink.write_message(&notification) {
            warn!(
                target: LOG_TARGET,
                error = %forward_error,
                "failed to forward log record to client"
            );
        }
    }
}

fn trace_record(level: LogLevel, message: &str, data: &Value) {
    match level {
        LogLevel::Debug => debug!(target: LOG_TARGET, %data, "{message}"),
        LogLevel::Info | LogLevel::Notice => {
            info!(target: LOG_TARGET, severity = %level, %data, "{message}");
        }
        LogLevel::Warning => warn!(target: LOG_TARGET, %data, "{message}"),
        LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
            error!(target: LOG_TARGET, severity = %level, %data, "{message}");
        }
    }
}
