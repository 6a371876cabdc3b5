//! Per-connection session state shared by the handler and the logger.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::logger::LogLevel;

/// Connection flag and the client's chosen log level.
///
/// The session starts disconnected with every level forwarded; the client
/// narrows the level through `logging/setLevel`.
#[derive(Debug, Default)]
pub struct Session {
    connected: AtomicBool,
    level: Mutex<LogLevel>,
}

impl Session {
    /// Creates a disconnected session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the session connected after `notifications/initialized`.
    pub fn connect(&self) {
        self.connected.store(true, Ordering::Release);
    }

    /// Returns `true` once the client has finished the handshake.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Sets the minimum level forwarded to the client.
    pub fn set_level(&self, level: LogLevel) {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Minimum level forwarded to the client.
    #[must_use]
    pub fn level(&self) -> LogLevel {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` when a record at `level` should reach the client.
    #[must_use]
    pub fn forwards(&self, level: LogLevel) -> bool {
        self.is_connected() && level >= self.level()
    }
}
