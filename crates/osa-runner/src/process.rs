//! Process-backed script execution.
//!
//! [`OsascriptExecutor`] spawns `<interpreter> <flag> <script>` directly,
//! with stdin closed and both output streams piped. Each stream is drained on
//! its own thread so a chatty script cannot block on a full pipe while the
//! executor waits for it to exit.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::CommandExecutor;
use crate::error::ExecutionError;

/// Tracing target for process operations.
const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Interval between exit checks while a timeout is in force.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs scripts through an external interpreter.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
///
/// use osa_runner::{CommandExecutor, OsascriptExecutor};
///
/// let executor = OsascriptExecutor::default().with_timeout(Some(Duration::from_secs(30)));
/// let _frontmost = executor.run(
///     "tell application \"System Events\" to get name of first process whose frontmost is true",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsascriptExecutor {
    interpreter: String,
    script_flag: String,
    timeout: Option<Duration>,
}

impl Default for OsascriptExecutor {
    fn default() -> Self {
        Self::new("osascript", "-e")
    }
}

impl OsascriptExecutor {
    /// Creates an executor for `interpreter`, passing scripts after
    /// `script_flag`.
    pub fn new(interpreter: impl Into<String>, script_flag: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_flag: script_flag.into(),
            timeout: None,
        }
    }

    /// Sets the per-script time limit. `None` waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Interpreter program.
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Configured time limit.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn(&self, script: &str) -> Result<Child, ExecutionError> {
        debug!(
            target: PROCESS_TARGET,
            interpreter = %self.interpreter,
            script_bytes = script.len(),
            "spawning interpreter"
        );
        Command::new(&self.interpreter)
            .arg(&self.script_flag)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                interpreter: self.interpreter.clone(),
                source: Arc::new(source),
            })
    }

    fn io_error(&self, source: io::Error) -> ExecutionError {
        ExecutionError::Io {
            interpreter: self.interpreter.clone(),
            source: Arc::new(source),
        }
    }
}

impl CommandExecutor for OsascriptExecutor {
    fn run(&self, script: &str) -> Result<String, ExecutionError> {
        let mut child = self.spawn(script)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_for_exit(&mut child, self.timeout) {
            Ok(status) => status,
            Err(WaitError::TimedOut(limit)) => {
                warn!(
                    target: PROCESS_TARGET,
                    interpreter = %self.interpreter,
                    timeout_secs = limit.as_secs(),
                    "script timed out, killing interpreter"
                );
                drop(child.kill());
                drop(child.wait());
                return Err(ExecutionError::Timeout {
                    timeout_secs: limit.as_secs(),
                });
            }
            Err(WaitError::Io(source)) => return Err(self.io_error(source)),
        };

        let output = collect(stdout).map_err(|source| self.io_error(source))?;
        let errors = collect(stderr).map_err(|source| self.io_error(source))?;
        debug!(
            target: PROCESS_TARGET,
            interpreter = %self.interpreter,
            ?status,
            stdout_bytes = output.len(),
            stderr_bytes = errors.len(),
            "interpreter exited"
        );

        if status.success() {
            return Ok(output.trim().to_owned());
        }
        Err(failure(status, &errors))
    }
}

enum WaitError {
    TimedOut(Duration),
    Io(io::Error),
}

/// Waits for the child, polling when a time limit applies.
fn wait_for_exit(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, WaitError> {
    let Some(limit) = timeout else {
        return child.wait().map_err(WaitError::Io);
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if start.elapsed() > limit => return Err(WaitError::TimedOut(limit)),
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(error) => return Err(WaitError::Io(error)),
        }
    }
}

type Drain = Option<JoinHandle<io::Result<String>>>;

/// Reads a pipe to completion on a background thread.
fn drain<R>(pipe: Option<R>) -> Drain
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    })
}

fn collect(handle: Drain) -> io::Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
        None => Ok(String::new()),
    }
}

fn failure(status: ExitStatus, stderr: &str) -> ExecutionError {
    let detail = stderr.trim();
    let message = if detail.is_empty() {
        format!("interpreter exited with {status}")
    } else {
        detail.to_owned()
    };
    ExecutionError::Failed {
        status: status.code(),
        message,
    }
}
