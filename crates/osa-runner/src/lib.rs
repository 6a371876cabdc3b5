//! Script execution for the AppleScript MCP server.
//!
//! The dispatcher hands every generated script to a [`CommandExecutor`]. The
//! production implementation, [`OsascriptExecutor`], runs the interpreter as
//! a child process (`osascript -e <script>` by default) without a shell, and
//! returns trimmed standard output. Tests substitute their own executor to
//! observe scripts without spawning anything.

mod error;
mod process;

pub use error::ExecutionError;
pub use process::OsascriptExecutor;

/// Runs a script and returns its textual result.
///
/// Implementations block until the script finishes. They must be shareable
/// across request threads.
///
/// # Example
///
/// ```
/// use osa_runner::{CommandExecutor, ExecutionError};
///
/// struct Echo;
///
/// impl CommandExecutor for Echo {
///     fn run(&self, script: &str) -> Result<String, ExecutionError> {
///         Ok(script.to_owned())
///     }
/// }
///
/// assert_eq!(Echo.run("return 1").ok().as_deref(), Some("return 1"));
/// ```
pub trait CommandExecutor: Send + Sync {
    /// Executes `script` and returns its trimmed output.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when the interpreter cannot be started,
    /// exits unsuccessfully, or exceeds its time limit.
    fn run(&self, script: &str) -> Result<String, ExecutionError>;
}

impl<T> CommandExecutor for std::sync::Arc<T>
where
    T: CommandExecutor + ?Sized,
{
    fn run(&self, script: &str) -> Result<String, ExecutionError> {
        (**self).run(script)
    }
}
