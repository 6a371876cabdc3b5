//! Resolve, produce, execute, post-process.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};

use osa_catalog::Registry;
use osa_runner::CommandExecutor;
use osa_scripts::HIERARCHICAL_SOURCE;

use super::errors::DispatchError;
use super::outcome::ToolOutcome;
use crate::logger::{LogLevel, Logger};

/// Characters of script text included in execution log records.
const PREVIEW_CHARS: usize = 100;

/// Runs tools on behalf of the protocol handler.
///
/// The dispatcher is shared across request threads; each invocation keeps
/// its own state on the stack.
pub struct Dispatcher {
    registry: Arc<Registry>,
    executor: Arc<dyn CommandExecutor>,
    logger: Arc<dyn Logger>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    pub fn new(
        registry: Arc<Registry>,
        executor: Arc<dyn CommandExecutor>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            registry,
            executor,
            logger,
        }
    }

    /// Registry the dispatcher resolves against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Invokes `tool` with optional `arguments`.
    ///
    /// Failures to build or run the script come back as an error envelope.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownTool`] when the name does not resolve.
    /// The executor is not called in that case.
    pub fn invoke(
        &self,
        tool: &str,
        arguments: Option<&Value>,
    ) -> Result<ToolOutcome, DispatchError> {
        self.logger.log(
            LogLevel::Info,
            "Tool execution requested",
            &json!({ "tool": tool, "hasArguments": arguments.is_some() }),
        );

        let resolved = match self.registry.resolve(tool) {
            Ok(resolved) => resolved,
            Err(source) => {
                self.logger.log(
                    LogLevel::Warning,
                    "Tool not found",
                    &json!({ "tool": tool, "error": source.to_string() }),
                );
                return Err(DispatchError::unknown_tool(tool, source));
            }
        };

        let producer = resolved.operation.producer();
        self.logger.log(
            LogLevel::Debug,
            "Generating script content",
            &json!({
                "category": resolved.category.name(),
                "operation": resolved.operation.name(),
                "isFunction": producer.is_computed(),
            }),
        );

        let script = match producer.produce(arguments) {
            Ok(script) => script,
            Err(error) => return Ok(self.fail(tool, &error.to_string())),
        };

        let raw = match self.execute(&script) {
            Ok(output) => output,
            Err(message) => return Ok(self.fail(tool, &message)),
        };

        let (category, operation) = HIERARCHICAL_SOURCE;
        let text = if resolved.is(category, operation) && osa_outline::is_hierarchical(&raw) {
            self.reconstruct(raw)
        } else {
            raw
        };

        self.logger.log(
            LogLevel::Info,
            "Tool execution completed successfully",
            &json!({ "tool": tool, "resultLength": text.len() }),
        );
        Ok(ToolOutcome::success(text))
    }

    fn execute(&self, script: &str) -> Result<String, String> {
        let preview = preview(script);
        self.logger.log(
            LogLevel::Debug,
            "Executing AppleScript",
            &json!({ "scriptPreview": preview }),
        );

        let started = Instant::now();
        match self.executor.run(script) {
            Ok(output) => {
                let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.logger.log(
                    LogLevel::Debug,
                    "AppleScript executed successfully",
                    &json!({ "executionTimeMs": elapsed, "outputLength": output.len() }),
                );
                Ok(output)
            }
            Err(error) => {
                let message = error.to_string();
                self.logger.log(
                    LogLevel::Error,
                    "AppleScript execution failed",
                    &json!({ "error": message, "scriptPreview": preview }),
                );
                Err(message)
            }
        }
    }

    fn reconstruct(&self, raw: String) -> String {
        match osa_outline::render(&raw) {
            Ok(tree) => tree,
            Err(error) => {
                self.logger.log(
                    LogLevel::Error,
                    "Failed to parse hierarchical data",
                    &json!({ "error": error.to_string() }),
                );
                raw
            }
        }
    }

    fn fail(&self, tool: &str, message: &str) -> ToolOutcome {
        self.logger.log(
            LogLevel::Error,
            "Error during tool execution",
            &json!({ "tool": tool, "errorMessage": message }),
        );
        ToolOutcome::failure(message)
    }
}

/// First [`PREVIEW_CHARS`] characters of `script`, with an ellipsis when
/// truncated.
fn preview(script: &str) -> String {
    let mut chars = script.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::short("return 1", "return 1")]
    #[case::exactly_limit(&"a".repeat(100), &"a".repeat(100))]
    #[case::truncated(&"b".repeat(101), &format!("{}...", "b".repeat(100)))]
    fn previews_are_bounded(#[case] script: &str, #[case] expected: &str) {
        assert_eq!(preview(script), expected);
    }
}
