//! Shared builders for handler-level tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use osa_runner::{CommandExecutor, ExecutionError};

use crate::dispatch::Dispatcher;
use crate::logger::TracingLogger;
use crate::protocol::{ProtocolHandler, Session};

/// Executor that returns a canned reply and counts its runs.
#[derive(Debug)]
pub(crate) struct ScriptedExecutor {
    reply: Result<String, String>,
    runs: AtomicUsize,
}

impl ScriptedExecutor {
    pub(crate) fn printing(output: &str) -> Self {
        Self {
            reply: Ok(output.to_owned()),
            runs: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_owned()),
            runs: AtomicUsize::new(0),
        }
    }

    pub(crate) fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(&self, _script: &str) -> Result<String, ExecutionError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ExecutionError::failed)
    }
}

/// Handler over the full catalog with `executor` behind it.
pub(crate) fn handler_with(executor: Arc<dyn CommandExecutor>) -> ProtocolHandler {
    let registry = Arc::new(osa_scripts::catalog().build());
    let dispatcher = Dispatcher::new(registry, executor, Arc::new(TracingLogger));
    ProtocolHandler::new("applescript-server", dispatcher, Arc::new(Session::new()))
}

/// Handler whose scripts all print `output`.
pub(crate) fn handler_with_output(output: &str) -> ProtocolHandler {
    handler_with(Arc::new(ScriptedExecutor::printing(output)))
}
