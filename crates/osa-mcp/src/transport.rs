//! Line-oriented stdio transport.
//!
//! Requests are read on the calling thread. Each `tools/call` runs on its own
//! worker thread so a slow script does not hold up `ping` or `tools/list`;
//! every other method is answered inline. All output goes through one
//! [`OutputSink`], which writes a whole JSON line under its lock. When input
//! ends, outstanding workers are joined before [`serve`] returns.

use std::fmt;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::protocol::{Incoming, ProtocolError, ProtocolHandler, ToolCall};

/// Tracing target for transport events.
const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Shared writer for protocol messages.
#[derive(Clone)]
pub struct OutputSink {
    writer: SharedWriter,
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

impl OutputSink {
    /// Wraps `writer`.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Serialises `message` and writes it as one line, then flushes.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] when serialisation or the write fails, or
    /// when another thread panicked while holding the writer.
    pub fn write_message<T: Serialize>(&self, message: &T) -> Result<(), ProtocolError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        let mut writer = self.writer.lock().map_err(|_| ProtocolError::Poisoned)?;
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Serves requests from `input` until end of input.
///
/// # Errors
///
/// Returns a [`ProtocolError`] when reading fails or an inline response
/// cannot be written. Workers already started are joined first.
pub fn serve<R: BufRead>(
    input: R,
    sink: &OutputSink,
    handler: &Arc<ProtocolHandler>,
) -> Result<(), ProtocolError> {
    let mut workers = Vec::new();
    let outcome = read_requests(input, sink, handler, &mut workers);
    join_workers(workers);
    outcome
}

fn read_requests<R: BufRead>(
    mut input: R,
    sink: &OutputSink,
    handler: &Arc<ProtocolHandler>,
    workers: &mut Vec<JoinHandle<()>>,
) -> Result<(), ProtocolError> {
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if input.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buffer);
        let line = text.trim();
        if line.is_empty() {
            continue;
        }
        match handler.receive(line) {
            Incoming::Reply(response) => sink.write_message(&response)?,
            Incoming::Silent => {}
            Incoming::Call(call) => {
                workers.retain(|worker| !worker.is_finished());
                workers.push(spawn_call(call, sink, handler));
            }
        }
    }
    debug!(target: TRANSPORT_TARGET, "input closed");
    Ok(())
}

fn spawn_call(
    call: ToolCall,
    sink: &OutputSink,
    handler: &Arc<ProtocolHandler>,
) -> JoinHandle<()> {
    let worker_handler = Arc::clone(handler);
    let worker_sink = sink.clone();
    thread::spawn(move || {
        let response = worker_handler.call(call);
        if let Err(write_error) = worker_sink.write_message(&response) {
            warn!(
                target: TRANSPORT_TARGET,
                error = %write_error,
                "failed to write tool response"
            );
        }
    })
}

fn join_workers(workers: Vec<JoinHandle<()>>) {
    for worker in workers {
        if worker.join().is_err() {
            error!(target: TRANSPORT_TARGET, "tool worker panicked");
        }
    }
}
