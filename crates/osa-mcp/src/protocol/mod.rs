//! JSON-RPC 2.0 framing for the Model Context Protocol.
//!
//! Requests arrive one per line on stdin and responses leave one per line on
//! stdout. Messages without an `id` are notifications and never receive a
//! response.

mod errors;
mod handler;
mod session;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logger::LogLevel;

pub use errors::ProtocolError;
pub use handler::{Incoming, ProtocolHandler, ToolCall};
pub use session::Session;

/// Protocol revision offered when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error codes used by the server.
pub mod codes {
    /// The line is not valid JSON.
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON is not a request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method, or a tool name that does not resolve.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Missing or malformed parameters.
    pub const INVALID_PARAMS: i64 = -32602;
    /// The server could not build a result.
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Incoming request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Request identifier; absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Returns `true` when the message expects no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    /// Numeric error code from [`codes`].
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

impl RpcError {
    /// Creates an error with the given code.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Payload {
    Result(Value),
    Error(RpcError),
}

/// Outgoing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    jsonrpc: &'static str,
    id: Value,
    #[serde(flatten)]
    payload: Payload,
}

impl Response {
    /// Successful response carrying `result`.
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Result(result),
        }
    }

    /// Failed response carrying `error`.
    #[must_use]
    pub const fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            payload: Payload::Error(error),
        }
    }

    /// Request identifier echoed by this response.
    #[must_use]
    pub const fn id(&self) -> &Value {
        &self.id
    }

    /// Result value, when the request succeeded.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Result(value) => Some(value),
            Payload::Error(_) => None,
        }
    }

    /// Error object, when the request failed.
    #[must_use]
    pub const fn error(&self) -> Option<&RpcError> {
        match &self.payload {
            Payload::Result(_) => None,
            Payload::Error(error) => Some(error),
        }
    }
}

/// Server-initiated notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    jsonrpc: &'static str,
    method: &'static str,
    params: Value,
}

#[derive(Serialize)]
struct LogMessageParams<'a> {
    level: LogLevel,
    logger: &'a str,
    data: Value,
}

impl Notification {
    /// Builds a `notifications/message` log record. Object `data` is merged
    /// alongside the message; any other non-null value is nested under
    /// `data`.
    #[must_use]
    pub fn log_message(level: LogLevel, logger: &str, message: &str, data: &Value) -> Self {
        let mut payload = Map::new();
        payload.insert("message".to_owned(), Value::String(message.to_owned()));
        match data {
            Value::Object(fields) => {
                payload.extend(fields.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
            Value::Null => {}
            other => {
                payload.insert("data".to_owned(), other.clone());
            }
        }
        let params = LogMessageParams {
            level,
            logger,
            data: Value::Object(payload),
        };
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: "notifications/message",
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }

    /// Method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// Notification parameters.
    #[must_use]
    pub const fn params(&self) -> &Value {
        &self.params
    }
}
