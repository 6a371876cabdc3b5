//! Method routing for incoming JSON-RPC messages.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{DEFAULT_PROTOCOL_VERSION, Request, Response, RpcError, Session, codes};
use crate::dispatch::Dispatcher;
use crate::logger::LogLevel;

/// Tracing target for protocol events.
const PROTOCOL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::protocol");

/// What the transport should do with a received line.
#[derive(Debug)]
pub enum Incoming {
    /// Write this response now.
    Reply(Response),
    /// Nothing to write.
    Silent,
    /// Run this tool call off the reading thread.
    Call(ToolCall),
}

/// A validated `tools/call` request awaiting execution.
#[derive(Debug, Clone)]
pub struct ToolCall {
    id: Value,
    name: String,
    arguments: Option<Value>,
}

impl ToolCall {
    /// Requested tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    protocol_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SetLevelParams {
    level: LogLevel,
}

/// Answers MCP methods for one stdio session.
pub struct ProtocolHandler {
    server_name: String,
    dispatcher: Dispatcher,
    session: Arc<Session>,
}

impl ProtocolHandler {
    /// Creates a handler advertising `server_name` during the handshake.
    pub fn new(
        server_name: impl Into<String>,
        dispatcher: Dispatcher,
        session: Arc<Session>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            dispatcher,
            session,
        }
    }

    /// Session state shared with the logger.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Parses and routes one request line.
    ///
    /// Tool calls are returned for the caller to run; every other method is
    /// answered immediately.
    #[must_use]
    pub fn receive(&self, line: &str) -> Incoming {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(error) => {
                warn!(target: PROTOCOL_TARGET, error = %error, "unparseable request line");
                return Incoming::Reply(Response::failure(
                    Value::Null,
                    RpcError::new(codes::PARSE_ERROR, format!("Parse error: {error}")),
                ));
            }
        };
        let request: Request = match Request::deserialize(&value) {
            Ok(request) => request,
            Err(error) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Incoming::Reply(Response::failure(
                    id,
                    RpcError::new(codes::INVALID_REQUEST, format!("Invalid request: {error}")),
                ));
            }
        };

        match request.id {
            None => {
                self.notify(&request.method);
                Incoming::Silent
            }
            Some(id) => self.route(id, &request.method, request.params),
        }
    }

    /// Runs a tool call and builds its response.
    #[must_use]
    pub fn call(&self, call: ToolCall) -> Response {
        match self.dispatcher.invoke(&call.name, call.arguments.as_ref()) {
            Ok(outcome) => match serde_json::to_value(outcome) {
                Ok(result) => Response::success(call.id, result),
                Err(error) => Response::failure(
                    call.id,
                    RpcError::new(codes::INTERNAL_ERROR, error.to_string()),
                ),
            },
            Err(error) => Response::failure(
                call.id,
                RpcError::new(codes::METHOD_NOT_FOUND, error.to_string()),
            ),
        }
    }

    fn notify(&self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.session.connect();
                debug!(target: PROTOCOL_TARGET, "client initialised");
            }
            other => debug!(target: PROTOCOL_TARGET, method = other, "ignoring notification"),
        }
    }

    fn route(&self, id: Value, method: &str, params: Option<Value>) -> Incoming {
        debug!(target: PROTOCOL_TARGET, method, "request received");
        let outcome = match method {
            "initialize" => Ok(self.initialize(params)),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => {
                return match parse_params::<CallParams>(params) {
                    Ok(call) => Incoming::Call(ToolCall {
                        id,
                        name: call.name,
                        arguments: call.arguments,
                    }),
                    Err(error) => Incoming::Reply(Response::failure(id, error)),
                };
            }
            "logging/setLevel" => self.set_level(params),
            other => Err(RpcError::new(
                codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };
        Incoming::Reply(match outcome {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Value {
        let requested = parse_params::<InitializeParams>(params)
            .unwrap_or_default()
            .protocol_version;
        json!({
            "protocolVersion": requested.as_deref().unwrap_or(DEFAULT_PROTOCOL_VERSION),
            "capabilities": { "tools": {}, "logging": {} },
            "serverInfo": {
                "name": self.server_name,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    fn list_tools(&self) -> Result<Value, RpcError> {
        let tools: Vec<_> = self.dispatcher.registry().list_all().collect();
        serde_json::to_value(tools)
            .map(|encoded| json!({ "tools": encoded }))
            .map_err(|error| RpcError::new(codes::INTERNAL_ERROR, error.to_string()))
    }

    fn set_level(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let SetLevelParams { level } = parse_params(params)?;
        self.session.set_level(level);
        debug!(target: PROTOCOL_TARGET, %level, "client log level changed");
        Ok(json!({}))
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcError> {
    let value = params.ok_or_else(|| RpcError::new(codes::INVALID_PARAMS, "Missing params"))?;
    serde_json::from_value(value)
        .map_err(|error| RpcError::new(codes::INVALID_PARAMS, format!("Invalid params: {error}")))
}
