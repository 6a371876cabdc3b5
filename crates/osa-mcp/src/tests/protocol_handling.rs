//! Method routing through the protocol handler.

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::support::handler_with_output;
use crate::logger::LogLevel;
use crate::protocol::{DEFAULT_PROTOCOL_VERSION, Incoming, ProtocolHandler, Response, codes};

#[fixture]
fn handler() -> ProtocolHandler {
    handler_with_output("ok")
}

fn reply(handler: &ProtocolHandler, line: &str) -> Response {
    match handler.receive(line) {
        Incoming::Reply(response) => response,
        Incoming::Call(call) => handler.call(call),
        Incoming::Silent => panic!("expected a response to {line}"),
    }
}

fn error_code(response: &Response) -> i64 {
    response.error().expect("response carries an error").code
}

#[rstest]
#[case::client_version(
    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
    "2025-03-26"
)]
#[case::no_params(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#, DEFAULT_PROTOCOL_VERSION)]
fn initialize_echoes_protocol_version(
    handler: ProtocolHandler,
    #[case] line: &str,
    #[case] expected: &str,
) {
    let response = reply(&handler, line);
    let result = response.result().expect("initialize succeeds");
    assert_eq!(result["protocolVersion"], json!(expected));
    assert_eq!(result["serverInfo"]["name"], json!("applescript-server"));
    assert_eq!(result["capabilities"], json!({ "tools": {}, "logging": {} }));
}

#[rstest]
fn ping_returns_empty_object(handler: ProtocolHandler) {
    let response = reply(&handler, r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#);
    assert_eq!(response.id(), &json!("p"));
    assert_eq!(response.result(), Some(&json!({})));
}

#[rstest]
fn tools_list_describes_every_operation(handler: ProtocolHandler) {
    let response = reply(&handler, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#);
    let tools = response.result().expect("list succeeds")["tools"]
        .as_array()
        .expect("tools array")
        .clone();
    assert_eq!(tools.len(), osa_scripts::catalog().build().tool_count());

    let volume = tools
        .iter()
        .find(|tool| tool["name"] == json!("system_volume"))
        .expect("system_volume listed");
    assert!(
        volume["description"]
            .as_str()
            .is_some_and(|text| text.starts_with("[System control and information] "))
    );
    assert_eq!(volume["inputSchema"]["type"], json!("object"));
}

#[rstest]
#[case::unknown_method(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#, codes::METHOD_NOT_FOUND)]
#[case::unparseable("{not json", codes::PARSE_ERROR)]
#[case::not_a_request(r#"{"jsonrpc":"2.0","id":4}"#, codes::INVALID_REQUEST)]
#[case::call_without_params(r#"{"jsonrpc":"2.0","id":5,"method":"tools/call"}"#, codes::INVALID_PARAMS)]
#[case::call_without_name(
    r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"arguments":{}}}"#,
    codes::INVALID_PARAMS
)]
#[case::unknown_level(
    r#"{"jsonrpc":"2.0","id":7,"method":"logging/setLevel","params":{"level":"verbose"}}"#,
    codes::INVALID_PARAMS
)]
#[case::unknown_tool(
    r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"finder_eject"}}"#,
    codes::METHOD_NOT_FOUND
)]
fn faults_carry_json_rpc_codes(handler: ProtocolHandler, #[case] line: &str, #[case] code: i64) {
    assert_eq!(error_code(&reply(&handler, line)), code);
}

#[rstest]
fn parse_errors_have_null_id(handler: ProtocolHandler) {
    assert_eq!(reply(&handler, "][").id(), &Value::Null);
}

#[rstest]
fn tool_calls_are_deferred_to_the_caller(handler: ProtocolHandler) {
    let line = r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"system_get_battery_status"}}"#;
    let Incoming::Call(call) = handler.receive(line) else {
        panic!("tools/call should be deferred");
    };
    assert_eq!(call.name(), "system_get_battery_status");

    let response = handler.call(call);
    assert_eq!(response.id(), &json!(9));
    assert_eq!(
        response.result(),
        Some(&json!({ "content": [{ "type": "text", "text": "ok" }] }))
    );
}

#[rstest]
#[case::initialized(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)]
#[case::cancelled(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{}}"#)]
#[case::call_without_id(r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"system_volume"}}"#)]
fn notifications_are_never_answered(handler: ProtocolHandler, #[case] line: &str) {
    assert!(matches!(handler.receive(line), Incoming::Silent));
}

#[rstest]
fn initialized_notification_connects_the_session(handler: ProtocolHandler) {
    assert!(!handler.session().is_connected());
    let incoming = handler.receive(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
    assert!(matches!(incoming, Incoming::Silent));
    assert!(handler.session().is_connected());
}

#[rstest]
fn set_level_updates_the_session(handler: ProtocolHandler) {
    let response = reply(
        &handler,
        r#"{"jsonrpc":"2.0","id":10,"method":"logging/setLevel","params":{"level":"error"}}"#,
    );
    assert_eq!(response.result(), Some(&json!({})));
    assert_eq!(handler.session().level(), LogLevel::Error);
}
