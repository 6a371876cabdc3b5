//! Behavioural tests for tool dispatch through the protocol handler.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use super::support::{ScriptedExecutor, handler_with};
use crate::protocol::{Incoming, ProtocolHandler, Response, codes};

const OUTLINE: &str = "HIERARCHICAL_START\n\
    FOLDER|Work|f1|folder|false|false|false|0|\n\
    PROJECT|Launch|p1|project|false|false|false|1|\n\
    HIERARCHICAL_END";

#[derive(Default)]
struct DispatchWorld {
    executor: Option<Arc<ScriptedExecutor>>,
    handler: Option<ProtocolHandler>,
    response: Option<Response>,
}

impl DispatchWorld {
    fn install(&mut self, executor: ScriptedExecutor) {
        let shared = Arc::new(executor);
        self.handler = Some(handler_with(shared.clone()));
        self.executor = Some(shared);
    }

    fn call(&mut self, tool: &str) {
        let handler = self.handler.as_ref().expect("server configured");
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": tool, "arguments": {} }
        });
        let response = match handler.receive(&request.to_string()) {
            Incoming::Call(call) => handler.call(call),
            Incoming::Reply(response) => response,
            Incoming::Silent => panic!("tools/call with an id must be answered"),
        };
        self.response = Some(response);
    }

    fn response(&self) -> &Response {
        self.response.as_ref().expect("a tool was called")
    }

    fn result_text(&self) -> String {
        let result = self.response().result().expect("response carries a result");
        result["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_owned()
    }
}

#[fixture]
fn world() -> RefCell<DispatchWorld> {
    RefCell::new(DispatchWorld::default())
}

#[given(r#"a server whose scripts print "{output}""#)]
fn given_printing(world: &RefCell<DispatchWorld>, output: String) {
    world
        .borrow_mut()
        .install(ScriptedExecutor::printing(strip_quotes(&output)));
}

#[given(r#"a server whose scripts fail with "{message}""#)]
fn given_failing(world: &RefCell<DispatchWorld>, message: String) {
    world
        .borrow_mut()
        .install(ScriptedExecutor::failing(strip_quotes(&message)));
}

#[given("a server whose scripts print an outline")]
fn given_outline(world: &RefCell<DispatchWorld>) {
    world
        .borrow_mut()
        .install(ScriptedExecutor::printing(OUTLINE));
}

#[when(r#"the tool "{tool}" is called"#)]
fn when_tool_called(world: &RefCell<DispatchWorld>, tool: String) {
    world.borrow_mut().call(strip_quotes(&tool));
}

#[then("the response is a method not found error")]
fn then_method_not_found(world: &RefCell<DispatchWorld>) {
    let state = world.borrow();
    let error = state.response().error().expect("response carries an error");
    assert_eq!(error.code, codes::METHOD_NOT_FOUND);
}

#[then("no script was run")]
fn then_no_script(world: &RefCell<DispatchWorld>) {
    let state = world.borrow();
    let executor = state.executor.as_ref().expect("server configured");
    assert_eq!(executor.runs(), 0);
}

#[then(r#"the response text is "{expected}""#)]
fn then_text(world: &RefCell<DispatchWorld>, expected: String) {
    assert_eq!(world.borrow().result_text(), strip_quotes(&expected));
}

#[then("the response is flagged as an error")]
fn then_flagged(world: &RefCell<DispatchWorld>) {
    let state = world.borrow();
    let result = state.response().result().expect("response carries a result");
    assert_eq!(result["isError"], json!(true));
}

#[then(r#"the first root is "{root}" with a child "{child}""#)]
fn then_tree(world: &RefCell<DispatchWorld>, root: String, child: String) {
    let tree: Value =
        serde_json::from_str(&world.borrow().result_text()).expect("response is a JSON tree");
    assert_eq!(tree["folders"][0]["name"], json!(strip_quotes(&root)));
    assert_eq!(
        tree["folders"][0]["children"][0]["name"],
        json!(strip_quotes(&child))
    );
}

/// Strips surrounding double quotes from a string if present.
fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[scenario(path = "tests/features/tool_dispatch.feature")]
fn tool_dispatch(#[from(world)] world: RefCell<DispatchWorld>) {
    drop(world);
}
