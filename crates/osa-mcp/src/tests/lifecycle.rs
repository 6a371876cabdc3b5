//! Bootstrap and session lifecycle.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex, PoisonError};

use mockall::mock;
use rstest::rstest;
use serde_json::{Value, json};

use osa_config::Config;
use osa_runner::CommandExecutor;

use super::support::ScriptedExecutor;
use crate::bootstrap::{BootstrapError, StaticConfigLoader, bootstrap_with};
use crate::dispatch::Dispatcher;
use crate::health::HealthReporter;
use crate::logger::SessionLogger;
use crate::protocol::Session;
use crate::transport::OutputSink;

mock! {
    Reporter {}
    impl HealthReporter for Reporter {
        fn bootstrap_starting(&self);
        fn category_registered(&self, name: &str, operations: usize);
        fn bootstrap_succeeded(&self, config: &Config);
        fn bootstrap_failed(&self, error: &BootstrapError);
        fn server_stopped(&self);
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn messages(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner).clone();
        String::from_utf8(bytes)
            .expect("output is UTF-8")
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is JSON"))
            .collect()
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _bytes: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

fn quiet_reporter() -> MockReporter {
    let mut reporter = MockReporter::new();
    reporter.expect_bootstrap_starting().return_const(());
    reporter.expect_category_registered().return_const(());
    reporter.expect_bootstrap_succeeded().return_const(());
    reporter.expect_server_stopped().return_const(());
    reporter
}

#[rstest]
fn bootstrap_reports_each_category_once() {
    let mut reporter = MockReporter::new();
    reporter.expect_bootstrap_starting().times(1).return_const(());
    reporter
        .expect_category_registered()
        .times(12)
        .return_const(());
    reporter
        .expect_bootstrap_succeeded()
        .withf(|config| config.server_name() == "applescript-server")
        .times(1)
        .return_const(());
    reporter.expect_bootstrap_failed().never();
    reporter.expect_server_stopped().never();

    let server = bootstrap_with(
        &StaticConfigLoader::new(Config::default()),
        Arc::new(reporter),
    )
    .expect("bootstrap succeeds");
    assert_eq!(server.registry().categories().len(), 12);
    assert_eq!(server.executor().interpreter(), "osascript");
}

#[rstest]
fn serving_until_end_of_input_reports_stop() {
    let mut reporter = MockReporter::new();
    reporter.expect_bootstrap_starting().return_const(());
    reporter.expect_category_registered().return_const(());
    reporter.expect_bootstrap_succeeded().return_const(());
    reporter.expect_server_stopped().times(1).return_const(());

    let server = bootstrap_with(
        &StaticConfigLoader::new(Config::default()),
        Arc::new(reporter),
    )
    .expect("bootstrap succeeds");
    let output = SharedBuffer::default();
    server
        .serve(
            Cursor::new(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#),
            output.clone(),
            Arc::new(ScriptedExecutor::printing("unused")),
        )
        .expect("serve succeeds");

    assert_eq!(
        output.messages(),
        vec![json!({ "jsonrpc": "2.0", "id": 1, "result": {} })]
    );
}

#[rstest]
fn connected_clients_receive_log_notifications() {
    let server = bootstrap_with(
        &StaticConfigLoader::new(Config::default()),
        Arc::new(quiet_reporter()),
    )
    .expect("bootstrap succeeds");
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"logging/setLevel","params":{"level":"info"}}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"system_get_battery_status"}}"#,
    ]
    .join("\n");
    let output = SharedBuffer::default();
    server
        .serve(
            Cursor::new(input),
            output.clone(),
            Arc::new(ScriptedExecutor::printing("87%")),
        )
        .expect("serve succeeds");

    let messages = output.messages();
    let notifications: Vec<&Value> = messages
        .iter()
        .filter(|message| message["method"] == json!("notifications/message"))
        .collect();
    assert!(
        notifications
            .iter()
            .all(|message| message["params"]["level"] != json!("debug")),
        "debug records should be filtered: {notifications:?}"
    );
    assert!(notifications.iter().any(|message| {
        message["params"]["data"]["message"] == json!("Tool execution requested")
            && message["params"]["data"]["tool"] == json!("system_get_battery_status")
    }));

    let call = messages
        .iter()
        .find(|message| message["id"] == json!(3))
        .expect("tool call answered");
    assert_eq!(call["result"]["content"][0]["text"], json!("87%"));
}

#[rstest]
fn records_before_the_handshake_stay_local() {
    let server = bootstrap_with(
        &StaticConfigLoader::new(Config::default()),
        Arc::new(quiet_reporter()),
    )
    .expect("bootstrap succeeds");
    let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"system_get_battery_status"}}"#;
    let output = SharedBuffer::default();
    server
        .serve(
            Cursor::new(input),
            output.clone(),
            Arc::new(ScriptedExecutor::printing("87%")),
        )
        .expect("serve succeeds");

    let messages = output.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.first().map(|message| &message["id"]), Some(&json!(1)));
}

#[rstest]
fn forwarding_failures_do_not_change_the_outcome() {
    let session = Arc::new(Session::new());
    session.connect();
    let logger = Arc::new(SessionLogger::new(
        Arc::clone(&session),
        OutputSink::new(BrokenPipe),
        "applescript-server",
    ));
    let executor = Arc::new(ScriptedExecutor::printing("Finder"));
    let runner: Arc<dyn CommandExecutor> = executor.clone();
    let dispatcher = Dispatcher::new(Arc::new(osa_scripts::catalog().build()), runner, logger);

    let outcome = dispatcher
        .invoke("system_get_frontmost_app", None)
        .expect("dispatch succeeds");

    assert!(!outcome.is_error());
    assert_eq!(outcome.text(), "Finder");
    assert_eq!(executor.runs(), 1);
}
