//! End-to-end tests for outline reconstruction and rendering.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

fn payload(lines: &[&str]) -> String {
    let mut text = String::from(START_MARKER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text.push_str(END_MARKER);
    text
}

#[rstest]
fn renders_folder_with_nested_project() {
    let text = payload(&[
        "FOLDER|Work|f1|folder|false|false|false|0|",
        "PROJECT|Launch|p1|project|false|false|false|1|",
    ]);

    let rendered = render(&text).expect("render outline");
    assert_eq!(
        rendered,
        concat!(
            r#"{"folders":[{"name":"Work","id":"f1","type":"folder","depth":0,"hidden":false,"#,
            r#""children":[{"name":"Launch","id":"p1","type":"project","depth":1,"#,
            r#""completed":false,"dropped":false,"children":[]}]}]}"#,
        )
    );
}

#[rstest]
fn malformed_line_does_not_disturb_placement() {
    let text = payload(&[
        "FOLDER|Work|f1|folder|false|false|false|0|",
        "PROJECT|broken|p0",
        "PROJECT|Launch|p1|project|false|false|false|1|",
    ]);

    let outline = reconstruct(&text);
    assert_eq!(outline.folders.len(), 1);
    let work = outline.folders.first().expect("root");
    assert_eq!(work.children.len(), 1);
    assert_eq!(work.children.first().map(|c| c.name.as_str()), Some("Launch"));
}

#[rstest]
fn blank_lines_and_surrounding_noise_are_ignored() {
    let text = format!(
        "log preamble {START_MARKER}\n\n  \nINBOX|Inbox||inbox|||||\nTASK|Call|t1|task|false|true|false|1|Friday\n{END_MARKER} trailer"
    );

    let outline = reconstruct(&text);
    let inbox = outline.folders.first().expect("inbox root");
    assert_eq!(inbox.name, "Inbox");
    let task = inbox.children.first().expect("task under inbox");
    assert_eq!(task.flagged, Some(true));
    assert_eq!(task.due_date.as_deref(), Some("Friday"));
}

#[rstest]
fn task_serialises_flags_in_declared_order() {
    let text = payload(&["TASK|Ship|t1|task|true|false|false|0|2024-01-15"]);
    let rendered = render(&text).expect("render");
    assert_eq!(
        rendered,
        r#"{"folders":[{"name":"Ship","id":"t1","type":"task","depth":0,"completed":true,"flagged":false,"dropped":false,"dueDate":"2024-01-15","children":[]}]}"#
    );
}

#[rstest]
fn error_placeholder_serialises_without_flags() {
    let text = payload(&["ERROR|Could not read folder||error|||0|"]);
    let value: Value = serde_json::from_str(&render(&text).expect("render")).expect("json");
    assert_eq!(
        value,
        json!({ "folders": [{
            "name": "Could not read folder",
            "id": "",
            "type": "error",
            "depth": 0,
            "children": []
        }]})
    );
}

#[rstest]
fn empty_payload_renders_no_folders() {
    let rendered = render(&payload(&[])).expect("render");
    assert_eq!(rendered, r#"{"folders":[]}"#);
}

#[rstest]
#[case::marked("x\nHIERARCHICAL_START\n", true)]
#[case::plain("Folder list unavailable", false)]
fn detects_hierarchical_payloads(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(is_hierarchical(text), expected);
}
