//! iTerm terminal operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunInput {
    command: String,
    #[serde(default)]
    new_window: bool,
}

pub(crate) fn category() -> Category {
    Category::new("iterm", "iTerm terminal operations")
        .with_operation(Operation::new(
            "paste_clipboard",
            "Paste clipboard content into iTerm",
            Producer::Fixed(PASTE_CLIPBOARD),
        ))
        .with_operation(
            Operation::new("run", "Run a command in iTerm", Producer::typed(run)).with_input(
                InputShape::object(
                    json!({
                        "command": { "type": "string", "description": "Command to run in iTerm" },
                        "newWindow": {
                            "type": "boolean",
                            "description": "Whether to open in a new window (default: false)",
                            "default": false
                        }
                    }),
                    &["command"],
                ),
            ),
        )
}

fn run(input: RunInput) -> String {
    let session = if input.new_window {
        "set newWindow to (create window with default profile)\n  tell current session of newWindow"
    } else {
        "set w to current window\n  tell w's current session"
    };
    format!(
        r#"tell application "iTerm"
  {session}
    write text {}
    activate
  end tell
end tell"#,
        quoted(&input.command)
    )
}

const PASTE_CLIPBOARD: &str = r#"tell application "System Events" to keystroke "c" using {command down}
delay 0.1
tell application "iTerm"
  set w to current window
  tell w's current session to write text (the clipboard)
  activate
end tell"#;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::current_window(false, "tell w's current session")]
    #[case::new_window(true, "create window with default profile")]
    fn targets_requested_window(#[case] new_window: bool, #[case] expected: &str) {
        let script = run(RunInput {
            command: "ls".to_owned(),
            new_window,
        });
        assert!(script.contains(expected));
        assert!(script.contains("write text \"ls\""));
    }

    #[rstest]
    fn escapes_shell_command() {
        let script = run(RunInput {
            command: r#"echo "a\b""#.to_owned(),
            new_window: false,
        });
        assert!(script.contains(r#"write text "echo \"a\\b\"""#));
    }
}
