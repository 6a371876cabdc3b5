//! Shortcuts operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

use crate::handlers::{JOIN_TEXT, JSON_STRING};
use crate::non_blank;

#[derive(Debug, Deserialize)]
struct RunInput {
    name: String,
    #[serde(default)]
    input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListInput {
    #[serde(default)]
    limit: Option<u32>,
}

pub(crate) fn category() -> Category {
    Category::new("shortcuts", "Shortcuts operations")
        .with_operation(
            Operation::new(
                "run_shortcut",
                "Run a shortcut with optional input. Uses Shortcuts Events to run in background \
                 without opening the app.",
                Producer::typed(run_shortcut),
            )
            .with_input(InputShape::object(
                json!({
                    "name": { "type": "string", "description": "Name of the shortcut to run" },
                    "input": {
                        "type": "string",
                        "description": "Optional input to provide to the shortcut"
                    }
                }),
                &["name"],
            )),
        )
        .with_operation(
            Operation::new(
                "list_shortcuts",
                "List all available shortcuts with optional limit",
                Producer::typed(list_shortcuts),
            )
            .with_input(InputShape::object(
                json!({
                    "limit": {
                        "type": "number",
                        "description": "Optional limit on the number of shortcuts to return"
                    }
                }),
                &[],
            )),
        )
}

fn run_shortcut(input: RunInput) -> String {
    let name = quoted(&input.name);
    let command = match non_blank(input.input) {
        Some(value) => format!("run shortcut {name} with input {}", quoted(&value)),
        None => format!("run shortcut {name}"),
    };
    let done = quoted(&format!("Shortcut '{}' executed successfully", input.name));
    format!(
        r#"try
  tell application "Shortcuts Events"
    {command}
  end tell
  return {done}
on error errMsg
  return "Failed to run shortcut: " & errMsg
end try"#
    )
}

fn list_shortcuts(input: ListInput) -> String {
    let limit = match input.limit.filter(|limit| *limit > 0) {
        Some(limit) => format!(
            "\n    if (count of shortcutNames) > {limit} then set shortcutNames to items 1 thru {limit} of shortcutNames"
        ),
        None => String::new(),
    };
    format!(
        r#"try
  tell application "Shortcuts"
    set shortcutNames to name of every shortcut{limit}
  end tell
  set entries to {{}}
  repeat with currentName in shortcutNames
    set end of entries to "{{\"name\": " & my jsonString(currentName) & "}}"
  end repeat
  return "{{\"status\": \"success\", \"shortcuts\": [" & my joinText(entries, ", ") & "]}}"
on error errMsg
  return "{{\"status\": \"error\", \"message\": " & my jsonString(errMsg) & "}}"
end try
{JSON_STRING}
{JOIN_TEXT}"#
    )
}
