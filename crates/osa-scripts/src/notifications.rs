//! Notification management.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

const fn default_sound() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct NotificationInput {
    title: String,
    message: String,
    #[serde(default = "default_sound")]
    sound: bool,
}

pub(crate) fn category() -> Category {
    Category::new("notifications", "Notification management")
        .with_operation(Operation::new(
            "toggle_do_not_disturb",
            "Toggle Do Not Disturb mode using keyboard shortcut",
            Producer::Fixed(TOGGLE_DND),
        ))
        .with_operation(
            Operation::new(
                "send_notification",
                "Send a system notification",
                Producer::typed(send_notification),
            )
            .with_input(InputShape::object(
                json!({
                    "title": { "type": "string", "description": "Notification title" },
                    "message": { "type": "string", "description": "Notification message" },
                    "sound": {
                        "type": "boolean",
                        "description": "Play sound with notification",
                        "default": true
                    }
                }),
                &["title", "message"],
            )),
        )
}

fn send_notification(input: NotificationInput) -> String {
    let sound = if input.sound {
        r#" sound name "default""#
    } else {
        ""
    };
    format!(
        "display notification {} with title {}{sound}",
        quoted(&input.message),
        quoted(&input.title)
    )
}

// Relies on the user binding Do Not Disturb to ctrl+opt+cmd+Z.
const TOGGLE_DND: &str = r#"try
  tell application "System Events"
    keystroke "z" using {control down, option down, command down}
  end tell
  return "Toggled Do Not Disturb mode"
on error errMsg
  return "Failed to toggle Do Not Disturb: " & errMsg
end try"#;
