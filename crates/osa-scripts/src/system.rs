//! System control and information.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

/// Highest step accepted by `set volume`.
const VOLUME_STEPS: f64 = 7.0;

#[derive(Debug, Deserialize)]
struct VolumeInput {
    level: f64,
}

#[derive(Debug, Deserialize)]
struct AppInput {
    name: String,
    #[serde(default)]
    force: bool,
}

pub(crate) fn category() -> Category {
    Category::new("system", "System control and information")
        .with_operation(
            Operation::new("volume", "Set system volume", Producer::typed(volume)).with_input(
                InputShape::object(
                    json!({ "level": { "type": "number", "minimum": 0, "maximum": 100 } }),
                    &["level"],
                ),
            ),
        )
        .with_operation(Operation::new(
            "get_frontmost_app",
            "Get the name of the frontmost application",
            Producer::Fixed(
                r#"tell application "System Events" to get name of first process whose frontmost is true"#,
            ),
        ))
        .with_operation(
            Operation::new(
                "launch_app",
                "Launch an application",
                Producer::typed(launch_app),
            )
            .with_input(app_name_shape(false)),
        )
        .with_operation(
            Operation::new("quit_app", "Quit an application", Producer::typed(quit_app))
                .with_input(app_name_shape(true)),
        )
        .with_operation(Operation::new(
            "toggle_dark_mode",
            "Toggle system dark mode",
            Producer::Fixed(TOGGLE_DARK_MODE),
        ))
        .with_operation(Operation::new(
            "get_battery_status",
            "Get battery level and charging status",
            Producer::Fixed(BATTERY_STATUS),
        ))
}

fn app_name_shape(with_force: bool) -> InputShape {
    let mut properties = json!({
        "name": { "type": "string", "description": "Application name" }
    });
    if with_force && let Some(map) = properties.as_object_mut() {
        map.insert(
            "force".to_owned(),
            json!({ "type": "boolean", "description": "Force quit if true", "default": false }),
        );
    }
    InputShape::object(properties, &["name"])
}

/// Maps a 0-100 percentage onto the 0-7 scale of `set volume`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the level is clamped to 0..=100 before scaling to 0..=7"
)]
fn volume_step(level: f64) -> u8 {
    let clamped = if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 100.0)
    };
    (clamped / 100.0 * VOLUME_STEPS).round() as u8
}

fn volume(input: VolumeInput) -> String {
    format!("set volume {}", volume_step(input.level))
}

fn launch_app(input: AppInput) -> String {
    let app = quoted(&input.name);
    let launched = quoted(&format!("Application {} launched successfully", input.name));
    format!(
        r#"try
  tell application {app}
    activate
  end tell
  return {launched}
on error errMsg
  return "Failed to launch application: " & errMsg
end try"#
    )
}

fn quit_app(input: AppInput) -> String {
    let app = quoted(&input.name);
    let command = if input.force { "quit saving no" } else { "quit" };
    let done = quoted(&format!("Application {} quit successfully", input.name));
    format!(
        r#"try
  tell application {app}
    {command}
  end tell
  return {done}
on error errMsg
  return "Failed to quit application: " & errMsg
end try"#
    )
}

const TOGGLE_DARK_MODE: &str = r#"tell application "System Events"
  tell appearance preferences
    set dark mode to not dark mode
    return "Dark mode is now " & (dark mode as text)
  end tell
end tell"#;

const BATTERY_STATUS: &str = r#"try
  return do shell script "pmset -g batt"
on error errMsg
  return "Failed to get battery status: " & errMsg
end try"#;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::silent(0.0, 0)]
    #[case::half(50.0, 4)]
    #[case::full(100.0, 7)]
    #[case::above_range(250.0, 7)]
    #[case::below_range(-5.0, 0)]
    fn scales_percentage_to_volume_steps(#[case] level: f64, #[case] expected: u8) {
        assert_eq!(volume_step(level), expected);
    }

    #[rstest]
    fn force_quit_skips_saving() {
        let script = quit_app(AppInput {
            name: "Preview".to_owned(),
            force: true,
        });
        assert!(script.contains("tell application \"Preview\""));
        assert!(script.contains("quit saving no"));
    }

    #[rstest]
    fn launch_escapes_application_name() {
        let script = launch_app(AppInput {
            name: "Bad \"App\"".to_owned(),
            force: false,
        });
        assert!(script.contains("tell application \"Bad \\\"App\\\"\""));
    }
}
