//! Clipboard management operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClipboardKind {
    #[default]
    Text,
    FilePaths,
}

#[derive(Debug, Deserialize)]
struct GetInput {
    #[serde(default, rename = "type")]
    kind: ClipboardKind,
}

#[derive(Debug, Deserialize)]
struct SetInput {
    content: String,
}

pub(crate) fn category() -> Category {
    Category::new("clipboard", "Clipboard management operations")
        .with_operation(
            Operation::new(
                "get_clipboard",
                "Get current clipboard content",
                Producer::typed(get_clipboard),
            )
            .with_input(InputShape::object(
                json!({
                    "type": {
                        "type": "string",
                        "enum": ["text", "file_paths"],
                        "description": "Type of clipboard content to get",
                        "default": "text"
                    }
                }),
                &[],
            )),
        )
        .with_operation(
            Operation::new(
                "set_clipboard",
                "Set clipboard content",
                Producer::typed(set_clipboard),
            )
            .with_input(InputShape::object(
                json!({
                    "content": { "type": "string", "description": "Content to copy to clipboard" }
                }),
                &["content"],
            )),
        )
        .with_operation(Operation::new(
            "clear_clipboard",
            "Clear clipboard content",
            Producer::Fixed(CLEAR),
        ))
}

fn get_clipboard(input: GetInput) -> String {
    match input.kind {
        ClipboardKind::Text => GET_TEXT.to_owned(),
        ClipboardKind::FilePaths => GET_FILE_PATHS.to_owned(),
    }
}

fn set_clipboard(input: SetInput) -> String {
    format!(
        r#"try
  set the clipboard to {}
  return "Clipboard content set successfully"
on error errMsg
  return "Failed to set clipboard: " & errMsg
end try"#,
        quoted(&input.content)
    )
}

const GET_TEXT: &str = r#"tell application "System Events"
  try
    return (the clipboard as text)
  on error errMsg
    return "Failed to get clipboard: " & errMsg
  end try
end tell"#;

const GET_FILE_PATHS: &str = r#"tell application "System Events"
  try
    set theClipboard to the clipboard as text
    if theClipboard starts with "file://" then
      set filePaths to {}
      repeat with aPath in paragraphs of theClipboard
        if aPath starts with "file://" then
          set end of filePaths to (POSIX path of (aPath as alias))
        end if
      end repeat
      set AppleScript's text item delimiters to linefeed
      return filePaths as string
    else
      return "No file paths in clipboard"
    end if
  on error errMsg
    return "Failed to get clipboard: " & errMsg
  end try
end tell"#;

const CLEAR: &str = r#"try
  set the clipboard to ""
  return "Clipboard cleared successfully"
on error errMsg
  return "Failed to clear clipboard: " & errMsg
end try"#;
