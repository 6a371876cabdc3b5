//! Finder and file operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

/// Location token meaning the user's home folder.
const HOME: &str = "~";

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuickLookInput {
    path: String,
}

pub(crate) fn category() -> Category {
    Category::new("finder", "Finder and file operations")
        .with_operation(Operation::new(
            "get_selected_files",
            "Get currently selected files in Finder",
            Producer::Fixed(SELECTED_FILES),
        ))
        .with_operation(
            Operation::new(
                "search_files",
                "Search for files by name",
                Producer::typed(search_files),
            )
            .with_input(InputShape::object(
                json!({
                    "query": { "type": "string", "description": "Search term" },
                    "location": {
                        "type": "string",
                        "description": "Search location (default: home folder)",
                        "default": HOME
                    }
                }),
                &["query"],
            )),
        )
        .with_operation(
            Operation::new(
                "quick_look_file",
                "Preview a file using Quick Look",
                Producer::typed(quick_look_file),
            )
            .with_input(InputShape::object(
                json!({ "path": { "type": "string", "description": "File path to preview" } }),
                &["path"],
            )),
        )
}

/// AppleScript expression for the folder to search.
fn search_root(location: Option<&str>) -> String {
    match location.map(str::trim) {
        None | Some("" | HOME) => "(path to home folder)".to_owned(),
        Some(path) => match path.strip_prefix("~/") {
            Some(relative) => format!(
                "(POSIX file ((POSIX path of (path to home folder)) & {}) as alias)",
                quoted(relative)
            ),
            None => format!("(POSIX file {} as alias)", quoted(path)),
        },
    }
}

fn search_files(input: SearchInput) -> String {
    let root = search_root(input.location.as_deref());
    let query = quoted(&input.query);
    let none_found = quoted(&format!("No files found matching '{}'", input.query));
    format!(
        r#"tell application "Finder"
  try
    set theFolder to {root}
    set theFiles to every file of folder theFolder whose name contains {query}
    set resultList to ""
    repeat with aFile in theFiles
      set resultList to resultList & (POSIX path of (aFile as alias)) & linefeed
    end repeat
    if resultList is "" then
      return {none_found}
    end if
    return resultList
  on error errMsg
    return "Failed to search files: " & errMsg
  end try
end tell"#
    )
}

fn quick_look_file(input: QuickLookInput) -> String {
    let path = quoted(&input.path);
    let opened = quoted(&format!("Quick Look preview opened for {}", input.path));
    format!(
        r#"try
  set filePath to POSIX file {path}
  tell application "Finder"
    activate
    select filePath
    tell application "System Events"
      delay 0.5
      key code 49
    end tell
  end tell
  return {opened}
on error errMsg
  return "Failed to open Quick Look: " & errMsg
end try"#
    )
}

const SELECTED_FILES: &str = r#"tell application "Finder"
  try
    set selectedItems to selection
    if selectedItems is {} then
      return "No items selected"
    end if
    set itemPaths to ""
    repeat with theItem in selectedItems
      set itemPaths to itemPaths & (POSIX path of (theItem as alias)) & linefeed
    end repeat
    return itemPaths
  on error errMsg
    return "Failed to get selected files: " & errMsg
  end try
end tell"#;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::absent(None, "(path to home folder)")]
    #[case::tilde(Some("~"), "(path to home folder)")]
    #[case::absolute(Some("/tmp"), "(POSIX file \"/tmp\" as alias)")]
    #[case::home_relative(
        Some("~/Downloads"),
        "(POSIX file ((POSIX path of (path to home folder)) & \"Downloads\") as alias)"
    )]
    fn resolves_search_root(#[case] location: Option<&str>, #[case] expected: &str) {
        assert_eq!(search_root(location), expected);
    }

    #[rstest]
    fn search_escapes_query() {
        let script = search_files(SearchInput {
            query: "say \"hi\"".to_owned(),
            location: None,
        });
        assert!(script.contains("whose name contains \"say \\\"hi\\\"\""));
    }
}
