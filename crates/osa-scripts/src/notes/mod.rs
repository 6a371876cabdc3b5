//! Apple Notes operations.

mod markup;

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

use self::markup::Formatting;
use crate::handlers::{JOIN_TEXT, JSON_STRING};
use crate::non_blank;

const DEFAULT_SEARCH_LIMIT: u32 = 5;

const fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

const fn default_include_body() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CreateInput {
    title: String,
    content: String,
    #[serde(default)]
    format: Formatting,
}

#[derive(Debug, Deserialize)]
struct RawHtmlInput {
    title: String,
    html: String,
}

#[derive(Debug, Deserialize)]
struct ListInput {
    #[serde(default)]
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetInput {
    title: String,
    #[serde(default)]
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    query: String,
    #[serde(default)]
    folder: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
    #[serde(default = "default_include_body")]
    include_body: bool,
}

pub(crate) fn category() -> Category {
    Category::new("notes", "Apple Notes operations")
        .with_operation(
            Operation::new(
                "create",
                "Create a new note with optional formatting",
                Producer::typed(create),
            )
            .with_input(InputShape::object(
                json!({
                    "title": { "type": "string", "description": "Title of the note" },
                    "content": {
                        "type": "string",
                        "description": "Content of the note, can include markdown-like syntax for formatting"
                    },
                    "format": {
                        "type": "object",
                        "description": "Formatting options for the note content",
                        "properties": {
                            "headings": { "type": "boolean", "description": "Enable heading formatting (# Heading)" },
                            "bold": { "type": "boolean", "description": "Enable bold formatting (**text**)" },
                            "italic": { "type": "boolean", "description": "Enable italic formatting (*text*)" },
                            "underline": { "type": "boolean", "description": "Enable underline formatting (~text~)" },
                            "links": { "type": "boolean", "description": "Enable link formatting ([text](url))" },
                            "lists": { "type": "boolean", "description": "Enable list formatting (- item or 1. item)" }
                        }
                    }
                }),
                &["title", "content"],
            )),
        )
        .with_operation(
            Operation::new(
                "createRawHtml",
                "Create a new note with direct HTML content",
                Producer::typed(create_raw_html),
            )
            .with_input(InputShape::object(
                json!({
                    "title": { "type": "string", "description": "Title of the note" },
                    "html": { "type": "string", "description": "Raw HTML content for the note" }
                }),
                &["title", "html"],
            )),
        )
        .with_operation(
            Operation::new(
                "list",
                "List all notes or notes in a specific folder",
                Producer::typed(list),
            )
            .with_input(InputShape::object(
                json!({
                    "folder": { "type": "string", "description": "Optional folder name to list notes from" }
                }),
                &[],
            )),
        )
        .with_operation(
            Operation::new("get", "Get a specific note by title", Producer::typed(get))
                .with_input(InputShape::object(
                    json!({
                        "title": { "type": "string", "description": "Title of the note to retrieve" },
                        "folder": { "type": "string", "description": "Optional folder name to search in" }
                    }),
                    &["title"],
                )),
        )
        .with_operation(
            Operation::new(
                "search",
                "Search for notes containing specific text",
                Producer::typed(search),
            )
            .with_input(InputShape::object(
                json!({
                    "query": {
                        "type": "string",
                        "description": "Text to search for in notes (title and body)"
                    },
                    "folder": { "type": "string", "description": "Optional folder name to search in" },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results to return (default: 5)"
                    },
                    "includeBody": {
                        "type": "boolean",
                        "description": "Whether to include note body in results (default: true)"
                    }
                }),
                &["query"],
            )),
        )
}

fn make_note(title: &str, body: &str) -> String {
    format!(
        r#"tell application "Notes"
  make new note with properties {{body:{}, name:{}}}
end tell"#,
        quoted(body),
        quoted(title)
    )
}

fn create(input: CreateInput) -> String {
    make_note(&input.title, &markup::to_html(&input.content, input.format))
}

fn create_raw_html(input: RawHtmlInput) -> String {
    make_note(&input.title, &input.html)
}

/// Statements that bind `candidateNotes`, returning early when a named
/// folder does not exist.
fn scope(folder: Option<String>) -> String {
    match non_blank(folder) {
        Some(name) => format!(
            r#"set folderList to folders whose name is {}
  if (count of folderList) is 0 then return {}
  set candidateNotes to notes of item 1 of folderList"#,
            quoted(&name),
            quoted(&format!("Folder not found: {name}"))
        ),
        None => "set candidateNotes to notes".to_owned(),
    }
}

/// AppleScript expression rendering note `var` as a JSON object.
fn note_json(var: &str, include_body: bool) -> String {
    let body = if include_body {
        format!(r#" & ", \"body\": " & my jsonString(body of {var})"#)
    } else {
        String::new()
    };
    format!(
        r#""{{\"title\": " & my jsonString(name of {var}){body} & ", \"creationDate\": " & my jsonString((creation date of {var}) as text) & ", \"modificationDate\": " & my jsonString((modification date of {var}) as text) & "}}""#
    )
}

fn list(input: ListInput) -> String {
    format!(
        r#"tell application "Notes"
  {scope}
  set noteNames to {{}}
  repeat with n in candidateNotes
    set end of noteNames to name of n
  end repeat
  return my joinText(noteNames, linefeed)
end tell
{JOIN_TEXT}"#,
        scope = scope(input.folder)
    )
}

fn get(input: GetInput) -> String {
    format!(
        r#"tell application "Notes"
  {scope}
  repeat with n in candidateNotes
    if name of n is {title} then return {record}
  end repeat
  return {missing}
end tell
{JSON_STRING}"#,
        scope = scope(input.folder),
        title = quoted(&input.title),
        record = note_json("n", true),
        missing = quoted(&format!("Note not found: {}", input.title)),
    )
}

fn search(input: SearchInput) -> String {
    format!(
        r#"tell application "Notes"
  {scope}
  set entries to {{}}
  repeat with n in candidateNotes
    if (count of entries) is greater than or equal to {limit} then exit repeat
    if name of n contains {query} or body of n contains {query} then
      set end of entries to {record}
    end if
  end repeat
  return "[" & my joinText(entries, ", ") & "]"
end tell
{JSON_STRING}
{JOIN_TEXT}"#,
        scope = scope(input.folder),
        limit = input.limit,
        query = quoted(&input.query),
        record = note_json("n", input.include_body),
    )
}
