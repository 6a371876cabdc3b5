//! OmniFocus task management.
//!
//! `listItems` prints the whole database as an outline payload: one
//! `|`-separated record per item between the outline markers, with a depth
//! field that lets the server rebuild the folder/project/task tree.

use osa_catalog::applescript::{boolean, quoted};
use osa_catalog::{Category, InputShape, Operation, Producer};
use osa_outline::{END_MARKER, START_MARKER};
use serde::Deserialize;
use serde_json::json;

use crate::non_blank;

/// Project name that means "leave the task in the inbox".
const INBOX_PROJECT: &str = "Inbox";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskInput {
    task_name: String,
    #[serde(default)]
    task_notes: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    tag_names: Option<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListItemsInput {
    #[serde(default)]
    include_completed: bool,
    #[serde(default)]
    include_dropped: bool,
}

pub(crate) fn category() -> Category {
    Category::new("omnifocus", "OmniFocus task management operations")
        .with_operation(
            Operation::new(
                "createTask",
                "Create a new task in OmniFocus",
                Producer::typed(create_task),
            )
            .with_input(InputShape::object(
                json!({
                    "taskName": { "type": "string", "description": "Task name" },
                    "taskNotes": { "type": "string", "description": "Notes for the task", "default": "" },
                    "dueDate": { "type": "string", "description": "Due date (optional)" },
                    "flagged": { "type": "boolean", "description": "Flagged status", "default": false },
                    "projectName": {
                        "type": "string",
                        "description": "Name of the project",
                        "default": INBOX_PROJECT
                    },
                    "tagNames": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of tag names",
                        "default": []
                    }
                }),
                &["taskName"],
            )),
        )
        .with_operation(
            Operation::new(
                "listItems",
                "List OmniFocus folders, projects and tasks as a tree",
                Producer::typed(list_items),
            )
            .with_input(InputShape::object(
                json!({
                    "includeCompleted": {
                        "type": "boolean",
                        "description": "Include completed projects and tasks",
                        "default": false
                    },
                    "includeDropped": {
                        "type": "boolean",
                        "description": "Include dropped projects, tasks and hidden folders",
                        "default": false
                    }
                }),
                &[],
            )),
        )
}

fn create_task(input: CreateTaskInput) -> String {
    let mut script = format!(
        r#"tell application "OmniFocus"
  tell default document
    set theTask to make new inbox task with properties {{name:{}, flagged:{}}}"#,
        quoted(&input.task_name),
        boolean(input.flagged)
    );

    if let Some(notes) = non_blank(input.task_notes) {
        script.push_str(&format!(
            "\n    set the note of theTask to {}",
            quoted(&notes)
        ));
    }

    if let Some(due) = non_blank(input.due_date) {
        script.push_str(&format!(
            r#"
    try
      set due date of theTask to date {}
    end try"#,
            quoted(&due)
        ));
    }

    if let Some(project) = non_blank(input.project_name).filter(|name| name != INBOX_PROJECT) {
        script.push_str(&format!(
            r#"
    try
      set theProject to first project whose name is {}
      move theTask to theProject
    end try"#,
            quoted(&project)
        ));
    }

    for tag in input
        .tag_names
        .unwrap_or_default()
        .into_iter()
        .filter_map(non_blank)
    {
        script.push_str(&format!(
            r#"
    try
      set theTag to first tag whose name is {}
      add theTag to tags of theTask
    end try"#,
            quoted(&tag)
        ));
    }

    script.push_str(
        r#"
    return id of theTask
  end tell
end tell"#,
    );
    script
}

fn list_items(input: ListItemsInput) -> String {
    format!(
        r#"set includeCompleted to {completed}
set includeDropped to {dropped}
set output to "{START_MARKER}" & linefeed
try
  tell application "OmniFocus"
    tell default document
      set inboxItems to inbox tasks
      set topFolders to folders
      set topProjects to projects
    end tell
  end tell
  set output to output & my outlineLine("INBOX", "Inbox", "inbox", "inbox", false, false, false, 0, "")
  set output to output & my taskLines(inboxItems, 1, includeCompleted, includeDropped)
  set output to output & my folderLines(topFolders, 0, includeCompleted, includeDropped)
  set output to output & my projectLines(topProjects, 0, includeCompleted, includeDropped)
on error errMsg
  set output to output & my outlineLine("ERROR", errMsg, "", "error", false, false, false, 0, "")
end try
return output & "{END_MARKER}"
{OUTLINE_HANDLERS}"#,
        completed = boolean(input.include_completed),
        dropped = boolean(input.include_dropped),
    )
}

const OUTLINE_HANDLERS: &str = r#"
on clean(theText)
  set theText to theText as text
  repeat with pair in {{"|", "/"}, {return, " "}, {linefeed, " "}}
    set AppleScript's text item delimiters to item 1 of pair
    set pieces to text items of theText
    set AppleScript's text item delimiters to item 2 of pair
    set theText to pieces as text
  end repeat
  set AppleScript's text item delimiters to ""
  return theText
end clean

on outlineLine(tag, itemName, itemId, itemType, flagA, flagB, flagC, depth, due)
  return tag & "|" & my clean(itemName) & "|" & itemId & "|" & itemType & "|" & flagA & "|" & flagB & "|" & flagC & "|" & depth & "|" & due & linefeed
end outlineLine

on dueText(theTask)
  tell application "OmniFocus"
    set theDue to due date of theTask
  end tell
  if theDue is missing value then return ""
  return my clean(theDue as text)
end dueText

on taskLines(theTasks, depth, includeCompleted, includeDropped)
  set output to ""
  tell application "OmniFocus"
    repeat with t in theTasks
      set isDone to completed of t
      set isDropped to dropped of t
      if (includeCompleted or not isDone) and (includeDropped or not isDropped) then
        set output to output & my outlineLine("TASK", name of t, id of t, "task", isDone, flagged of t, isDropped, depth, my dueText(t))
        set output to output & my taskLines(tasks of t, depth + 1, includeCompleted, includeDropped)
      end if
    end repeat
  end tell
  return output
end taskLines

on projectLines(theProjects, depth, includeCompleted, includeDropped)
  set output to ""
  tell application "OmniFocus"
    repeat with p in theProjects
      set projectStatus to status of p
      set isDone to (projectStatus is done status)
      set isDropped to (projectStatus is dropped status)
      if (includeCompleted or not isDone) and (includeDropped or not isDropped) then
        set output to output & my outlineLine("PROJECT", name of p, id of p, "project", isDone, false, isDropped, depth, "")
        set output to output & my taskLines(tasks of p, depth + 1, includeCompleted, includeDropped)
      end if
    end repeat
  end tell
  return output
end projectLines

on folderLines(theFolders, depth, includeCompleted, includeDropped)
  set output to ""
  tell application "OmniFocus"
    repeat with f in theFolders
      set isHidden to hidden of f
      if includeDropped or not isHidden then
        set output to output & my outlineLine("FOLDER", name of f, id of f, "folder", isHidden, false, false, depth, "")
        set output to output & my projectLines(projects of f, depth + 1, includeCompleted, includeDropped)
        set output to output & my folderLines(folders of f, depth + 1, includeCompleted, includeDropped)
      end if
    end repeat
  end tell
  return output
end folderLines"#;
