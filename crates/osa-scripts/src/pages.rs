//! Pages document operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct DocumentInput {
    content: String,
}

pub(crate) fn category() -> Category {
    Category::new("pages", "Pages document operations").with_operation(
        Operation::new(
            "create_document",
            "Create a new Pages document with plain text content (no formatting)",
            Producer::typed(create_document),
        )
        .with_input(InputShape::object(
            json!({
                "content": {
                    "type": "string",
                    "description": "The plain text content to add to the document (no formatting)"
                }
            }),
            &["content"],
        )),
    )
}

fn create_document(input: DocumentInput) -> String {
    format!(
        r#"try
  tell application "Pages"
    set newDoc to make new document
    set the body text of newDoc to {}
    activate
    return "Document created successfully with plain text content"
  end tell
on error errMsg
  return "Failed to create document: " & errMsg
end try"#,
        quoted(&input.content)
    )
}
