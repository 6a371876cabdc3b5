//! Result envelopes returned by `tools/call`.

use serde::Serialize;

/// One block of tool output. Only text blocks are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// Block contents.
        text: String,
    },
}

/// Envelope carrying a tool's output or its failure text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutcome {
    content: Vec<ContentBlock>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

impl ToolOutcome {
    /// Successful envelope wrapping `text`.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Error envelope whose text is `Error: <message>`.
    #[must_use]
    pub fn failure(message: &str) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("Error: {message}"),
            }],
            is_error: true,
        }
    }

    /// Returns `true` for error envelopes.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }

    /// Text of the first content block.
    #[must_use]
    pub fn text(&self) -> &str {
        self.content
            .first()
            .map_or("", |ContentBlock::Text { text }| text.as_str())
    }
}
