//! Rebuilds nested outlines from depth-tagged flat text.
//!
//! Some scripts cannot return structured data, so they print one record per
//! line between two sentinel lines:
//!
//! ```text
//! HIERARCHICAL_START
//! FOLDER|Work|f1|folder|false|false|false|0|
//! PROJECT|Launch|p1|project|false|false|false|1|
//! HIERARCHICAL_END
//! ```
//!
//! Each record is `|`-delimited: a kind tag, the display name, an identifier,
//! a type label, then kind-specific flag fields and the nesting depth. The
//! [`reconstruct`] function parses the records and nests them with an
//! explicit ancestor stack; [`render`] serialises the result as
//! `{"folders": [...]}`.

mod item;
mod record;
mod tree;

use serde::Serialize;
use thiserror::Error;

pub use item::{HierarchicalItem, ItemKind};
pub use record::parse_record;
pub use tree::build_forest;

/// Line that opens a hierarchical payload.
pub const START_MARKER: &str = "HIERARCHICAL_START";

/// Line that closes a hierarchical payload.
pub const END_MARKER: &str = "HIERARCHICAL_END";

/// Reconstructed outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    /// Root items in source order.
    pub folders: Vec<HierarchicalItem>,
}

/// Failure to serialise a reconstructed outline.
#[derive(Debug, Error)]
pub enum OutlineError {
    /// JSON serialisation failed.
    #[error("failed to serialise outline: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Returns `true` when `text` carries a hierarchical payload.
#[must_use]
pub fn is_hierarchical(text: &str) -> bool {
    text.contains(START_MARKER)
}

/// Parses every record in `text` and nests them by depth.
///
/// Lines containing either sentinel, blank lines, and records with fewer
/// than seven fields are skipped.
#[must_use]
pub fn reconstruct(text: &str) -> Outline {
    let items = text
        .lines()
        .filter(|line| {
            !line.trim().is_empty() && !line.contains(START_MARKER) && !line.contains(END_MARKER)
        })
        .filter_map(parse_record);
    Outline {
        folders: build_forest(items),
    }
}

/// Reconstructs `text` and serialises the outline as compact JSON.
///
/// # Errors
///
/// Returns [`OutlineError::Serialize`] if the outline cannot be encoded.
pub fn render(text: &str) -> Result<String, OutlineError> {
    let outline = reconstruct(text);
    Ok(serde_json::to_string(&outline)?)
}

#[cfg(test)]
mod tests;
