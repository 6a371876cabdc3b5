use serde::Serialize;

/// Record kind, taken from the first field of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// `FOLDER` container.
    Folder,
    /// `PROJECT` container.
    Project,
    /// `TASK` leaf.
    Task,
    /// `INBOX` pseudo-container, always at the root.
    Inbox,
    /// `ERROR` placeholder emitted when the script could not read an item.
    Error,
    /// Any other tag.
    Unknown,
}

impl ItemKind {
    /// Maps a record tag to its kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "FOLDER" => Self::Folder,
            "PROJECT" => Self::Project,
            "TASK" => Self::Task,
            "INBOX" => Self::Inbox,
            "ERROR" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// A node in a reconstructed outline.
///
/// Flags are present only where they mean something for the kind: folders
/// carry `hidden`, projects carry `completed` and `dropped`, and tasks carry
/// `completed`, `flagged`, `dropped` plus a non-empty `dueDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchicalItem {
    /// Display label.
    pub name: String,
    /// Source identifier, empty when the record has none.
    pub id: String,
    /// Kind parsed from the tag; not serialised.
    #[serde(skip)]
    pub kind: ItemKind,
    /// Finer-grained type label from the record's fourth field.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Nesting depth in the source listing.
    pub depth: u32,
    /// Completion flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Flagged marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    /// Dropped marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<bool>,
    /// Hidden marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Due date text as printed by the script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Nested items in source order.
    pub children: Vec<HierarchicalItem>,
}

impl HierarchicalItem {
    /// Creates a flagless, childless item.
    pub fn new(
        kind: ItemKind,
        name: impl Into<String>,
        id: impl Into<String>,
        item_type: impl Into<String>,
        depth: u32,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            kind,
            item_type: item_type.into(),
            depth,
            completed: None,
            flagged: None,
            dropped: None,
            hidden: None,
            due_date: None,
            children: Vec::new(),
        }
    }
}
