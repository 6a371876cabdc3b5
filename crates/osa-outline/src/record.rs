use crate::item::{HierarchicalItem, ItemKind};

/// Minimum number of `|`-separated fields in a usable record.
const MIN_FIELDS: usize = 7;

/// Parses one record line.
///
/// Returns `None` for lines with fewer than seven fields. Booleans are true
/// only for the literal `true`; an unparsable depth reads as zero.
#[must_use]
pub fn parse_record(line: &str) -> Option<HierarchicalItem> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let (head, rest) = fields.split_at(4);
    let [tag, name, id, item_type] = head else {
        return None;
    };
    let kind = ItemKind::from_tag(tag);
    let flag = |index: usize| rest.get(index).is_some_and(|value| *value == "true");
    let depth = || rest.get(3).map_or(0, |value| parse_depth(value));

    let item = match kind {
        ItemKind::Folder => {
            let mut item = HierarchicalItem::new(kind, *name, *id, *item_type, depth());
            item.hidden = Some(flag(0));
            item
        }
        ItemKind::Project => {
            let mut item = HierarchicalItem::new(kind, *name, *id, *item_type, depth());
            item.completed = Some(flag(0));
            item.dropped = Some(flag(2));
            item
        }
        ItemKind::Task => {
            let mut item = HierarchicalItem::new(kind, *name, *id, *item_type, depth());
            item.completed = Some(flag(0));
            item.flagged = Some(flag(1));
            item.dropped = Some(flag(2));
            item.due_date = rest
                .get(4)
                .filter(|value| !value.is_empty())
                .map(|value| (*value).to_owned());
            item
        }
        ItemKind::Inbox | ItemKind::Error | ItemKind::Unknown => {
            HierarchicalItem::new(kind, *name, *id, *item_type, 0)
        }
    };
    Some(item)
}

/// Reads the leading run of decimal digits; anything without one is depth 0.
fn parse_depth(value: &str) -> u32 {
    let text = value.trim_start();
    let digits = text
        .find(|character: char| !character.is_ascii_digit())
        .and_then(|end| text.get(..end))
        .unwrap_or(text);
    digits.parse().unwrap_or(0)
}
