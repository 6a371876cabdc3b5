use crate::item::HierarchicalItem;

/// Nests items by depth using an explicit ancestor stack.
///
/// For each item, ancestors at the same or greater depth are closed; the item
/// then becomes a child of the remaining top of the stack, or a root when the
/// stack is empty. An item is attached to its parent when it is closed, which
/// keeps siblings in source order.
pub fn build_forest<I>(items: I) -> Vec<HierarchicalItem>
where
    I: IntoIterator<Item = HierarchicalItem>,
{
    let mut roots = Vec::new();
    let mut stack: Vec<HierarchicalItem> = Vec::new();

    for item in items {
        while stack.last().is_some_and(|top| top.depth >= item.depth) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(item);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<HierarchicalItem>, roots: &mut Vec<HierarchicalItem>) {
    let Some(finished) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some(parent) => parent.children.push(finished),
        None => roots.push(finished),
    }
}
