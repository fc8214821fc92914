use std::collections::HashSet;

use crate::error::EditError;
use crate::model::{BlockIx, Document, GroupIx, ListType};

/// Checks the structural invariants every committed document upholds.
///
/// - the root group is a plain `Group`
/// - no reachable group is empty
/// - every block and group is reachable along exactly one path
///
/// # Errors
///
/// Returns [`EditError::InvalidGroupState`] describing the first breach.
pub fn check(doc: &Document) -> Result<(), EditError> {
    let root = doc.group(doc.root());
    if root.attrs.list_type != ListType::Group {
        return Err(EditError::InvalidGroupState(format!(
            "root group is {} instead of Group",
            root.attrs.list_type
        )));
    }
    let mut seen_blocks = HashSet::new();
    let mut seen_groups = HashSet::new();
    check_group(doc, doc.root(), 1, &mut seen_blocks, &mut seen_groups)
}

fn check_group(
    doc: &Document,
    group: GroupIx,
    depth: usize,
    seen_blocks: &mut HashSet<BlockIx>,
    seen_groups: &mut HashSet<GroupIx>,
) -> Result<(), EditError> {
    if !seen_groups.insert(group) {
        return Err(EditError::InvalidGroupState(format!(
            "{group:?} is owned twice"
        )));
    }
    let node = doc.group(group);
    if node.blocks.is_empty() {
        return Err(EditError::InvalidGroupState(format!(
            "empty {} group at depth {depth}",
            node.attrs
        )));
    }
    for &block in &node.blocks {
        if !seen_blocks.insert(block) {
            return Err(EditError::InvalidGroupState(format!(
                "{block:?} appears twice"
            )));
        }
        if let Some(children) = doc.block(block).children {
            check_group(doc, children, depth + 1, seen_blocks, seen_groups)?;
        }
    }
    Ok(())
}
