//! Merge Engine.

use crate::classify::deepest_last_descendant;
use crate::error::EditError;
use crate::model::Document;
use crate::position::locate;

use super::{Edit, position_of};

/// Joins the block starting at `boundary` onto the block before it.
///
/// The text is appended to the deepest last descendant of the previous
/// sibling, so it lands visually right above the boundary. Children of the
/// merged-away block are lifted to its level first. The cursor ends at the
/// join point.
pub fn merge(doc: &Document, boundary: usize) -> Result<Edit, EditError> {
    let next = locate(doc, boundary)?;
    if next.is_first_child() {
        return Err(EditError::NoPreviousSibling);
    }
    let group = next.group();
    let index = next.index();
    let prev = doc.group(group).blocks[index - 1];
    let target = deepest_last_descendant(doc, prev);
    if !doc.block(target).content.has_inline_content()
        || !doc.block(next.block).content.has_inline_content()
    {
        return Err(EditError::CannotMergeMixedContent);
    }

    let mut tx = doc.clone();
    if let Some(children) = tx.block_mut(next.block).children.take() {
        let lifted = tx.group(children).blocks.clone();
        tx.group_mut(group)
            .blocks
            .splice(index + 1..index + 1, lifted);
    }
    tx.group_mut(group).blocks.remove(index);

    let join = tx.block(target).content.inline_size();
    let inline = std::mem::take(&mut tx.block_mut(next.block).content.inline);
    tx.block_mut(target).content.append_inline(inline);

    let selection = position_of(&tx, target)? + 2 + join;
    log::debug!("merged block {:?} at offset {join}", next.id);
    Edit::commit(tx, Some(selection))
}

/// Joins whatever follows the block at `pos` onto it.
///
/// A block with children absorbs its first child, the other children being
/// lifted to its level. Otherwise the next block in document order, the
/// next sibling of the block or of its nearest ancestor that has one, is
/// merged in.
pub fn merge_forward(doc: &Document, pos: usize) -> Result<Edit, EditError> {
    let info = locate(doc, pos)?;

    if let Some(children) = info.child_group {
        let mut tx = doc.clone();
        let lifted = tx.group(children).blocks.clone();
        tx.block_mut(info.block).children = None;
        let at = info.index() + 1;
        tx.group_mut(info.group())
            .blocks
            .splice(at..at, lifted.iter().copied());
        let first = lifted.first().copied().ok_or_else(|| {
            EditError::InvalidGroupState(format!("{children:?} has no blocks"))
        })?;
        let boundary = position_of(&tx, first)?;
        return merge(&tx, boundary);
    }

    for &(group, index) in info.path.iter().rev() {
        if let Some(&next) = doc.group(group).blocks.get(index + 1) {
            let boundary = position_of(doc, next)?;
            return merge(doc, boundary);
        }
    }
    Err(EditError::NoNextBlock)
}
