//! Whole-block insertion and removal.

use crate::error::EditError;
use crate::model::{BlockIx, BlockNode, ContentKind, ContentUnit, Document};
use crate::position::locate;

use super::{Edit, position_of};

/// Removes the block at `pos` together with its children.
///
/// The cursor moves to the start of the block that took its place, else to
/// the end of the previous sibling, else to the end of the parent. Removing
/// the last top-level block leaves one empty paragraph behind.
pub fn delete_block(doc: &Document, pos: usize) -> Result<Edit, EditError> {
    let info = locate(doc, pos)?;
    let group = info.group();
    let index = info.index();

    let mut tx = doc.clone();
    tx.group_mut(group).blocks.remove(index);
    let remaining = tx.group(group).blocks.clone();

    let selection = if let Some(&next) = remaining.get(index) {
        position_of(&tx, next)? + 2
    } else if let Some(&prev) = index.checked_sub(1).and_then(|i| remaining.get(i)) {
        text_end(&tx, prev)?
    } else if let Some(parent) = info.parent_block(doc) {
        tx.block_mut(parent).children = None;
        text_end(&tx, parent)?
    } else {
        let placeholder = tx.alloc_block(BlockNode::new(ContentUnit::empty(ContentKind::Paragraph)));
        tx.group_mut(group).blocks.push(placeholder);
        position_of(&tx, placeholder)? + 2
    };

    log::debug!("deleted block {:?}", info.id);
    Edit::commit(tx, Some(selection))
}

/// Makes sure the document ends with an empty paragraph and focuses it.
///
/// A trailing empty paragraph without children is reused as is.
pub fn append_block(doc: &Document) -> Result<Edit, EditError> {
    let root = doc.root();
    let last = doc
        .group(root)
        .blocks
        .last()
        .copied()
        .ok_or_else(|| EditError::InvalidGroupState("root group is empty".into()))?;
    let node = doc.block(last);
    if node.content.is_empty_text() && node.children.is_none() {
        return Ok(Edit::unchanged(doc, position_of(doc, last)? + 2));
    }

    let mut tx = doc.clone();
    let block = tx.alloc_block(BlockNode::new(ContentUnit::empty(ContentKind::Paragraph)));
    tx.group_mut(root).blocks.push(block);
    let selection = position_of(&tx, block)? + 2;
    log::debug!("appended an empty paragraph");
    Edit::commit(tx, Some(selection))
}

/// Position right after the content of `block`.
fn text_end(doc: &Document, block: BlockIx) -> Result<usize, EditError> {
    let content = &doc.block(block).content;
    let before = position_of(doc, block)?;
    if content.has_inline_content() {
        Ok(before + 2 + content.inline_size())
    } else {
        Ok(before + 2)
    }
}
