//! Nest/Unnest Engine.
//!
//! Nesting moves a block into the child group of its previous sibling;
//! unnesting moves it out to follow its parent. Both keep document order:
//! a block's visual position relative to its neighbours never changes, only
//! its depth.

use crate::classify::joins_existing;
use crate::error::EditError;
use crate::model::{Document, GroupNode, ListAttrs, ListLevel, ListType};
use crate::position::locate;

use super::{Command, Edit, position_of};

#[must_use]
pub fn can_nest(doc: &Document, pos: usize) -> bool {
    locate(doc, pos).is_ok_and(|info| !info.is_first_child())
}

#[must_use]
pub fn can_unnest(doc: &Document, pos: usize) -> bool {
    locate(doc, pos).is_ok_and(|info| info.depth() > 1)
}

/// Moves the block at `pos` into its previous sibling's child group.
///
/// An existing group of the sibling is joined when the request is a plain
/// `Group` or names the same list type; otherwise the block keeps descending
/// through last children until it finds such a group or a block without
/// one, where a new group is created. `level` only applies to a created
/// group; `None` derives it (one deeper than an enclosing bulleted list,
/// else 1).
///
/// Nesting into a bulleted list schedules a [`Command::RelevelChildren`]
/// pass for the moved block's own descendants.
pub fn nest(
    doc: &Document,
    pos: usize,
    list_type: ListType,
    level: Option<ListLevel>,
) -> Result<Edit, EditError> {
    let info = locate(doc, pos)?;
    if info.is_first_child() {
        return Err(EditError::NoPreviousSibling);
    }
    let group = info.group();
    let index = info.index();
    let enclosing = doc.group(group).attrs;
    let prev = doc.group(group).blocks[index - 1];

    let mut tx = doc.clone();
    tx.group_mut(group).blocks.remove(index);

    let mut owner = prev;
    let destination = loop {
        match tx.block(owner).children {
            Some(existing) if joins_existing(tx.group(existing).attrs.list_type, list_type) => {
                tx.group_mut(existing).blocks.push(info.block);
                break existing;
            }
            Some(existing) => match tx.group(existing).blocks.last() {
                Some(&last) => owner = last,
                None => {
                    return Err(EditError::InvalidGroupState(format!(
                        "{existing:?} has no blocks"
                    )));
                }
            },
            None => {
                let level = level.unwrap_or_else(|| derived_level(enclosing, list_type));
                let created = tx.alloc_group(GroupNode {
                    attrs: ListAttrs::new(list_type, level),
                    blocks: vec![info.block],
                });
                tx.block_mut(owner).children = Some(created);
                break created;
            }
        }
    };

    let moved_before = position_of(&tx, info.block)?;
    let selection = moved_before + (pos - info.block_bounds.before);
    let landed = tx.group(destination).attrs;
    log::debug!("nested block {:?} into {landed} group", info.id);
    let edit = Edit::commit(tx, Some(selection))?;

    if landed.list_type == ListType::Unordered && info.child_group.is_some() {
        return Ok(edit.then(Command::RelevelChildren {
            at: moved_before,
            base: landed.level.get(),
            indent: true,
        }));
    }
    Ok(edit)
}

fn derived_level(enclosing: ListAttrs, requested: ListType) -> ListLevel {
    if requested == ListType::Unordered && enclosing.list_type == ListType::Unordered {
        enclosing.level.deeper()
    } else {
        ListLevel::MIN
    }
}

/// Moves the block at `pos` out of its group to follow its parent block.
///
/// Blocks after it in the same group become its children, appended after
/// any children it already has, so everything below it stays below it. A
/// group left empty is removed from the parent. The block's own bulleted or
/// numbered child group moves up a level.
pub fn unnest(doc: &Document, pos: usize) -> Result<Edit, EditError> {
    let info = locate(doc, pos)?;
    if info.depth() <= 1 {
        return Err(EditError::NotNested);
    }
    let group = info.group();
    let index = info.index();
    let parent = info
        .parent_block(doc)
        .ok_or_else(|| EditError::InvalidGroupState("nested block without a parent".into()))?;
    let (outer, parent_index) = info.path[info.depth() - 2];

    let mut tx = doc.clone();
    let following = tx.group_mut(group).blocks.split_off(index + 1);

    if let Some(children) = tx.block(info.block).children {
        let attrs = &mut tx.group_mut(children).attrs;
        if attrs.list_type.has_markers() {
            attrs.level = attrs.level.shallower();
        }
    }
    if !following.is_empty() {
        match tx.block(info.block).children {
            Some(children) => tx.group_mut(children).blocks.extend(following),
            None => {
                let attrs = tx.group(group).attrs;
                let created = tx.alloc_group(GroupNode {
                    attrs,
                    blocks: following,
                });
                tx.block_mut(info.block).children = Some(created);
            }
        }
    }

    tx.group_mut(group).blocks.remove(index);
    if tx.group(group).blocks.is_empty() {
        tx.block_mut(parent).children = None;
    }
    tx.group_mut(outer).blocks.insert(parent_index + 1, info.block);

    let selection = position_of(&tx, info.block)? + (pos - info.block_bounds.before);
    log::debug!("unnested block {:?}", info.id);
    Edit::commit(tx, Some(selection))
}
