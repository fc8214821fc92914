//! Group Classifier.
//!
//! Predicates and lookups telling plain groups from lists, and plain
//! blocks from list items, shared by every editing operation.

use crate::error::EditError;
use crate::model::{BlockIx, Document, GroupIx, ListAttrs, ListType};
use crate::position::{BlockInfo, locate};

/// What a block is, judged by the group holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// A block in a plain `Group`.
    Block,
    /// A block in an unordered, ordered or quote group.
    ListItem,
}

#[must_use]
pub fn is_list_group(attrs: &ListAttrs) -> bool {
    attrs.list_type.is_list()
}

#[must_use]
pub fn is_root_group(doc: &Document, group: GroupIx) -> bool {
    doc.root() == group
}

pub fn container_kind(doc: &Document, info: &BlockInfo) -> ContainerKind {
    if is_list_group(&doc.group(info.group()).attrs) {
        ContainerKind::ListItem
    } else {
        ContainerKind::Block
    }
}

/// Whether a group of type `existing` already satisfies a `requested` type.
///
/// Unordered and ordered requests accept any bulleted or numbered list;
/// plain groups and quotes only accept their own type.
#[must_use]
pub fn satisfies(existing: ListType, requested: ListType) -> bool {
    match requested {
        ListType::Group => existing == ListType::Group,
        ListType::Unordered | ListType::Ordered => existing.has_markers(),
        ListType::Blockquote => existing == ListType::Blockquote,
    }
}

/// Whether a block nested with `requested` may join an existing group of
/// type `existing` instead of descending further.
#[must_use]
pub fn joins_existing(existing: ListType, requested: ListType) -> bool {
    requested == ListType::Group || existing == requested
}

/// Follows last children down from `block` to the bottom of its subtree.
pub fn deepest_last_descendant(doc: &Document, block: BlockIx) -> BlockIx {
    let mut current = block;
    while let Some(group) = doc.block(current).children {
        match doc.group(group).blocks.last() {
            Some(&last) => current = last,
            None => break,
        }
    }
    current
}

/// A child group seen from one of its blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInfo {
    pub group: GroupIx,
    pub attrs: ListAttrs,
    /// The block the lookup started from.
    pub container: BlockInfo,
    /// Block owning the group, absent for the root group.
    pub owner: Option<BlockIx>,
    /// Attributes of the group holding `owner`.
    pub parent_attrs: Option<ListAttrs>,
}

impl GroupInfo {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.owner.is_none()
    }

    pub fn block_count(&self, doc: &Document) -> usize {
        doc.group(self.group).blocks.len()
    }
}

/// Finds the group holding the block at `pos`.
pub fn group_info(doc: &Document, pos: usize) -> Result<GroupInfo, EditError> {
    let container = locate(doc, pos)?;
    let group = container.group();
    let owner = container.parent_block(doc);
    let parent_attrs = container
        .path
        .iter()
        .rev()
        .nth(1)
        .map(|&(parent, _)| doc.group(parent).attrs);
    Ok(GroupInfo {
        group,
        attrs: doc.group(group).attrs,
        container,
        owner,
        parent_attrs,
    })
}
