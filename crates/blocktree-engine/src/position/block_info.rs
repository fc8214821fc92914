use crate::error::EditError;
use crate::model::{BlockId, BlockIx, ContentKind, Document, GroupIx};

use super::{Container, ResolvedPos, resolve};

/// Open and close boundaries of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBounds {
    /// Position right before the node.
    pub before: usize,
    /// Position right after the node.
    pub after: usize,
}

/// Everything an edit needs to know about the block owning a position.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    pub block: BlockIx,
    pub id: Option<BlockId>,
    pub content_kind: ContentKind,
    pub block_bounds: NodeBounds,
    pub content_bounds: NodeBounds,
    pub child_group: Option<GroupIx>,
    pub child_bounds: Option<NodeBounds>,
    /// `(group, index)` for every group from the root down to the one
    /// holding this block.
    pub path: Vec<(GroupIx, usize)>,
}

impl BlockInfo {
    fn new(doc: &Document, block: BlockIx, before: usize, path: Vec<(GroupIx, usize)>) -> Self {
        let node = doc.block(block);
        let content_after = before + 1 + node.content.node_size();
        let child_bounds = node.children.map(|group| NodeBounds {
            before: content_after,
            after: content_after + doc.group_size(group),
        });
        Self {
            block,
            id: node.id.clone(),
            content_kind: node.content.kind,
            block_bounds: NodeBounds {
                before,
                after: before + doc.block_size(block),
            },
            content_bounds: NodeBounds {
                before: before + 1,
                after: content_after,
            },
            child_group: node.children,
            child_bounds,
            path,
        }
    }

    /// Number of groups enclosing the block; 1 for a top-level block.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The group holding this block.
    pub fn group(&self) -> GroupIx {
        self.path[self.path.len() - 1].0
    }

    /// Index of this block within [`Self::group`].
    pub fn index(&self) -> usize {
        self.path[self.path.len() - 1].1
    }

    #[must_use]
    pub fn is_first_child(&self) -> bool {
        self.index() == 0
    }

    /// The block owning [`Self::group`], absent for top-level blocks.
    pub fn parent_block(&self, doc: &Document) -> Option<BlockIx> {
        let (group, index) = *self.path.iter().rev().nth(1)?;
        doc.group(group).blocks.get(index).copied()
    }

    /// First position inside the content, where text starts.
    pub fn text_start(&self) -> usize {
        self.content_bounds.before + 1
    }

    /// Last position inside the content, where text ends.
    pub fn text_end(&self) -> usize {
        self.content_bounds.after.saturating_sub(1).max(self.text_start())
    }
}

/// Finds the block owning `pos`.
///
/// A position sitting right before a block belongs to that block; otherwise
/// the innermost block around the position wins.
pub fn locate(doc: &Document, pos: usize) -> Result<BlockInfo, EditError> {
    let resolved = resolve(doc, pos)?;
    locate_resolved(doc, &resolved)
}

pub fn locate_resolved(doc: &Document, resolved: &ResolvedPos) -> Result<BlockInfo, EditError> {
    let frames = resolved.frames();
    let mut path = Vec::new();
    let mut found = None;
    for (i, frame) in frames.iter().enumerate() {
        let Container::Group(group) = frame.container else {
            continue;
        };
        match frames.get(i + 1) {
            Some(next) => {
                if let Container::Block(block) = next.container {
                    path.push((group, frame.index));
                    found = Some((block, next.start - 1, path.clone()));
                }
            }
            None => {
                if let Some(block) = resolved.block_after(doc) {
                    path.push((group, frame.index));
                    found = Some((block, resolved.pos, path.clone()));
                }
            }
        }
    }
    match found {
        Some((block, before, path)) => Ok(BlockInfo::new(doc, block, before, path)),
        None => Err(EditError::PositionOutOfRange {
            pos: resolved.pos,
            size: doc.size(),
        }),
    }
}
