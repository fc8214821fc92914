use crate::error::EditError;
use crate::model::{BlockIx, Document, GroupIx};

/// A node that can directly contain a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Group(GroupIx),
    Block(BlockIx),
    /// The inline content of a block.
    Content(BlockIx),
}

/// One level of the ancestor chain of a resolved position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub container: Container,
    /// Position of the first slot inside the container.
    pub start: usize,
    /// Index of the child the position falls into or sits before.
    ///
    /// For a block: 0 is its content, 1 its child group, 2 past both.
    pub index: usize,
}

/// A position with its ancestor chain, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    frames: Vec<Frame>,
}

impl ResolvedPos {
    /// Number of containers around the position; 0 outside the root group.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn parent(&self) -> Option<Container> {
        self.frames.last().map(|frame| frame.container)
    }

    pub fn index(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.index)
    }

    /// Offset from the start of the parent container.
    pub fn parent_offset(&self) -> usize {
        self.frames.last().map_or(self.pos, |frame| self.pos - frame.start)
    }

    /// The block starting right at this position, if the parent is a group.
    pub fn block_after(&self, doc: &Document) -> Option<BlockIx> {
        match self.parent()? {
            Container::Group(group) => doc.group(group).blocks.get(self.index()).copied(),
            _ => None,
        }
    }
}

/// Walks from the root to the innermost container of `pos`.
pub fn resolve(doc: &Document, pos: usize) -> Result<ResolvedPos, EditError> {
    let size = doc.size();
    if pos > size {
        return Err(EditError::PositionOutOfRange { pos, size });
    }
    let mut frames = Vec::new();
    if pos == 0 || pos == size {
        return Ok(ResolvedPos { pos, frames });
    }

    let mut container = Container::Group(doc.root());
    let mut start = 1;
    loop {
        match container {
            Container::Group(group) => {
                let mut offset = start;
                let mut index = doc.group(group).blocks.len();
                let mut inside = None;
                for (i, &block) in doc.group(group).blocks.iter().enumerate() {
                    if pos == offset {
                        index = i;
                        break;
                    }
                    let end = offset + doc.block_size(block);
                    if pos < end {
                        index = i;
                        inside = Some((block, offset));
                        break;
                    }
                    offset = end;
                }
                frames.push(Frame {
                    container,
                    start,
                    index,
                });
                match inside {
                    Some((block, before)) => {
                        container = Container::Block(block);
                        start = before + 1;
                    }
                    None => break,
                }
            }
            Container::Block(block) => {
                let node = doc.block(block);
                let content_end = start + node.content.node_size();
                if pos == start {
                    frames.push(Frame {
                        container,
                        start,
                        index: 0,
                    });
                    break;
                }
                if pos < content_end {
                    frames.push(Frame {
                        container,
                        start,
                        index: 0,
                    });
                    container = Container::Content(block);
                    start += 1;
                    continue;
                }
                let group_end = node
                    .children
                    .map_or(content_end, |group| content_end + doc.group_size(group));
                let index = if pos == content_end {
                    1
                } else if pos == group_end {
                    2
                } else {
                    1
                };
                frames.push(Frame {
                    container,
                    start,
                    index,
                });
                match node.children {
                    Some(group) if pos > content_end && pos < group_end => {
                        container = Container::Group(group);
                        start = content_end + 1;
                    }
                    _ => break,
                }
            }
            Container::Content(_) => {
                frames.push(Frame {
                    container,
                    start,
                    index: 0,
                });
                break;
            }
        }
    }
    log::trace!("resolved {pos} to depth {}", frames.len());
    Ok(ResolvedPos { pos, frames })
}
