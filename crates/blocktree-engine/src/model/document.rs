use crate::error::EditError;
use crate::snapshot::invariants;

use super::{BlockId, BlockSpec, ContentKind, ContentUnit, GroupSpec, ListAttrs};

/// Index of a block in a [`Document`] arena.
///
/// Only meaningful for the revision it was read from; committing an edit
/// compacts the arena and renumbers every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockIx(u32);

/// Index of a child group in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIx(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub id: Option<BlockId>,
    pub content: ContentUnit,
    pub children: Option<GroupIx>,
}

impl BlockNode {
    pub fn new(content: ContentUnit) -> Self {
        Self {
            id: None,
            content,
            children: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub attrs: ListAttrs,
    pub blocks: Vec<BlockIx>,
}

/// A block tree stored in an arena.
///
/// Nodes never point at their parents; any operation needing ancestors
/// recomputes them from a tree position (see [`crate::position`]). Blocks
/// detached during an edit stay in the arena as garbage until the edit is
/// committed, which rebuilds the arena from the reachable tree.
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<BlockNode>,
    groups: Vec<GroupNode>,
    root: GroupIx,
    revision: u64,
}

impl Document {
    /// A document holding one empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self::bare(0);
        doc.push_placeholder();
        doc
    }

    /// Builds a document whose root group holds `blocks`.
    ///
    /// An empty list yields one empty paragraph. A nested group without
    /// blocks is rejected.
    pub fn from_blocks(blocks: Vec<BlockSpec>) -> Result<Self, EditError> {
        Self::build(blocks, 0)
    }

    fn bare(revision: u64) -> Self {
        Self {
            blocks: Vec::new(),
            groups: vec![GroupNode {
                attrs: ListAttrs::group(),
                blocks: Vec::new(),
            }],
            root: GroupIx(0),
            revision,
        }
    }

    fn build(blocks: Vec<BlockSpec>, revision: u64) -> Result<Self, EditError> {
        let mut doc = Self::bare(revision);
        if blocks.is_empty() {
            doc.push_placeholder();
        }
        for spec in blocks {
            let block = doc.materialize(spec)?;
            let root = doc.root;
            doc.group_mut(root).blocks.push(block);
        }
        Ok(doc)
    }

    fn push_placeholder(&mut self) {
        let block = self.alloc_block(BlockNode::new(ContentUnit::empty(ContentKind::Paragraph)));
        let root = self.root;
        self.group_mut(root).blocks.push(block);
    }

    /// Allocates `spec` and its whole subtree, returning the detached block.
    pub(crate) fn materialize(&mut self, spec: BlockSpec) -> Result<BlockIx, EditError> {
        let children = match spec.children {
            Some(group) => Some(self.materialize_group(group)?),
            None => None,
        };
        Ok(self.alloc_block(BlockNode {
            id: spec.id,
            content: spec.content,
            children,
        }))
    }

    fn materialize_group(&mut self, spec: GroupSpec) -> Result<GroupIx, EditError> {
        if spec.blocks.is_empty() {
            return Err(EditError::InvalidGroupState(format!(
                "{} group built without blocks",
                spec.attrs
            )));
        }
        let blocks = spec
            .blocks
            .into_iter()
            .map(|block| self.materialize(block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.alloc_group(GroupNode {
            attrs: spec.attrs,
            blocks,
        }))
    }

    pub fn to_blocks(&self) -> Vec<BlockSpec> {
        self.group(self.root)
            .blocks
            .iter()
            .map(|&block| self.block_spec(block))
            .collect()
    }

    pub fn block_spec(&self, ix: BlockIx) -> BlockSpec {
        let node = self.block(ix);
        BlockSpec {
            id: node.id.clone(),
            content: node.content.clone(),
            children: node.children.map(|group| self.group_spec(group)),
        }
    }

    pub fn group_spec(&self, ix: GroupIx) -> GroupSpec {
        let node = self.group(ix);
        GroupSpec {
            attrs: node.attrs,
            blocks: node
                .blocks
                .iter()
                .map(|&block| self.block_spec(block))
                .collect(),
        }
    }

    pub fn root(&self) -> GroupIx {
        self.root
    }

    /// Incremented by every committed edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn block(&self, ix: BlockIx) -> &BlockNode {
        &self.blocks[ix.0 as usize]
    }

    pub fn group(&self, ix: GroupIx) -> &GroupNode {
        &self.groups[ix.0 as usize]
    }

    pub(crate) fn block_mut(&mut self, ix: BlockIx) -> &mut BlockNode {
        &mut self.blocks[ix.0 as usize]
    }

    pub(crate) fn group_mut(&mut self, ix: GroupIx) -> &mut GroupNode {
        &mut self.groups[ix.0 as usize]
    }

    pub(crate) fn alloc_block(&mut self, node: BlockNode) -> BlockIx {
        self.blocks.push(node);
        BlockIx((self.blocks.len() - 1) as u32)
    }

    pub(crate) fn alloc_group(&mut self, node: GroupNode) -> GroupIx {
        self.groups.push(node);
        GroupIx((self.groups.len() - 1) as u32)
    }

    /// Width of the whole tree in positions, root group tokens included.
    pub fn size(&self) -> usize {
        self.group_size(self.root)
    }

    pub fn block_size(&self, ix: BlockIx) -> usize {
        let node = self.block(ix);
        let children = node.children.map_or(0, |group| self.group_size(group));
        2 + node.content.node_size() + children
    }

    pub fn group_size(&self, ix: GroupIx) -> usize {
        2 + self
            .group(ix)
            .blocks
            .iter()
            .map(|&block| self.block_size(block))
            .sum::<usize>()
    }

    /// Reachable blocks in document order.
    pub fn blocks(&self) -> Vec<BlockIx> {
        let mut out = Vec::new();
        self.collect_blocks(self.root, &mut out);
        out
    }

    fn collect_blocks(&self, group: GroupIx, out: &mut Vec<BlockIx>) {
        for &block in &self.group(group).blocks {
            out.push(block);
            if let Some(children) = self.block(block).children {
                self.collect_blocks(children, out);
            }
        }
    }

    pub fn find_by_id(&self, id: &BlockId) -> Option<BlockIx> {
        self.blocks()
            .into_iter()
            .find(|&block| self.block(block).id.as_ref() == Some(id))
    }

    /// The position right before `target`, if it is reachable.
    pub fn position_of(&self, target: BlockIx) -> Option<usize> {
        self.position_in_group(self.root, 1, target)
    }

    fn position_in_group(&self, group: GroupIx, start: usize, target: BlockIx) -> Option<usize> {
        let mut offset = start;
        for &block in &self.group(group).blocks {
            if block == target {
                return Some(offset);
            }
            let node = self.block(block);
            if let Some(children) = node.children {
                let children_start = offset + 1 + node.content.node_size() + 1;
                if let Some(found) = self.position_in_group(children, children_start, target) {
                    return Some(found);
                }
            }
            offset += self.block_size(block);
        }
        None
    }

    /// The first position inside the content of the block with `id`.
    pub fn pos_in_block(&self, id: &BlockId) -> Option<usize> {
        let block = self.find_by_id(id)?;
        self.position_of(block).map(|before| before + 2)
    }

    /// Gives every block without an id a freshly generated one.
    ///
    /// Returns how many ids were assigned.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut assigned = 0;
        for block in self.blocks() {
            let node = self.block_mut(block);
            if node.id.is_none() {
                node.id = Some(BlockId::generate());
                assigned += 1;
            }
        }
        if assigned > 0 {
            self.revision += 1;
            log::debug!("assigned {assigned} block ids");
        }
        assigned
    }

    /// Checks the tree, compacts the arena and bumps the revision.
    pub(crate) fn commit(self) -> Result<Self, EditError> {
        invariants::check(&self)?;
        Self::build(self.to_blocks(), self.revision + 1)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality; revisions and arena layout are ignored.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.to_blocks() == other.to_blocks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupSpec;
    use pretty_assertions::assert_eq;

    fn two_blocks() -> Document {
        Document::from_blocks(vec![
            BlockSpec::text("First").with_id("block-1"),
            BlockSpec::text("Second").with_id("block-2"),
        ])
        .unwrap()
    }

    #[test]
    fn test_sizes_follow_token_model() {
        let doc = two_blocks();

        // root(2) + block(2) + paragraph(2 + 5) + block(2) + paragraph(2 + 6)
        assert_eq!(doc.size(), 2 + 9 + 10);
    }

    #[test]
    fn test_pos_in_block_points_inside_content() {
        let doc = two_blocks();

        assert_eq!(doc.pos_in_block(&"block-1".into()), Some(3));
        assert_eq!(doc.pos_in_block(&"block-2".into()), Some(12));
        assert_eq!(doc.pos_in_block(&"missing".into()), None);
    }

    #[test]
    fn test_position_of_nested_block() {
        let doc = Document::from_blocks(vec![
            BlockSpec::text("A")
                .with_id("a")
                .with_children(GroupSpec::group(vec![BlockSpec::text("B").with_id("b")])),
        ])
        .unwrap();

        let b = doc.find_by_id(&"b".into()).unwrap();
        // root open, block open, paragraph "A" (3), group open
        assert_eq!(doc.position_of(b), Some(1 + 1 + 3 + 1));
    }

    #[test]
    fn test_empty_document_gets_placeholder() {
        let doc = Document::from_blocks(Vec::new()).unwrap();

        assert_eq!(doc.to_blocks(), vec![BlockSpec::text("")]);
    }

    #[test]
    fn test_empty_nested_group_is_rejected() {
        let result = Document::from_blocks(vec![
            BlockSpec::text("A").with_children(GroupSpec::unordered(1, Vec::new())),
        ]);

        assert!(matches!(result, Err(EditError::InvalidGroupState(_))));
    }

    #[test]
    fn test_round_trip_through_specs() {
        let blocks = vec![
            BlockSpec::text("A").with_children(GroupSpec::ordered(
                2,
                vec![BlockSpec::text("B"), BlockSpec::text("C")],
            )),
            BlockSpec::new(ContentUnit::heading(1, "Title")).with_id("h"),
        ];

        let doc = Document::from_blocks(blocks.clone()).unwrap();

        assert_eq!(doc.to_blocks(), blocks);
    }

    #[test]
    fn test_assign_missing_ids_only_fills_gaps() {
        let mut doc = Document::from_blocks(vec![
            BlockSpec::text("A").with_id("keep"),
            BlockSpec::text("B"),
        ])
        .unwrap();

        assert_eq!(doc.assign_missing_ids(), 1);
        assert_eq!(doc.revision(), 1);
        let ids: Vec<_> = doc
            .blocks()
            .into_iter()
            .map(|b| doc.block(b).id.clone())
            .collect();
        assert_eq!(ids[0], Some("keep".into()));
        assert!(ids[1].is_some());
    }
}
