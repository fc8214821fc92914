//! Externally supplied content, e.g. from the clipboard, before it is
//! checked against the block tree's shape.
//!
//! A [`Fragment`] is a loose forest: blocks may hold several content units
//! or none, groups and content may float at the top level, and foreign
//! wrapper nodes may appear anywhere. [`normalize`] repairs it and
//! [`Fragment::into_blocks`] turns the repaired forest into insertable
//! [`BlockSpec`]s.

mod normalize;

pub use normalize::normalize;

use crate::error::EditError;
use crate::model::{BlockId, BlockSpec, ContentKind, ContentUnit, GroupSpec, ListAttrs};

/// One node of a pasted forest.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentNode {
    Block {
        id: Option<BlockId>,
        items: Vec<FragmentNode>,
    },
    Group {
        attrs: ListAttrs,
        items: Vec<FragmentNode>,
    },
    Content(ContentUnit),
    /// A wrapper the block tree has no counterpart for.
    Other {
        kind: String,
        items: Vec<FragmentNode>,
    },
}

impl FragmentNode {
    pub fn block(items: Vec<FragmentNode>) -> Self {
        FragmentNode::Block { id: None, items }
    }

    pub fn group(attrs: ListAttrs, items: Vec<FragmentNode>) -> Self {
        FragmentNode::Group { attrs, items }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        FragmentNode::Content(ContentUnit::paragraph(text))
    }

    /// A block holding a single paragraph.
    pub fn text_block(text: impl Into<String>) -> Self {
        Self::block(vec![Self::paragraph(text)])
    }

    fn is_group(&self) -> bool {
        matches!(self, FragmentNode::Group { .. })
    }
}

/// What the target document accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    /// Kind of the empty content unit given to blocks that lack one.
    pub placeholder: ContentKind,
}

impl Schema {
    pub(crate) fn placeholder(&self) -> FragmentNode {
        FragmentNode::Content(ContentUnit::empty(self.placeholder))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment(pub Vec<FragmentNode>);

impl Fragment {
    pub fn new(nodes: Vec<FragmentNode>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[FragmentNode] {
        &self.0
    }

    #[must_use]
    pub fn normalize(self, schema: Option<&Schema>) -> Self {
        normalize(self, schema)
    }

    /// Converts a normalized forest into blocks ready for insertion.
    ///
    /// Fails when a node is not a block with exactly one content unit and at
    /// most one non-empty group, which only happens when the forest was not
    /// normalized against a schema.
    pub fn into_blocks(self) -> Result<Vec<BlockSpec>, EditError> {
        self.0.into_iter().map(block_spec).collect()
    }
}

fn block_spec(node: FragmentNode) -> Result<BlockSpec, EditError> {
    let FragmentNode::Block { id, items } = node else {
        return Err(malformed("top-level node is not a block", &node));
    };
    let mut content = None;
    let mut children = None;
    for item in items {
        match item {
            FragmentNode::Content(unit) if content.is_none() => content = Some(unit),
            FragmentNode::Group { attrs, items } if children.is_none() => {
                if items.is_empty() {
                    return Err(EditError::InvalidGroupState(format!(
                        "pasted {attrs} group has no blocks"
                    )));
                }
                let blocks = items
                    .into_iter()
                    .map(block_spec)
                    .collect::<Result<Vec<_>, _>>()?;
                children = Some(GroupSpec::new(attrs, blocks));
            }
            other => return Err(malformed("unexpected node inside a block", &other)),
        }
    }
    let content = content.ok_or_else(|| {
        EditError::InvalidGroupState("pasted block has no content unit".to_string())
    })?;
    Ok(BlockSpec {
        id,
        content,
        children,
    })
}

fn malformed(what: &str, node: &FragmentNode) -> EditError {
    EditError::InvalidGroupState(format!("{what}: {node:?}"))
}
