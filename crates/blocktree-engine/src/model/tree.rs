use serde::{Deserialize, Serialize};

use super::{BlockId, ContentUnit, ListAttrs};

/// An owned block subtree.
///
/// This is the exchange form of the document: it is what callers build
/// documents from, what [`crate::Document::to_blocks`] returns, and what a
/// normalized fragment converts into for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    pub content: ContentUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<GroupSpec>,
}

impl BlockSpec {
    pub fn new(content: ContentUnit) -> Self {
        Self {
            id: None,
            content,
            children: None,
        }
    }

    /// A paragraph block holding `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ContentUnit::paragraph(text))
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, group: GroupSpec) -> Self {
        self.children = Some(group);
        self
    }
}

/// An owned child group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(default)]
    pub attrs: ListAttrs,
    pub blocks: Vec<BlockSpec>,
}

impl GroupSpec {
    pub fn new(attrs: ListAttrs, blocks: Vec<BlockSpec>) -> Self {
        Self { attrs, blocks }
    }

    pub fn group(blocks: Vec<BlockSpec>) -> Self {
        Self::new(ListAttrs::group(), blocks)
    }

    pub fn unordered(level: u8, blocks: Vec<BlockSpec>) -> Self {
        Self::new(ListAttrs::unordered(level), blocks)
    }

    pub fn ordered(level: u8, blocks: Vec<BlockSpec>) -> Self {
        Self::new(ListAttrs::ordered(level), blocks)
    }

    pub fn blockquote(blocks: Vec<BlockSpec>) -> Self {
        Self::new(ListAttrs::blockquote(), blocks)
    }
}
