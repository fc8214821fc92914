//! Document model: list attributes, content units and the block arena.

mod content;
mod document;
mod id;
mod list;
mod tree;

pub use content::{ContentKind, ContentUnit, InlineNode};
pub use document::{BlockIx, BlockNode, Document, GroupIx, GroupNode};
pub use id::BlockId;
pub use list::{InvalidListLevel, ListAttrs, ListLevel, ListType};
pub use tree::{BlockSpec, GroupSpec};
