//! Split Engine.

use crate::error::EditError;
use crate::model::{
    BlockNode, BlockSpec, ContentKind, ContentUnit, Document, GroupNode, ListAttrs,
};
use crate::position::{BlockInfo, Container, locate_resolved, resolve};

use super::{Edit, position_of};

/// Parameters of [`split`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOptions {
    /// The second half takes the original content kind instead of a paragraph.
    pub keep_content_type: bool,
    /// With `keep_content_type`, the second half also copies the attributes.
    pub keep_attributes: bool,
    /// Block spliced in between the two halves; the cursor lands inside it.
    pub insert: Option<BlockSpec>,
}

impl SplitOptions {
    pub fn keeping_type() -> Self {
        Self {
            keep_content_type: true,
            keep_attributes: true,
            insert: None,
        }
    }
}

/// Splits the block at `pos` into two siblings.
///
/// The first half keeps the id, kind and attributes of the original block
/// along with the content before `pos`. The second half has no id, holds
/// the rest of the content and takes over the original block's children.
/// The cursor is placed at the start of the second half.
pub fn split(doc: &Document, pos: usize, options: SplitOptions) -> Result<Edit, EditError> {
    let (info, offset) = split_point(doc, pos)?;
    let mut tx = doc.clone();

    let node = tx.block_mut(info.block);
    let tail_content = cut_content(
        &mut node.content,
        offset,
        options.keep_content_type,
        options.keep_attributes,
    );
    let children = node.children.take();
    let tail = tx.alloc_block(BlockNode {
        id: None,
        content: tail_content,
        children,
    });

    let group = info.group();
    let mut slot = info.index() + 1;
    let mut focus = tail;
    if let Some(spec) = options.insert {
        let inserted = tx.materialize(spec)?;
        tx.group_mut(group).blocks.insert(slot, inserted);
        slot += 1;
        focus = inserted;
    }
    tx.group_mut(group).blocks.insert(slot, tail);

    let selection = position_of(&tx, focus)? + 2;
    log::debug!("split block {:?} at offset {offset}", info.id);
    Edit::commit(tx, Some(selection))
}

/// Splits a heading-like block so the text after `pos` opens its section.
///
/// The tail becomes a plain paragraph placed first in the block's child
/// group, which is created as a plain `Group` when absent.
pub fn split_into_section(doc: &Document, pos: usize) -> Result<Edit, EditError> {
    let (info, offset) = split_point(doc, pos)?;
    let mut tx = doc.clone();

    let tail_content = cut_content(&mut tx.block_mut(info.block).content, offset, false, false);
    let tail = tx.alloc_block(BlockNode::new(tail_content));
    match tx.block(info.block).children {
        Some(group) => tx.group_mut(group).blocks.insert(0, tail),
        None => {
            let group = tx.alloc_group(GroupNode {
                attrs: ListAttrs::group(),
                blocks: vec![tail],
            });
            tx.block_mut(info.block).children = Some(group);
        }
    }

    let selection = position_of(&tx, tail)? + 2;
    log::debug!("split block {:?} into its section at offset {offset}", info.id);
    Edit::commit(tx, Some(selection))
}

/// The block owning `pos` and the inline offset of `pos` in its content.
fn split_point(doc: &Document, pos: usize) -> Result<(BlockInfo, usize), EditError> {
    let resolved = resolve(doc, pos)?;
    let info = locate_resolved(doc, &resolved)?;
    let offset = match resolved.parent() {
        Some(Container::Content(block)) if block == info.block => resolved.parent_offset(),
        Some(Container::Block(block)) if block == info.block => {
            if resolved.index() == 0 {
                0
            } else {
                doc.block(block).content.inline_size()
            }
        }
        _ => return Err(EditError::NotABlock { pos }),
    };
    Ok((info, offset))
}

/// Cuts `content` at `offset` and returns the content for the second half.
fn cut_content(
    content: &mut ContentUnit,
    offset: usize,
    keep_type: bool,
    keep_attributes: bool,
) -> ContentUnit {
    if !content.has_inline_content() {
        return ContentUnit::empty(ContentKind::Paragraph);
    }
    let inline = content.split_off(offset);
    let mut tail = if keep_type {
        ContentUnit::empty(content.kind)
    } else {
        ContentUnit::empty(ContentKind::Paragraph)
    };
    if keep_type && keep_attributes {
        tail.attrs = content.attrs.clone();
    }
    tail.with_inline(inline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupSpec;
    use crate::snapshot::outline;
    use pretty_assertions::assert_eq;

    fn doc(blocks: Vec<BlockSpec>) -> Document {
        Document::from_blocks(blocks).unwrap()
    }

    #[test]
    fn test_split_mid_text() {
        // Given two flat blocks
        let doc = doc(vec![
            BlockSpec::text("First").with_id("block-1"),
            BlockSpec::text("Second").with_id("block-2"),
        ]);
        let pos = doc.pos_in_block(&"block-1".into()).unwrap() + 2;

        // When splitting after "Fi"
        let edit = split(&doc, pos, SplitOptions::default()).unwrap();

        // Then the tail is a fresh sibling and the cursor sits at its start
        assert_eq!(
            edit.doc.to_blocks(),
            vec![
                BlockSpec::text("Fi").with_id("block-1"),
                BlockSpec::text("rst"),
                BlockSpec::text("Second").with_id("block-2"),
            ]
        );
        assert_eq!(edit.selection, Some(9));
        assert_eq!(edit.doc.revision(), doc.revision() + 1);
    }

    #[test]
    fn test_split_at_end_yields_empty_block() {
        let doc = doc(vec![BlockSpec::text("First").with_id("block-1")]);
        let pos = doc.pos_in_block(&"block-1".into()).unwrap() + 5;

        let edit = split(&doc, pos, SplitOptions::default()).unwrap();

        assert_eq!(
            edit.doc.to_blocks(),
            vec![BlockSpec::text("First").with_id("block-1"), BlockSpec::text("")]
        );
    }

    #[test]
    fn test_split_moves_children_to_second_half() {
        let doc = doc(vec![BlockSpec::text("Parent").with_id("p").with_children(
            GroupSpec::unordered(1, vec![BlockSpec::text("Child").with_id("c")]),
        )]);
        let pos = doc.pos_in_block(&"p".into()).unwrap() + 3;

        let edit = split(&doc, pos, SplitOptions::default()).unwrap();

        insta::assert_snapshot!(outline(&edit.doc), @r#"
        Group
          paragraph "Par" #p
          paragraph "ent"
            Unordered(1)
              paragraph "Child" #c
        "#);
    }

    #[test]
    fn test_split_heading_keeps_first_half_type() {
        let doc = doc(vec![
            BlockSpec::new(ContentUnit::heading(2, "Title")).with_id("h"),
        ]);
        let pos = doc.pos_in_block(&"h".into()).unwrap() + 2;

        let plain = split(&doc, pos, SplitOptions::default()).unwrap();
        let kept = split(&doc, pos, SplitOptions::keeping_type()).unwrap();

        let plain_blocks = plain.doc.to_blocks();
        assert_eq!(plain_blocks[0].content, ContentUnit::heading(2, "Ti"));
        assert_eq!(plain_blocks[1].content, ContentUnit::paragraph("tle"));
        assert_eq!(kept.doc.to_blocks()[1].content, ContentUnit::heading(2, "tle"));
    }

    #[test]
    fn test_keep_type_without_attributes() {
        let doc = doc(vec![
            BlockSpec::new(ContentUnit::heading(2, "Title")).with_id("h"),
        ]);
        let pos = doc.pos_in_block(&"h".into()).unwrap();
        let options = SplitOptions {
            keep_content_type: true,
            keep_attributes: false,
            insert: None,
        };

        let edit = split(&doc, pos, options).unwrap();

        let second = &edit.doc.to_blocks()[1].content;
        assert_eq!(second.kind, ContentKind::Heading);
        assert!(second.attrs.is_empty());
        assert_eq!(second.text(), "Title");
    }

    #[test]
    fn test_split_inside_list_keeps_both_in_list() {
        let doc = doc(vec![BlockSpec::text("Root").with_children(GroupSpec::unordered(
            1,
            vec![BlockSpec::text("Item").with_id("item")],
        ))]);
        let pos = doc.pos_in_block(&"item".into()).unwrap() + 2;

        let edit = split(&doc, pos, SplitOptions::default()).unwrap();

        insta::assert_snapshot!(outline(&edit.doc), @r#"
        Group
          paragraph "Root"
            Unordered(1)
              paragraph "It" #item
              paragraph "em"
        "#);
    }

    #[test]
    fn test_split_with_inserted_block_focuses_it() {
        let doc = doc(vec![BlockSpec::text("AB").with_id("ab")]);
        let pos = doc.pos_in_block(&"ab".into()).unwrap() + 1;
        let options = SplitOptions {
            insert: Some(BlockSpec::text("new").with_id("new")),
            ..SplitOptions::default()
        };

        let edit = split(&doc, pos, options).unwrap();

        assert_eq!(
            edit.doc.to_blocks(),
            vec![
                BlockSpec::text("A").with_id("ab"),
                BlockSpec::text("new").with_id("new"),
                BlockSpec::text("B"),
            ]
        );
        assert_eq!(edit.selection, edit.doc.pos_in_block(&"new".into()));
    }

    #[test]
    fn test_split_between_blocks_is_not_a_block() {
        let doc = doc(vec![BlockSpec::text("A"), BlockSpec::text("B")]);

        // Position 1 sits in the root group, right before the first block.
        assert_eq!(
            split(&doc, 1, SplitOptions::default()).unwrap_err(),
            EditError::NotABlock { pos: 1 }
        );
    }

    #[test]
    fn test_split_into_section_creates_group() {
        let doc = doc(vec![
            BlockSpec::new(ContentUnit::heading(1, "Intro text")).with_id("h"),
        ]);
        let pos = doc.pos_in_block(&"h".into()).unwrap() + 5;

        let edit = split_into_section(&doc, pos).unwrap();

        insta::assert_snapshot!(outline(&edit.doc), @r#"
        Group
          heading "Intro" #h
            Group
              paragraph " text"
        "#);
    }

    #[test]
    fn test_split_into_section_prepends_to_existing_children() {
        let doc = doc(vec![
            BlockSpec::new(ContentUnit::heading(1, "HeadTail"))
                .with_id("h")
                .with_children(GroupSpec::group(vec![BlockSpec::text("Body").with_id("b")])),
        ]);
        let pos = doc.pos_in_block(&"h".into()).unwrap() + 4;

        let edit = split_into_section(&doc, pos).unwrap();

        insta::assert_snapshot!(outline(&edit.doc), @r#"
        Group
          heading "Head" #h
            Group
              paragraph "Tail"
              paragraph "Body" #b
        "#);
        let focused = edit.focused_block().unwrap();
        assert_eq!(focused.id, None);
        assert_eq!(focused.depth(), 2);
    }
}
