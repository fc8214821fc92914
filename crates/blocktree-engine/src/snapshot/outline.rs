use std::fmt::Write;

use crate::model::{BlockSpec, Document, GroupSpec, ListAttrs};

/// Renders the tree as an indented outline, one node per line.
///
/// ```text
/// Group
///   paragraph "First" #block-1
///     Unordered(2)
///       paragraph "Second"
/// ```
pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    write_group(&mut out, &ListAttrs::group(), &doc.to_blocks(), 0);
    out
}

/// Renders loose blocks, e.g. a normalized fragment, without a root line.
pub fn outline_blocks(blocks: &[BlockSpec]) -> String {
    let mut out = String::new();
    for block in blocks {
        write_block(&mut out, block, 0);
    }
    out
}

fn write_group(out: &mut String, attrs: &ListAttrs, blocks: &[BlockSpec], indent: usize) {
    let _ = writeln!(out, "{:indent$}{attrs}", "");
    for block in blocks {
        write_block(out, block, indent + 2);
    }
}

fn write_block(out: &mut String, block: &BlockSpec, indent: usize) {
    let content = &block.content;
    let _ = write!(out, "{:indent$}{}", "", content.kind);
    if content.has_inline_content() {
        let _ = write!(out, " {:?}", content.text());
    }
    if let Some(id) = &block.id {
        let _ = write!(out, " #{id}");
    }
    out.push('\n');
    if let Some(GroupSpec { attrs, blocks }) = &block.children {
        write_group(out, attrs, blocks, indent + 2);
    }
}
