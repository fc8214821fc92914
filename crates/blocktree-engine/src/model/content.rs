use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The payload type of a content unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    #[default]
    Paragraph,
    Heading,
    CodeBlock,
    Image,
    Video,
    File,
    Embed,
    Math,
    Button,
}

impl ContentKind {
    /// Kinds holding editable inline text. Every other kind is an atom.
    #[must_use]
    pub fn has_inline_content(self) -> bool {
        matches!(
            self,
            ContentKind::Paragraph | ContentKind::Heading | ContentKind::CodeBlock
        )
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Paragraph => "paragraph",
            ContentKind::Heading => "heading",
            ContentKind::CodeBlock => "code-block",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::File => "file",
            ContentKind::Embed => "embed",
            ContentKind::Math => "math",
            ContentKind::Button => "button",
        };
        f.write_str(name)
    }
}

/// One run of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InlineNode {
    /// Text sharing one set of marks. Marks are carried, never interpreted.
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        marks: BTreeSet<String>,
    },
    /// Inline atom referencing another document or block.
    Mention { target: String },
}

impl InlineNode {
    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text {
            text: text.into(),
            marks: BTreeSet::new(),
        }
    }

    pub fn marked(text: impl Into<String>, marks: &[&str]) -> Self {
        InlineNode::Text {
            text: text.into(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Width in tree positions: one per character, one for an atom.
    pub fn size(&self) -> usize {
        match self {
            InlineNode::Text { text, .. } => text.chars().count(),
            InlineNode::Mention { .. } => 1,
        }
    }
}

/// The single leaf payload of a block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentUnit {
    pub kind: ContentKind,
    /// Non-identity attributes (heading level, code language, source url...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline: Vec<InlineNode>,
}

impl ContentUnit {
    /// An empty unit of `kind`; the placeholder used when a block needs content.
    pub fn empty(kind: ContentKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            inline: Vec::new(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::empty(ContentKind::Paragraph).with_text(text)
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::empty(ContentKind::Heading)
            .with_attr("level", level.to_string())
            .with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.inline.clear();
        if !text.is_empty() {
            self.inline.push(InlineNode::text(text));
        }
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: Vec<InlineNode>) -> Self {
        self.inline = inline;
        normalize_runs(&mut self.inline);
        self
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn has_inline_content(&self) -> bool {
        self.kind.has_inline_content()
    }

    pub fn inline_size(&self) -> usize {
        self.inline.iter().map(InlineNode::size).sum()
    }

    /// Width of the unit including its own boundary tokens.
    pub fn node_size(&self) -> usize {
        if self.has_inline_content() {
            self.inline_size() + 2
        } else {
            1
        }
    }

    /// Plain text with mentions shown as `@target`.
    pub fn text(&self) -> String {
        self.inline
            .iter()
            .map(|node| match node {
                InlineNode::Text { text, .. } => text.clone(),
                InlineNode::Mention { target } => format!("@{target}"),
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        self.has_inline_content() && self.inline.is_empty()
    }

    /// Removes and returns everything from inline `offset` onward.
    pub(crate) fn split_off(&mut self, offset: usize) -> Vec<InlineNode> {
        let mut remaining = offset;
        let mut index = 0;
        while index < self.inline.len() && remaining > 0 {
            let size = self.inline[index].size();
            if remaining >= size {
                remaining -= size;
                index += 1;
                continue;
            }
            if let InlineNode::Text { text, marks } = &mut self.inline[index] {
                let byte = text
                    .char_indices()
                    .nth(remaining)
                    .map_or(text.len(), |(byte, _)| byte);
                let tail = InlineNode::Text {
                    text: text.split_off(byte),
                    marks: marks.clone(),
                };
                index += 1;
                self.inline.insert(index, tail);
            }
            break;
        }
        let tail = self.inline.split_off(index);
        normalize_runs(&mut self.inline);
        tail
    }

    pub(crate) fn append_inline(&mut self, tail: Vec<InlineNode>) {
        self.inline.extend(tail);
        normalize_runs(&mut self.inline);
    }
}

/// Drops empty text runs and joins neighbours sharing the same marks.
fn normalize_runs(nodes: &mut Vec<InlineNode>) {
    let mut out: Vec<InlineNode> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            InlineNode::Text { ref text, .. } if text.is_empty() => {}
            InlineNode::Text { text, marks } => match out.last_mut() {
                Some(InlineNode::Text {
                    text: prev,
                    marks: prev_marks,
                }) if *prev_marks == marks => prev.push_str(&text),
                _ => out.push(InlineNode::Text { text, marks }),
            },
            other => out.push(other),
        }
    }
    *nodes = out;
}
