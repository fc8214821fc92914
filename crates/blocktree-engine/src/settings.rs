use serde::{Deserialize, Serialize};

use crate::fragment::Schema;
use crate::model::ContentKind;

/// Engine behavior a host can tune, usually loaded from the user's config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Run the deferred bulleted-level pass after nesting and conversion.
    pub relevel_on_indent: bool,
    /// Splitting with the cursor at the very start of a block keeps the
    /// block's kind and attributes on both halves.
    pub keep_type_at_block_start: bool,
    /// Content kind of placeholder blocks created while normalizing pastes.
    pub placeholder: ContentKind,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            relevel_on_indent: true,
            keep_type_at_block_start: true,
            placeholder: ContentKind::Paragraph,
        }
    }
}

impl EditorSettings {
    pub fn schema(&self) -> Schema {
        Schema {
            placeholder: self.placeholder,
        }
    }
}
