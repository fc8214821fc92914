//! # Structural editing
//!
//! Every operation takes a document revision and a tree position and either
//! returns an [`Edit`] or an [`EditError`] explaining why it did not apply.
//!
//! ## Transactions
//!
//! Operations work on a private copy of the document. Nothing is visible to
//! the caller until the copy is committed, which checks the structural
//! invariants, compacts the arena and bumps the revision. A failure at any
//! point leaves the input untouched.
//!
//! ## Two-phase edits
//!
//! Some behaviors need a second structural step that only makes sense once
//! the first one has been applied by the host (releveling bulleted lists
//! after a nest, converting a group after sinking a block into it). Such an
//! edit carries a [`Deferred`] command keyed to the revision it produced;
//! [`CommandQueue`] runs it on its next tick unless another edit got there
//! first.
//!
//! ## Module structure
//!
//! - **`split`**: splitting a block in two, and into its own section
//! - **`merge`**: joining a block onto the one above, or pulling the next one in
//! - **`nest`**: indenting and outdenting blocks
//! - **`group`**: changing the list type of a child group and releveling
//! - **`blocks`**: deleting and appending whole blocks
//! - **`commands`**: the [`Command`] enum and the host-side [`CommandQueue`]

mod blocks;
mod commands;
mod group;
mod merge;
mod nest;
mod split;

pub use blocks::{append_block, delete_block};
pub use commands::{Command, CommandQueue, Dispatch, Step};
pub use group::{ConvertOptions, relevel_children, update_group_type};
pub use merge::{merge, merge_forward};
pub use nest::{can_nest, can_unnest, nest, unnest};
pub use split::{SplitOptions, split, split_into_section};

use crate::error::EditError;
use crate::model::{BlockIx, Document};
use crate::position::{BlockInfo, locate};

/// When a deferred command may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once the host has applied the edit producing this revision, and
    /// only while the document is still at it.
    Revision(u64),
}

/// The second phase of a two-phase edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Deferred {
    pub command: Command,
    pub trigger: Trigger,
}

/// Result of a successful operation.
#[derive(Debug, Clone)]
pub struct Edit {
    /// The new revision, or the input itself when nothing changed.
    pub doc: Document,
    /// Where the cursor should go.
    pub selection: Option<usize>,
    pub deferred: Option<Deferred>,
}

impl Edit {
    pub(crate) fn commit(tx: Document, selection: Option<usize>) -> Result<Self, EditError> {
        Ok(Self {
            doc: tx.commit()?,
            selection,
            deferred: None,
        })
    }

    pub(crate) fn unchanged(doc: &Document, pos: usize) -> Self {
        Self {
            doc: doc.clone(),
            selection: Some(pos),
            deferred: None,
        }
    }

    /// Attaches `command` to run after this edit is applied.
    #[must_use]
    pub(crate) fn then(mut self, command: Command) -> Self {
        self.deferred = Some(Deferred {
            command,
            trigger: Trigger::Revision(self.doc.revision()),
        });
        self
    }

    /// The block the cursor ended up in.
    pub fn focused_block(&self) -> Option<BlockInfo> {
        self.selection.and_then(|pos| locate(&self.doc, pos).ok())
    }
}

fn position_of(doc: &Document, block: BlockIx) -> Result<usize, EditError> {
    doc.position_of(block).ok_or_else(|| {
        EditError::InvalidGroupState(format!("{block:?} is detached from the tree"))
    })
}
