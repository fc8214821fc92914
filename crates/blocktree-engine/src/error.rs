use thiserror::Error;

/// Why an edit did not take effect.
///
/// Everything except [`EditError::InvalidGroupState`] is an expected outcome
/// of applying an edit in the wrong place: the host should fall back to its
/// default behavior. `InvalidGroupState` means the engine produced or was
/// handed a malformed tree and must not be swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("position {pos} is not inside any block (document size {size})")]
    PositionOutOfRange { pos: usize, size: usize },

    #[error("position {pos} is not inside a block's content")]
    NotABlock { pos: usize },

    #[error("block has no previous sibling")]
    NoPreviousSibling,

    #[error("block has no following block to merge")]
    NoNextBlock,

    #[error("block is already at the top level")]
    NotNested,

    #[error("only blocks with inline text can be merged")]
    CannotMergeMixedContent,

    #[error("invalid group state: {0}")]
    InvalidGroupState(String),
}

impl EditError {
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EditError::InvalidGroupState(_))
    }
}
