pub mod classify;
pub mod editing;
pub mod error;
pub mod fragment;
pub mod model;
pub mod position;
pub mod settings;
pub mod snapshot;

// Re-export key types for easier usage
pub use editing::{Command, CommandQueue, Dispatch, Edit, Step};
pub use error::EditError;
pub use fragment::{Fragment, FragmentNode, Schema, normalize};
pub use model::{
    BlockId, BlockSpec, ContentKind, ContentUnit, Document, GroupSpec, ListAttrs, ListLevel,
    ListType,
};
pub use settings::EditorSettings;
