//! Read-only views of a document: the outline renderer used by tests and
//! logs, and the structural invariant checker run on every commit.

pub mod invariants;
mod outline;

pub use outline::{outline, outline_blocks};
