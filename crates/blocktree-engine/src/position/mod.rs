//! Position Resolver.
//!
//! A tree position counts boundary tokens in document order. Groups and
//! blocks each contribute an opening and a closing token, a text content
//! unit contributes its two tokens plus one per character, and an atom
//! content unit (image, embed...) is a single token. Position `0` sits
//! before the root group and `1` is its first interior slot:
//!
//! ```text
//!  0 <group> 1 <block> 2 <paragraph> 3 F 4 i 5 r ...
//! ```

mod block_info;
mod resolve;

pub use block_info::{BlockInfo, NodeBounds, locate, locate_resolved};
pub use resolve::{Container, Frame, ResolvedPos, resolve};
