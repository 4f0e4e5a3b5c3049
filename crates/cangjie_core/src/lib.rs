//! cangjie_core: Core utilities for the Cangjie parser.
//!
//! Provides text spans, string interning and the typed index arena
//! used by every other crate in the front-end.

pub mod arena;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::{Arena, ArenaId};
pub use intern::{InternedString, StringInterner};
pub use text::TextSpan;
