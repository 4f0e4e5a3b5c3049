//! cangjie_ast: Syntax tree definitions for the Cangjie front-end.
//!
//! Defines the token kinds, the flag types, the operator table and the
//! arena-backed expression/type/pattern/declaration nodes produced by the
//! parser, plus an S-expression dumper for inspecting them.

pub mod dump;
pub mod node;
pub mod operator;
pub mod syntax_kind;
pub mod types;

// Re-export key types
pub use node::*;
pub use operator::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
