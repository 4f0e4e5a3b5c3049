//! cangjie_scanner: Lexer for Cangjie source code.
//!
//! Produces tokens on demand from a borrowed UTF-8 buffer, with support for:
//! - Line, multi-line and raw strings with `${...}` interpolation holes
//! - Decimal, hex, binary and octal numbers with width suffixes
//! - Rune, byte and byte-string literals
//! - Nested block comments and Unicode identifiers

mod char_codes;
mod error;
mod scanner;
mod token;

pub use error::LexError;
pub use scanner::{LexerMode, Scanner, ScannerState};
pub use token::TokenInfo;
