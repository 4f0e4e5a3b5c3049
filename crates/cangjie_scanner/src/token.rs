//! Token information produced by the scanner.

use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_ast::types::TokenFlags;
use cangjie_core::text::TextSpan;

/// A scanned token. The span points into the borrowed source; `value`
/// carries the cooked payload for literals and identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    /// Identifier text, literal digits, or string content with escapes
    /// processed.
    pub value: String,
    /// Width suffix of a numeric literal.
    pub suffix: Option<&'static str>,
    pub flags: TokenFlags,
}
