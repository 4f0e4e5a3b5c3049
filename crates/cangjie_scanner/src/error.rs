//! Lexical errors.
//!
//! A lexical error ends the current token only. The scanner records it as a
//! `Lex` diagnostic and resumes after the offending text.

use cangjie_core::text::TextSpan;
use cangjie_diagnostics::{Diagnostic, DiagnosticKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string literal.")]
    UnterminatedString,
    #[error("Unterminated rune or byte literal.")]
    UnterminatedCharLiteral,
    #[error("Unterminated raw string literal; expected '{quote}' followed by {fence} '#'.")]
    UnterminatedRawString { quote: char, fence: u32 },
    #[error("Raw string opened with {expected} '#' cannot be closed with {found}.")]
    RawStringFenceMismatch { expected: u32, found: u32 },
    #[error("Unterminated block comment.")]
    UnterminatedComment,
    #[error("Unterminated interpolation; '}}' expected.")]
    UnterminatedInterpolation,
    #[error("Unterminated raw identifier.")]
    UnterminatedRawIdentifier,
    #[error("Invalid escape sequence '\\{0}'.")]
    InvalidEscape(char),
    #[error("Invalid unicode escape; expected '\\u{{' followed by 1 to {0} hex digits and '}}'.")]
    InvalidUnicodeEscape(u32),
    #[error("'{0:#x}' is not a valid unicode scalar value.")]
    InvalidCodePoint(u32),
    #[error("Only ASCII characters are allowed in byte literals.")]
    NonAsciiByte,
    #[error("A rune or byte literal must contain exactly one character.")]
    CharLiteralLength,
    #[error("Invalid character '{0}'.")]
    InvalidCharacter(char),
    #[error("Digit expected.")]
    DigitExpected,
    #[error("Invalid numeric suffix '{0}'.")]
    InvalidSuffix(String),
    #[error("Source is not valid UTF-8.")]
    InvalidUtf8,
}

impl LexError {
    /// Stable diagnostic code.
    pub fn code(&self) -> u32 {
        match self {
            LexError::UnterminatedString => 1001,
            LexError::UnterminatedCharLiteral => 1002,
            LexError::UnterminatedRawString { .. } => 1003,
            LexError::RawStringFenceMismatch { .. } => 1004,
            LexError::UnterminatedComment => 1005,
            LexError::UnterminatedInterpolation => 1006,
            LexError::UnterminatedRawIdentifier => 1007,
            LexError::InvalidEscape(_) => 1008,
            LexError::InvalidUnicodeEscape(_) => 1009,
            LexError::InvalidCodePoint(_) => 1010,
            LexError::NonAsciiByte => 1011,
            LexError::CharLiteralLength => 1012,
            LexError::InvalidCharacter(_) => 1013,
            LexError::DigitExpected => 1014,
            LexError::InvalidSuffix(_) => 1015,
            LexError::InvalidUtf8 => 1016,
        }
    }

    pub fn into_diagnostic(self, span: TextSpan) -> Diagnostic {
        Diagnostic::from_error(span, self.code(), DiagnosticKind::Lex, &self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_codes() {
        let err = LexError::RawStringFenceMismatch {
            expected: 2,
            found: 1,
        };
        assert_eq!(err.code(), 1004);
        assert_eq!(
            err.to_string(),
            "Raw string opened with 2 '#' cannot be closed with 1."
        );
        let diag = err.into_diagnostic(TextSpan::new(4, 2));
        assert_eq!(diag.kind, DiagnosticKind::Lex);
        assert!(diag.is_fatal());
    }

    #[test]
    fn braces_render_literally() {
        assert_eq!(
            LexError::UnterminatedInterpolation.to_string(),
            "Unterminated interpolation; '}' expected."
        );
        assert_eq!(
            LexError::InvalidUnicodeEscape(8).to_string(),
            "Invalid unicode escape; expected '\\u{' followed by 1 to 8 hex digits and '}'."
        );
    }
}
