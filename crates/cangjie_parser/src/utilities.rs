//! Parser utility functions.

use cangjie_ast::syntax_kind::SyntaxKind;

use crate::precedence::binary_operator;

/// Check if a token kind can start an expression.
pub fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_literal()
        || kind.is_string_start()
        || kind.is_identifier()
        || matches!(
            kind,
            SyntaxKind::DollarIdentifier
                | SyntaxKind::ThisKeyword
                | SyntaxKind::SuperKeyword
                | SyntaxKind::IfKeyword
                | SyntaxKind::MatchKeyword
                | SyntaxKind::ForKeyword
                | SyntaxKind::WhileKeyword
                | SyntaxKind::DoKeyword
                | SyntaxKind::TryKeyword
                | SyntaxKind::ThrowKeyword
                | SyntaxKind::ReturnKeyword
                | SyntaxKind::BreakKeyword
                | SyntaxKind::ContinueKeyword
                | SyntaxKind::SpawnKeyword
                | SyntaxKind::SynchronizedKeyword
                | SyntaxKind::UnsafeKeyword
                | SyntaxKind::QuoteKeyword
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::MinusToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::UnderscoreToken
                | SyntaxKind::AtToken
                | SyntaxKind::QuestionToken
        )
}

/// Check if a keyword token begins a declaration wherever it appears.
pub fn is_declaration_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::FuncKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::ExtendKeyword
            | SyntaxKind::ForeignKeyword
            | SyntaxKind::MacroKeyword
            | SyntaxKind::MainKeyword
            | SyntaxKind::PackageKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::FromKeyword
            | SyntaxKind::PropKeyword
            | SyntaxKind::InitKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::OperatorKeyword
    )
}

/// Tokens an error placeholder must leave in place so the enclosing
/// production can use them.
pub fn is_recovery_anchor(kind: SyntaxKind) -> bool {
    kind.is_closer_or_separator()
        || kind.is_assignment_operator()
        || is_declaration_keyword(kind)
        || matches!(
            kind,
            SyntaxKind::CaseKeyword
                | SyntaxKind::CatchKeyword
                | SyntaxKind::FinallyKeyword
                | SyntaxKind::ElseKeyword
                | SyntaxKind::WhereKeyword
                | SyntaxKind::InKeyword
                | SyntaxKind::LessThanMinusToken
                | SyntaxKind::StringEnd
        )
}

/// Whether the token after a closing `>` lets a tentative type-argument list
/// stand. `adjacent` is true when the token touches the `>`.
pub fn can_follow_type_arguments(kind: SyntaxKind, line_break: bool, adjacent: bool) -> bool {
    if line_break {
        return true;
    }
    match kind {
        SyntaxKind::OpenParenToken
        | SyntaxKind::DotToken
        | SyntaxKind::QuestionToken
        | SyntaxKind::OpenBraceToken
        | SyntaxKind::AsKeyword
        | SyntaxKind::IsKeyword
        | SyntaxKind::DotDotToken
        | SyntaxKind::DotDotEqualsToken => true,
        // `a<b>=c` and `a<b>>c` are comparisons and shifts.
        SyntaxKind::GreaterThanToken | SyntaxKind::EqualsToken | SyntaxKind::EqualsEqualsToken
            if adjacent =>
        {
            false
        }
        SyntaxKind::MinusToken => false,
        _ => kind.is_closer_or_separator() || binary_operator(kind).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_starts() {
        assert!(can_start_expression(SyntaxKind::IntegerLiteral));
        assert!(can_start_expression(SyntaxKind::StringStart));
        assert!(can_start_expression(SyntaxKind::QuoteKeyword));
        assert!(!can_start_expression(SyntaxKind::CloseBraceToken));
        assert!(!can_start_expression(SyntaxKind::FuncKeyword));
    }

    #[test]
    fn type_argument_followers() {
        assert!(can_follow_type_arguments(SyntaxKind::OpenParenToken, false, true));
        assert!(can_follow_type_arguments(SyntaxKind::CommaToken, false, false));
        assert!(can_follow_type_arguments(SyntaxKind::Identifier, true, false));
        assert!(!can_follow_type_arguments(SyntaxKind::Identifier, false, false));
        assert!(!can_follow_type_arguments(SyntaxKind::EqualsToken, false, true));
        assert!(!can_follow_type_arguments(SyntaxKind::GreaterThanToken, false, true));
        assert!(can_follow_type_arguments(SyntaxKind::PlusToken, false, false));
        assert!(!can_follow_type_arguments(SyntaxKind::MinusToken, false, false));
    }
}
