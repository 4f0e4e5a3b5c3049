//! Mapping from operator tokens to operators.
//!
//! The binding strength of each operator lives on the operator itself
//! (`BinaryOperator::precedence`); this module only decides which token
//! spells which operator.

use cangjie_ast::operator::{AssignOperator, BinaryOperator};
use cangjie_ast::syntax_kind::SyntaxKind;

/// The binary operator a token spells, if any. `as`, `is` and the range
/// tokens are handled by the parser directly since their right side is not
/// an ordinary operand.
pub fn binary_operator(kind: SyntaxKind) -> Option<BinaryOperator> {
    let op = match kind {
        SyntaxKind::BarGreaterThanToken => BinaryOperator::Pipeline,
        SyntaxKind::TildeGreaterThanToken => BinaryOperator::Compose,
        SyntaxKind::QuestionQuestionToken => BinaryOperator::Coalesce,
        SyntaxKind::BarBarToken => BinaryOperator::Or,
        SyntaxKind::AmpersandAmpersandToken => BinaryOperator::And,
        SyntaxKind::BarToken => BinaryOperator::BitOr,
        SyntaxKind::CaretToken => BinaryOperator::BitXor,
        SyntaxKind::AmpersandToken => BinaryOperator::BitAnd,
        SyntaxKind::EqualsEqualsToken => BinaryOperator::Equal,
        SyntaxKind::ExclamationEqualsToken => BinaryOperator::NotEqual,
        SyntaxKind::LessThanToken => BinaryOperator::Less,
        SyntaxKind::LessThanEqualsToken => BinaryOperator::LessEqual,
        SyntaxKind::GreaterThanToken => BinaryOperator::Greater,
        SyntaxKind::GreaterThanEqualsToken => BinaryOperator::GreaterEqual,
        SyntaxKind::LessThanLessThanToken => BinaryOperator::ShiftLeft,
        SyntaxKind::GreaterThanGreaterThanToken => BinaryOperator::ShiftRight,
        SyntaxKind::PlusToken => BinaryOperator::Add,
        SyntaxKind::MinusToken => BinaryOperator::Subtract,
        SyntaxKind::AsteriskToken => BinaryOperator::Multiply,
        SyntaxKind::SlashToken => BinaryOperator::Divide,
        SyntaxKind::PercentToken => BinaryOperator::Remainder,
        SyntaxKind::AsteriskAsteriskToken => BinaryOperator::Power,
        _ => return None,
    };
    Some(op)
}

pub fn assign_operator(kind: SyntaxKind) -> Option<AssignOperator> {
    let op = match kind {
        SyntaxKind::EqualsToken => AssignOperator::Assign,
        SyntaxKind::PlusEqualsToken => AssignOperator::Add,
        SyntaxKind::MinusEqualsToken => AssignOperator::Subtract,
        SyntaxKind::AsteriskEqualsToken => AssignOperator::Multiply,
        SyntaxKind::AsteriskAsteriskEqualsToken => AssignOperator::Power,
        SyntaxKind::SlashEqualsToken => AssignOperator::Divide,
        SyntaxKind::PercentEqualsToken => AssignOperator::Remainder,
        SyntaxKind::AmpersandEqualsToken => AssignOperator::BitAnd,
        SyntaxKind::CaretEqualsToken => AssignOperator::BitXor,
        SyntaxKind::BarEqualsToken => AssignOperator::BitOr,
        SyntaxKind::AmpersandAmpersandEqualsToken => AssignOperator::And,
        SyntaxKind::BarBarEqualsToken => AssignOperator::Or,
        SyntaxKind::LessThanLessThanEqualsToken => AssignOperator::ShiftLeft,
        SyntaxKind::GreaterThanGreaterThanEqualsToken => AssignOperator::ShiftRight,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cangjie_ast::operator::OperatorPrecedence;

    #[test]
    fn every_binary_operator_has_a_token() {
        let kinds = [
            SyntaxKind::BarGreaterThanToken,
            SyntaxKind::TildeGreaterThanToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarToken,
            SyntaxKind::CaretToken,
            SyntaxKind::AmpersandToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::LessThanToken,
            SyntaxKind::LessThanEqualsToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanEqualsToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::PlusToken,
            SyntaxKind::MinusToken,
            SyntaxKind::AsteriskToken,
            SyntaxKind::SlashToken,
            SyntaxKind::PercentToken,
            SyntaxKind::AsteriskAsteriskToken,
        ];
        let ops: Vec<_> = kinds.iter().filter_map(|k| binary_operator(*k)).collect();
        assert_eq!(ops, BinaryOperator::ALL.to_vec());
    }

    #[test]
    fn shift_assign_is_not_flow() {
        assert_eq!(
            assign_operator(SyntaxKind::GreaterThanGreaterThanEqualsToken),
            Some(AssignOperator::ShiftRight)
        );
        assert_eq!(
            binary_operator(SyntaxKind::BarGreaterThanToken).map(|op| op.precedence()),
            Some(OperatorPrecedence::Flow)
        );
        assert_eq!(binary_operator(SyntaxKind::EqualsToken), None);
    }

    #[test]
    fn every_assignment_token_maps() {
        let mut raw = SyntaxKind::FIRST_ASSIGNMENT as u16;
        let mut count = 0;
        for kind in [
            SyntaxKind::EqualsToken,
            SyntaxKind::PlusEqualsToken,
            SyntaxKind::MinusEqualsToken,
            SyntaxKind::AsteriskEqualsToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
            SyntaxKind::SlashEqualsToken,
            SyntaxKind::PercentEqualsToken,
            SyntaxKind::AmpersandEqualsToken,
            SyntaxKind::CaretEqualsToken,
            SyntaxKind::BarEqualsToken,
            SyntaxKind::AmpersandAmpersandEqualsToken,
            SyntaxKind::BarBarEqualsToken,
            SyntaxKind::LessThanLessThanEqualsToken,
            SyntaxKind::GreaterThanGreaterThanEqualsToken,
        ] {
            assert_eq!(kind as u16, raw);
            assert!(assign_operator(kind).is_some());
            raw += 1;
            count += 1;
        }
        assert_eq!(count, 14);
    }
}
