//! Operators and their binding strength.
//!
//! The numeric precedence of each level is stored on every binary and
//! unary node, so a printer can decide where parentheses are required
//! without re-deriving the table.

use std::fmt;

/// Binding strength, lowest first. A larger value binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    Assignment = 1,
    Flow = 4,
    Coalescing = 5,
    LogicalOr = 6,
    LogicalAnd = 7,
    BitwiseOr = 8,
    BitwiseXor = 9,
    BitwiseAnd = 10,
    Equality = 11,
    Cast = 13,
    TypeCheck = 14,
    Relational = 15,
    Range = 16,
    Shift = 17,
    Additive = 18,
    Multiplicative = 19,
    Exponentiation = 20,
    Negation = 21,
    Not = 22,
    Postfix = 24,
    Member = 28,
}

impl OperatorPrecedence {
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Associativity of a binary level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `|>`
    Pipeline,
    /// `~>`
    Compose,
    /// `??`
    Coalesce,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 22] = [
        BinaryOperator::Pipeline,
        BinaryOperator::Compose,
        BinaryOperator::Coalesce,
        BinaryOperator::Or,
        BinaryOperator::And,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::BitAnd,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::Less,
        BinaryOperator::LessEqual,
        BinaryOperator::Greater,
        BinaryOperator::GreaterEqual,
        BinaryOperator::ShiftLeft,
        BinaryOperator::ShiftRight,
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Remainder,
        BinaryOperator::Power,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Pipeline => "|>",
            BinaryOperator::Compose => "~>",
            BinaryOperator::Coalesce => "??",
            BinaryOperator::Or => "||",
            BinaryOperator::And => "&&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Power => "**",
        }
    }

    pub fn precedence(self) -> OperatorPrecedence {
        match self {
            BinaryOperator::Pipeline | BinaryOperator::Compose => OperatorPrecedence::Flow,
            BinaryOperator::Coalesce => OperatorPrecedence::Coalescing,
            BinaryOperator::Or => OperatorPrecedence::LogicalOr,
            BinaryOperator::And => OperatorPrecedence::LogicalAnd,
            BinaryOperator::BitOr => OperatorPrecedence::BitwiseOr,
            BinaryOperator::BitXor => OperatorPrecedence::BitwiseXor,
            BinaryOperator::BitAnd => OperatorPrecedence::BitwiseAnd,
            BinaryOperator::Equal | BinaryOperator::NotEqual => OperatorPrecedence::Equality,
            BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => OperatorPrecedence::Relational,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => OperatorPrecedence::Shift,
            BinaryOperator::Add | BinaryOperator::Subtract => OperatorPrecedence::Additive,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Remainder => {
                OperatorPrecedence::Multiplicative
            }
            BinaryOperator::Power => OperatorPrecedence::Exponentiation,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            BinaryOperator::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Not => "!",
        }
    }

    pub fn precedence(self) -> OperatorPrecedence {
        match self {
            UnaryOperator::Negate => OperatorPrecedence::Negation,
            UnaryOperator::Not => OperatorPrecedence::Not,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

impl PostfixOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOperator {
    Assign,
    Add,
    Subtract,
    Multiply,
    Power,
    Divide,
    Remainder,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
    ShiftLeft,
    ShiftRight,
}

impl AssignOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOperator::Assign => "=",
            AssignOperator::Add => "+=",
            AssignOperator::Subtract => "-=",
            AssignOperator::Multiply => "*=",
            AssignOperator::Power => "**=",
            AssignOperator::Divide => "/=",
            AssignOperator::Remainder => "%=",
            AssignOperator::BitAnd => "&=",
            AssignOperator::BitXor => "^=",
            AssignOperator::BitOr => "|=",
            AssignOperator::And => "&&=",
            AssignOperator::Or => "||=",
            AssignOperator::ShiftLeft => "<<=",
            AssignOperator::ShiftRight => ">>=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_follow_the_table() {
        use OperatorPrecedence::*;
        let ordered = [
            Assignment, Flow, Coalescing, LogicalOr, LogicalAnd, BitwiseOr, BitwiseXor,
            BitwiseAnd, Equality, Cast, TypeCheck, Relational, Range, Shift, Additive,
            Multiplicative, Exponentiation, Negation, Not, Postfix, Member,
        ];
        assert!(ordered.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Exponentiation.value(), 20);
        assert_eq!(Member.value(), 28);
    }

    #[test]
    fn only_power_is_right_associative() {
        for op in BinaryOperator::ALL {
            let expected = if op == BinaryOperator::Power {
                Associativity::Right
            } else {
                Associativity::Left
            };
            assert_eq!(op.associativity(), expected, "{op}");
        }
    }
}
