//! Expressions: the precedence cascade, primaries and control flow.

use cangjie_ast::node::*;
use cangjie_ast::operator::{Associativity, OperatorPrecedence, PostfixOperator, UnaryOperator};
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::messages;

use crate::parser::{Parser, Speculation};
use crate::patterns::PatternContext;
use crate::precedence::{assign_operator, binary_operator};
use crate::utilities::can_start_expression;

impl<'src> Parser<'src> {
    // ========================================================================
    // Assignment
    // ========================================================================

    /// An expression in statement position, where assignment is allowed.
    pub(crate) fn parse_expression_statement(&mut self) -> ExprId {
        let start = self.start();
        let target = self.parse_binary(OperatorPrecedence::Lowest.value());
        let Some(op) = assign_operator(self.operator_token()) else {
            return target;
        };
        self.next_token();
        if !self.is_assignable(target) {
            let span = self.arena.expr(target).span;
            self.error_at(span, &messages::INVALID_ASSIGNMENT_TARGET, &[]);
        }
        let value = self.parse_expression_statement();
        self.arena
            .alloc_expr(ExprKind::Assign { op, target, value }, self.span_from(start))
    }

    /// An expression in value position. An assignment here is reported but
    /// still built.
    pub(crate) fn parse_expr(&mut self) -> ExprId {
        let start = self.start();
        let target = self.parse_binary(OperatorPrecedence::Lowest.value());
        let Some(op) = assign_operator(self.operator_token()) else {
            return target;
        };
        let span = self.scanner.token_span();
        self.error_at(span, &messages::ASSIGNMENT_ONLY_AS_STATEMENT, &[]);
        self.next_token();
        let value = self.parse_expr();
        self.arena
            .alloc_expr(ExprKind::Assign { op, target, value }, self.span_from(start))
    }

    fn is_assignable(&self, id: ExprId) -> bool {
        match &self.arena.expr(id).kind {
            ExprKind::Tuple(items) => items.iter().all(|item| self.is_assignable(*item)),
            ExprKind::Parenthesized(inner) => self.is_assignable(*inner),
            kind => kind.is_assignable(),
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Parse operators binding tighter than `min`.
    pub(crate) fn parse_binary(&mut self, min: u8) -> ExprId {
        self.nested(|p, span| p.error_expr(span), |p| p.parse_binary_rest(min))
    }

    fn parse_binary_rest(&mut self, min: u8) -> ExprId {
        let start = self.start();
        let mut lhs = self.parse_unary();
        loop {
            let kind = self.operator_token();
            match kind {
                SyntaxKind::AsKeyword | SyntaxKind::IsKeyword => {
                    let level = if kind == SyntaxKind::AsKeyword {
                        OperatorPrecedence::Cast
                    } else {
                        OperatorPrecedence::TypeCheck
                    };
                    if level.value() <= min {
                        break;
                    }
                    self.next_token();
                    let ty = self.parse_type_operand();
                    let node = if kind == SyntaxKind::AsKeyword {
                        ExprKind::TypeCast { expr: lhs, ty }
                    } else {
                        ExprKind::TypeCheck { expr: lhs, ty }
                    };
                    lhs = self.arena.alloc_expr(node, self.span_from(start));
                }
                SyntaxKind::DotDotToken | SyntaxKind::DotDotEqualsToken => {
                    if OperatorPrecedence::Range.value() <= min {
                        break;
                    }
                    lhs = self.parse_range_tail(Some(lhs), start);
                }
                _ => {
                    let Some(op) = binary_operator(kind) else {
                        break;
                    };
                    let level = op.precedence().value();
                    if level <= min {
                        break;
                    }
                    // A `-` opening a line starts a new statement.
                    if kind == SyntaxKind::MinusToken && self.line_break_before() {
                        break;
                    }
                    self.next_token();
                    let rhs_min = match op.associativity() {
                        Associativity::Left => level,
                        Associativity::Right => level - 1,
                    };
                    let rhs = self.parse_binary(rhs_min);
                    lhs = self.arena.alloc_expr(
                        ExprKind::Binary {
                            op,
                            lhs,
                            rhs,
                            precedence: op.precedence(),
                        },
                        self.span_from(start),
                    );
                }
            }
        }
        lhs
    }

    /// `..` or `..=`, an optional end and an optional `: step`.
    pub(crate) fn parse_range_tail(&mut self, lower: Option<ExprId>, start: u32) -> ExprId {
        let inclusive = self.token() == SyntaxKind::DotDotEqualsToken;
        self.next_token();
        let end = if can_start_expression(self.token()) {
            Some(self.parse_binary(OperatorPrecedence::Range.value()))
        } else {
            None
        };
        let step = if self.optional(SyntaxKind::ColonToken) {
            Some(self.parse_binary(OperatorPrecedence::Range.value()))
        } else {
            None
        };
        self.arena.alloc_expr(
            ExprKind::Range {
                start: lower,
                end,
                inclusive,
                step,
            },
            self.span_from(start),
        )
    }

    pub(crate) fn parse_unary(&mut self) -> ExprId {
        let op = match self.token() {
            SyntaxKind::MinusToken => UnaryOperator::Negate,
            SyntaxKind::ExclamationToken => UnaryOperator::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.start();
        self.next_token();
        let operand = self.nested(|p, span| p.error_expr(span), |p| p.parse_unary());
        self.arena.alloc_expr(
            ExprKind::Unary {
                op,
                operand,
                precedence: op.precedence(),
            },
            self.span_from(start),
        )
    }

    fn parse_postfix(&mut self) -> ExprId {
        let start = self.start();
        let mut expr = self.parse_chain();
        loop {
            let op = match self.token() {
                SyntaxKind::PlusPlusToken => PostfixOperator::Increment,
                SyntaxKind::MinusMinusToken => PostfixOperator::Decrement,
                _ => break,
            };
            if self.line_break_before() {
                break;
            }
            self.next_token();
            expr = self
                .arena
                .alloc_expr(ExprKind::Postfix { op, operand: expr }, self.span_from(start));
        }
        expr
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    pub(crate) fn parse_primary(&mut self) -> ExprId {
        let start = self.start();
        match self.token() {
            kind if kind.is_literal() => self.parse_literal(),
            kind if kind.is_string_start() => self.parse_string(),
            kind if kind.is_identifier() => {
                let name = self.parse_name();
                let type_args = self.try_type_arguments();
                self.arena
                    .alloc_expr(ExprKind::Identifier { name, type_args }, self.span_from(start))
            }
            SyntaxKind::ThisKeyword => self.keyword_expr(ExprKind::This),
            SyntaxKind::SuperKeyword => self.keyword_expr(ExprKind::Super),
            SyntaxKind::UnderscoreToken => self.keyword_expr(ExprKind::Wildcard),
            SyntaxKind::BreakKeyword => self.keyword_expr(ExprKind::Break),
            SyntaxKind::ContinueKeyword => self.keyword_expr(ExprKind::Continue),
            SyntaxKind::OpenParenToken => self.parse_paren_expr(),
            SyntaxKind::OpenBracketToken => self.parse_array(),
            SyntaxKind::OpenBraceToken => self.parse_lambda(true),
            SyntaxKind::QuestionToken | SyntaxKind::QuestionQuestionToken => {
                let ty = self.parse_type();
                self.arena.alloc_expr(ExprKind::TypeExpr(ty), self.span_from(start))
            }
            SyntaxKind::IfKeyword => self.parse_if(),
            SyntaxKind::MatchKeyword => self.parse_match(),
            SyntaxKind::ForKeyword => self.parse_for(),
            SyntaxKind::WhileKeyword => self.parse_while(),
            SyntaxKind::DoKeyword => self.parse_do_while(),
            SyntaxKind::TryKeyword => self.parse_try(),
            SyntaxKind::ThrowKeyword => {
                self.next_token();
                let value = self.parse_expr();
                self.arena.alloc_expr(ExprKind::Throw(value), self.span_from(start))
            }
            SyntaxKind::ReturnKeyword => {
                self.next_token();
                let value = if !self.line_break_before() && can_start_expression(self.token()) {
                    Some(self.parse_expr())
                } else {
                    None
                };
                self.arena.alloc_expr(ExprKind::Return(value), self.span_from(start))
            }
            SyntaxKind::SpawnKeyword => self.parse_spawn(),
            SyntaxKind::SynchronizedKeyword => {
                self.next_token();
                self.expect(SyntaxKind::OpenParenToken);
                let lock = self.parse_expr();
                self.expect(SyntaxKind::CloseParenToken);
                let body = self.parse_block();
                self.arena
                    .alloc_expr(ExprKind::Synchronized { lock, body }, self.span_from(start))
            }
            SyntaxKind::UnsafeKeyword => {
                self.next_token();
                let body = self.parse_block();
                self.arena.alloc_expr(ExprKind::Unsafe(body), self.span_from(start))
            }
            SyntaxKind::QuoteKeyword => self.parse_quote(),
            SyntaxKind::AtToken => self.parse_macro_call(),
            SyntaxKind::DollarIdentifier => {
                let span = self.scanner.token_span();
                let text = format!("${}", self.token_value());
                self.error_at(span, &messages::UNEXPECTED_TOKEN_0, &[&text]);
                self.next_token();
                self.error_expr(span)
            }
            _ => self.expression_expected(),
        }
    }

    fn keyword_expr(&mut self, kind: ExprKind) -> ExprId {
        let span = self.scanner.token_span();
        self.next_token();
        self.arena.alloc_expr(kind, span)
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn parse_literal(&mut self) -> ExprId {
        let span = self.scanner.token_span();
        let value = self.token_value();
        let literal = match self.token() {
            SyntaxKind::IntegerLiteral => Literal::Integer(self.number_literal()),
            SyntaxKind::FloatLiteral => Literal::Float(self.number_literal()),
            SyntaxKind::RuneLiteral => Literal::Rune(value.chars().next().unwrap_or('\0')),
            SyntaxKind::ByteLiteral => Literal::Byte(
                value
                    .chars()
                    .next()
                    .and_then(|c| u8::try_from(c).ok())
                    .unwrap_or(0),
            ),
            SyntaxKind::ByteStringLiteral => {
                Literal::ByteString(value.chars().map(|c| u8::try_from(c).unwrap_or(0)).collect())
            }
            SyntaxKind::RawStringLiteral => {
                let fence = span
                    .slice(self.scanner.text())
                    .map_or(0, |text| text.bytes().take_while(|b| *b == b'#').count());
                Literal::RawString {
                    text: value.to_string(),
                    fence: fence as u32,
                }
            }
            SyntaxKind::TrueKeyword => Literal::Bool(true),
            _ => Literal::Bool(false),
        };
        self.next_token();
        self.arena.alloc_expr(ExprKind::Literal(literal), span)
    }

    fn number_literal(&self) -> NumberLiteral {
        NumberLiteral {
            digits: self.token_value().into(),
            suffix: self.scanner.token_suffix().map(Into::into),
        }
    }

    /// A string from its start token to its end token. Text runs between
    /// holes are merged.
    fn parse_string(&mut self) -> ExprId {
        let start = self.start();
        let multi_line = self.token() == SyntaxKind::MultiLineStringStart;
        self.next_token();
        let mut parts: Vec<StringPart> = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::StringContent => {
                    match parts.last_mut() {
                        Some(StringPart::Text(text)) => text.push_str(self.scanner.token_value()),
                        _ => parts.push(StringPart::Text(self.token_value().to_string())),
                    }
                    self.next_token();
                }
                SyntaxKind::InterpolationStart => {
                    let hole_start = self.start();
                    self.next_token();
                    let items = self.parse_items_until(|_| false);
                    if !self.optional(SyntaxKind::InterpolationEnd) && self.token() != SyntaxKind::EndOfFileToken {
                        self.error(&messages::_0_EXPECTED, &["}"]);
                    }
                    parts.push(StringPart::Interpolation(Block {
                        items,
                        span: self.span_from(hole_start),
                    }));
                }
                SyntaxKind::StringEnd => {
                    self.next_token();
                    break;
                }
                _ => break,
            }
        }
        self.arena.alloc_expr(
            ExprKind::Literal(Literal::String(StringLiteral { parts, multi_line })),
            self.span_from(start),
        )
    }

    // ========================================================================
    // Parenthesized forms
    // ========================================================================

    /// `()`, `(e)`, `(a, b)`, or the parameter list of a function type in
    /// value position. Elements are parsed once as expressions (or as
    /// labelled types) and reinterpreted as types only if `->` follows.
    fn parse_paren_expr(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        if self.optional(SyntaxKind::CloseParenToken) {
            if self.token() == SyntaxKind::MinusGreaterThanToken {
                return self.finish_function_type_expr(start, Vec::new());
            }
            return self.arena.alloc_expr(ExprKind::Unit, self.span_from(start));
        }

        let mut elements: Vec<(Option<Name>, ExprId)> = Vec::new();
        let mut trailing_comma = false;
        while self.token() != SyntaxKind::EndOfFileToken {
            let element_start = self.start();
            let label = if self.token().is_identifier() && self.peek() == SyntaxKind::ColonToken {
                let name = self.parse_name();
                self.next_token();
                Some(name)
            } else {
                None
            };
            let value = match label {
                Some(_) => {
                    let ty = self.parse_type();
                    self.arena.alloc_expr(ExprKind::TypeExpr(ty), self.span_from(element_start))
                }
                None => self.parse_expr(),
            };
            elements.push((label, value));
            trailing_comma = self.optional(SyntaxKind::CommaToken);
            if !trailing_comma || self.token() == SyntaxKind::CloseParenToken {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken);

        if self.token() == SyntaxKind::MinusGreaterThanToken {
            return self.finish_function_type_expr(start, elements);
        }
        if elements.iter().any(|(label, _)| label.is_some()) {
            let span = self.span_from(start);
            self.error_at(span, &messages::NAMED_ELEMENTS_REQUIRE_ARROW, &[]);
            let elements = self.elements_to_types(elements);
            let ty = self.arena.alloc_type(TypeKind::Tuple(elements), span);
            return self.arena.alloc_expr(ExprKind::TypeExpr(ty), span);
        }
        let kind = match elements.as_slice() {
            [(_, only)] if !trailing_comma => ExprKind::Parenthesized(*only),
            _ => ExprKind::Tuple(elements.into_iter().map(|(_, value)| value).collect()),
        };
        self.arena.alloc_expr(kind, self.span_from(start))
    }

    fn finish_function_type_expr(&mut self, start: u32, elements: Vec<(Option<Name>, ExprId)>) -> ExprId {
        self.next_token();
        let params = self.elements_to_types(elements);
        let ret = self.parse_type();
        let span = self.span_from(start);
        let ty = self.arena.alloc_type(TypeKind::Arrow { params, ret }, span);
        self.arena.alloc_expr(ExprKind::TypeExpr(ty), span)
    }

    fn elements_to_types(&mut self, elements: Vec<(Option<Name>, ExprId)>) -> Vec<TupleTypeElement> {
        let mut types = Vec::with_capacity(elements.len());
        for (label, value) in elements {
            let ty = self.expr_to_type(value);
            types.push(TupleTypeElement { label, ty });
        }
        types
    }

    /// `[a, *rest]`
    fn parse_array(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let items = self.parse_list(SyntaxKind::CloseBracketToken, |p| {
            if p.token() != SyntaxKind::AsteriskToken {
                return p.parse_expr();
            }
            let spread_start = p.start();
            p.next_token();
            let inner = p.parse_expr();
            p.arena.alloc_expr(ExprKind::Spread(inner), p.span_from(spread_start))
        });
        self.expect(SyntaxKind::CloseBracketToken);
        self.arena.alloc_expr(ExprKind::Array(items), self.span_from(start))
    }

    // ========================================================================
    // Lambdas
    // ========================================================================

    /// `{ params => items }`. A trailing lambda may leave out the arrow when
    /// it takes no parameters.
    pub(crate) fn parse_lambda(&mut self, require_arrow: bool) -> ExprId {
        let start = self.start();
        self.next_token();
        let params = match self.speculate(|p| p.parse_lambda_params()) {
            Speculation::Committed(params) => params,
            _ => {
                if require_arrow {
                    self.error(&messages::_0_EXPECTED, &["=>"]);
                }
                Vec::new()
            }
        };
        let items = self.parse_items_until(|_| false);
        self.expect(SyntaxKind::CloseBraceToken);
        let span = self.span_from(start);
        let body = Block { items, span };
        self.arena
            .alloc_expr(ExprKind::Lambda(Box::new(Lambda { params, body })), span)
    }

    fn parse_lambda_params(&mut self) -> Option<Vec<LambdaParam>> {
        let mut params = Vec::new();
        while self.token() != SyntaxKind::EqualsGreaterThanToken {
            let start = self.start();
            let name = match self.token() {
                SyntaxKind::UnderscoreToken => {
                    self.next_token();
                    None
                }
                kind if kind.is_identifier() => Some(self.parse_name()),
                _ => return None,
            };
            let ty = if self.optional(SyntaxKind::ColonToken) {
                Some(self.parse_type())
            } else {
                None
            };
            params.push(LambdaParam {
                name,
                ty,
                span: self.span_from(start),
            });
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.optional(SyntaxKind::EqualsGreaterThanToken).then_some(params)
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `cond` or `let pattern <- value`
    fn parse_condition(&mut self) -> Condition {
        if !self.optional(SyntaxKind::LetKeyword) {
            return Condition::Expr(self.parse_expr());
        }
        let pattern = self.parse_pattern(PatternContext::Match);
        self.expect(SyntaxKind::LessThanMinusToken);
        let value = self.parse_expr();
        Condition::Let { pattern, value }
    }

    fn parse_if(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_condition();
        self.expect(SyntaxKind::CloseParenToken);
        let then_block = self.parse_block();
        let else_branch = if self.optional(SyntaxKind::ElseKeyword) {
            if self.token() == SyntaxKind::IfKeyword {
                Some(self.parse_if())
            } else {
                let else_start = self.start();
                let block = self.parse_block();
                Some(self.arena.alloc_expr(ExprKind::Block(block), self.span_from(else_start)))
            }
        } else {
            None
        };
        self.arena.alloc_expr(
            ExprKind::If(Box::new(IfExpr {
                condition,
                then_block,
                else_branch,
            })),
            self.span_from(start),
        )
    }

    fn parse_match(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let selector = if self.optional(SyntaxKind::OpenParenToken) {
            let selector = self.parse_expr();
            self.expect(SyntaxKind::CloseParenToken);
            Some(selector)
        } else {
            None
        };
        self.expect(SyntaxKind::OpenBraceToken);
        let mut arms = Vec::new();
        let mut reported = false;
        while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            if self.token() != SyntaxKind::CaseKeyword {
                if !reported {
                    self.error(&messages::_0_EXPECTED, &["case"]);
                    reported = true;
                }
                self.next_token();
                continue;
            }
            reported = false;
            arms.push(self.parse_match_arm(selector.is_some()));
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.arena.alloc_expr(
            ExprKind::Match(Box::new(MatchExpr { selector, arms })),
            self.span_from(start),
        )
    }

    fn parse_match_arm(&mut self, has_selector: bool) -> MatchArm {
        let start = self.start();
        self.next_token();
        let case = if has_selector {
            MatchCase::Pattern(self.parse_pattern(PatternContext::Match))
        } else {
            MatchCase::Condition(self.parse_expr())
        };
        let guard = if self.optional(SyntaxKind::WhereKeyword) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(SyntaxKind::EqualsGreaterThanToken);
        let body_start = self.start();
        let items = self.parse_items_until(|kind| kind == SyntaxKind::CaseKeyword);
        MatchArm {
            case,
            guard,
            body: Block {
                items,
                span: self.span_from(body_start),
            },
            span: self.span_from(start),
        }
    }

    fn parse_for(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let pattern = self.parse_pattern(PatternContext::ForIn);
        self.expect(SyntaxKind::InKeyword);
        let iterable = self.parse_expr();
        let guard = if self.optional(SyntaxKind::WhereKeyword) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(SyntaxKind::CloseParenToken);
        let body = self.parse_block();
        self.arena.alloc_expr(
            ExprKind::For(Box::new(ForExpr {
                pattern,
                iterable,
                guard,
                body,
            })),
            self.span_from(start),
        )
    }

    fn parse_while(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_condition();
        self.expect(SyntaxKind::CloseParenToken);
        let body = self.parse_block();
        self.arena.alloc_expr(
            ExprKind::While(Box::new(WhileExpr { condition, body })),
            self.span_from(start),
        )
    }

    fn parse_do_while(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let body = self.parse_block();
        self.expect(SyntaxKind::WhileKeyword);
        self.expect(SyntaxKind::OpenParenToken);
        let condition = self.parse_expr();
        self.expect(SyntaxKind::CloseParenToken);
        self.arena
            .alloc_expr(ExprKind::DoWhile { body, condition }, self.span_from(start))
    }

    fn parse_try(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let resources = if self.optional(SyntaxKind::OpenParenToken) {
            let resources = self.parse_list(SyntaxKind::CloseParenToken, |p| {
                let name = p.parse_name();
                let ty = if p.optional(SyntaxKind::ColonToken) {
                    Some(p.parse_type())
                } else {
                    None
                };
                p.expect(SyntaxKind::EqualsToken);
                let value = p.parse_expr();
                TryResource { name, ty, value }
            });
            self.expect(SyntaxKind::CloseParenToken);
            resources
        } else {
            Vec::new()
        };
        let body = self.parse_block();

        let mut catches = Vec::new();
        while self.optional(SyntaxKind::CatchKeyword) {
            self.expect(SyntaxKind::OpenParenToken);
            let pattern = self.parse_pattern(PatternContext::Catch);
            self.expect(SyntaxKind::CloseParenToken);
            let body = self.parse_block();
            catches.push(CatchClause { pattern, body });
        }
        let finally = if self.optional(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block())
        } else {
            None
        };
        if resources.is_empty() && catches.is_empty() && finally.is_none() {
            self.error(&messages::_0_EXPECTED, &["catch"]);
        }
        self.arena.alloc_expr(
            ExprKind::Try(Box::new(TryExpr {
                resources,
                body,
                catches,
                finally,
            })),
            self.span_from(start),
        )
    }

    /// `spawn [(context)] { [=>] items }`
    fn parse_spawn(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let context = if self.optional(SyntaxKind::OpenParenToken) {
            let context = self.parse_expr();
            self.expect(SyntaxKind::CloseParenToken);
            Some(context)
        } else {
            None
        };
        let body_start = self.start();
        let items = if self.expect(SyntaxKind::OpenBraceToken) {
            self.optional(SyntaxKind::EqualsGreaterThanToken);
            let items = self.parse_items_until(|_| false);
            self.expect(SyntaxKind::CloseBraceToken);
            items
        } else {
            Vec::new()
        };
        let body = Block {
            items,
            span: self.span_from(body_start),
        };
        self.arena
            .alloc_expr(ExprKind::Spawn { context, body }, self.span_from(start))
    }

    // ========================================================================
    // Quote and macro calls
    // ========================================================================

    /// `quote(tokens)` with `$name` and `$(expr)` splices. A `\` escapes
    /// the token after it.
    fn parse_quote(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let mut parts = Vec::new();
        if self.expect(SyntaxKind::OpenParenToken) {
            let mut run: Option<u32> = None;
            let mut depth = 0u32;
            loop {
                match self.token() {
                    SyntaxKind::EndOfFileToken => break,
                    SyntaxKind::CloseParenToken if depth == 0 => break,
                    SyntaxKind::DollarIdentifier => {
                        self.flush_quote_run(&mut run, &mut parts);
                        let span = self.scanner.token_span();
                        let name = Name::new(self.intern(self.token_value()), span);
                        self.next_token();
                        let splice = self.arena.alloc_expr(
                            ExprKind::Identifier {
                                name,
                                type_args: Vec::new(),
                            },
                            span,
                        );
                        parts.push(QuotePart::Splice(splice));
                    }
                    SyntaxKind::DollarToken if self.peek() == SyntaxKind::OpenParenToken => {
                        self.flush_quote_run(&mut run, &mut parts);
                        self.next_token();
                        self.next_token();
                        let splice = self.parse_expr();
                        self.expect(SyntaxKind::CloseParenToken);
                        parts.push(QuotePart::Splice(splice));
                    }
                    kind => {
                        run.get_or_insert(self.start());
                        match kind {
                            SyntaxKind::OpenParenToken => depth += 1,
                            SyntaxKind::CloseParenToken => depth -= 1,
                            SyntaxKind::BackslashToken => {
                                self.next_token();
                            }
                            _ => {}
                        }
                        self.next_token();
                    }
                }
            }
            self.flush_quote_run(&mut run, &mut parts);
            self.expect(SyntaxKind::CloseParenToken);
        }
        self.arena.alloc_expr(ExprKind::Quote(parts), self.span_from(start))
    }

    fn flush_quote_run(&self, run: &mut Option<u32>, parts: &mut Vec<QuotePart>) {
        if let Some(run_start) = run.take() {
            parts.push(QuotePart::Tokens(TextSpan::from_bounds(run_start, self.prev_end)));
        }
    }

    /// `@Name[attributes](input)`
    pub(crate) fn parse_macro_call(&mut self) -> ExprId {
        let start = self.start();
        self.next_token();
        let name = self.parse_dotted_name();
        let attributes = if self.token() == SyntaxKind::OpenBracketToken && !self.line_break_before() {
            Some(self.parse_balanced(SyntaxKind::OpenBracketToken, SyntaxKind::CloseBracketToken))
        } else {
            None
        };
        let input = if self.token() == SyntaxKind::OpenParenToken {
            self.parse_balanced(SyntaxKind::OpenParenToken, SyntaxKind::CloseParenToken)
        } else {
            self.error(&messages::_0_EXPECTED, &["("]);
            TextSpan::empty(self.start())
        };
        self.arena.alloc_expr(
            ExprKind::MacroCall(Box::new(MacroCall {
                name,
                attributes,
                input,
            })),
            self.span_from(start),
        )
    }

    /// Skip a bracketed run and return the span strictly inside it.
    pub(crate) fn parse_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) -> TextSpan {
        let inner_start = self.scanner.token_end() as u32;
        self.next_token();
        let mut depth = 0u32;
        loop {
            let kind = self.token();
            if kind == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &[close.punctuation_text().unwrap_or(")")]);
                return TextSpan::from_bounds(inner_start, self.prev_end.max(inner_start));
            }
            if kind == close {
                if depth == 0 {
                    let span = TextSpan::from_bounds(inner_start, self.start());
                    self.next_token();
                    return span;
                }
                depth -= 1;
            } else if kind == open {
                depth += 1;
            }
            self.next_token();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parse_expression;
    use cangjie_ast::dump::Dumper;

    fn dump(source: &str) -> String {
        let parse = parse_expression(source.as_bytes(), 0, &ParseOptions::default());
        assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
        Dumper::for_tree(&parse.tree, source).expr(parse.expr)
    }

    #[test]
    fn unary_binds_tighter_than_power() {
        assert_eq!(dump("-2 ** 2"), "(** (- 2) 2)");
        assert_eq!(dump("!a && b"), "(&& (! a) b)");
    }

    #[test]
    fn casts_and_checks() {
        assert_eq!(dump("a + b as Int64"), "(as (+ a b) Int64)");
        assert_eq!(dump("a as Int64 + 1"), "(+ (as a Int64) 1)");
        assert_eq!(dump("x is String || y"), "(|| (is x String) y)");
    }

    #[test]
    fn ranges_with_step() {
        assert_eq!(dump("0..10 : 2"), "(.. 0 10 : 2)");
        assert_eq!(dump("a..=b + 1"), "(..= a (+ b 1))");
    }

    #[test]
    fn postfix_only_on_same_line() {
        assert_eq!(dump("i++"), "(post++ i)");
        let parse = parse_expression(b"i\n++j", 0, &ParseOptions::default());
        assert_eq!(parse.next_offset, 1);
    }

    #[test]
    fn compound_assignment_statement() {
        assert_eq!(dump("a >>= 2"), "(>>= a 2)");
        assert_eq!(dump("(a, _) = pair"), "(= (tuple a _) pair)");
    }

    #[test]
    fn interpolated_string_parts() {
        assert_eq!(dump(r#""a${x + 1}b""#), r#"(str "a" (block (+ x 1)) "b")"#);
        assert_eq!(dump(r#""plain""#), r#""plain""#);
    }

    #[test]
    fn quote_splices() {
        assert_eq!(dump("quote(a + $b * $(c))"), r#"(quote "a +" ($ b) "*" ($ c))"#);
    }

    #[test]
    fn macro_call_keeps_inner_text() {
        assert_eq!(dump("@Memo[cache](x + 1)"), "(@Memo [cache] (x + 1))");
    }

    #[test]
    fn control_flow_forms() {
        assert_eq!(
            dump("if (let Some(v) <- opt) { v } else { 0 }"),
            "(if (let Some(v) opt) (block v) (block 0))"
        );
        assert_eq!(
            dump("match (x) { case 1 | 2 => a case _ => b }"),
            "(match x (case (| 1 2) (block a)) (case _ (block b)))"
        );
        assert_eq!(dump("do { i++ } while (i < 3)"), "(do (block (post++ i)) (< i 3))");
    }

    #[test]
    fn lambda_parameters() {
        assert_eq!(dump("{ a: Int64, b => a + b }"), "(lambda (a: Int64 b) (+ a b))");
        assert_eq!(dump("{ => 1 }"), "(lambda () 1)");
    }
}
