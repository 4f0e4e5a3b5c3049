//! Types, and the places where a type and an expression share a prefix.

use cangjie_ast::node::*;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::messages;
use tracing::trace;

use crate::parser::{Parser, Speculation};
use crate::utilities::can_follow_type_arguments;

impl<'src> Parser<'src> {
    // ========================================================================
    // Types
    // ========================================================================

    pub(crate) fn parse_type(&mut self) -> TypeId {
        self.nested(
            |p, span| p.arena.alloc_type(TypeKind::Error, span),
            |p| p.parse_type_inner(),
        )
    }

    /// The type after `as` or `is`. A `<` after its name opens type
    /// arguments only where it would in value position, so
    /// `a as Int64 < b` stays a comparison.
    pub(crate) fn parse_type_operand(&mut self) -> TypeId {
        self.nested(
            |p, span| p.arena.alloc_type(TypeKind::Error, span),
            |p| {
                if p.token().is_identifier() {
                    p.parse_named_type(true)
                } else {
                    p.parse_type_inner()
                }
            },
        )
    }

    fn parse_type_inner(&mut self) -> TypeId {
        let start = self.start();
        match self.token() {
            SyntaxKind::QuestionToken => {
                self.next_token();
                let inner = self.parse_type();
                self.arena.alloc_type(TypeKind::Optional(inner), self.span_from(start))
            }
            SyntaxKind::QuestionQuestionToken => {
                self.next_token();
                let inner = self.parse_type();
                let span = self.span_from(start);
                let once = self.arena.alloc_type(TypeKind::Optional(inner), span);
                self.arena.alloc_type(TypeKind::Optional(once), span)
            }
            SyntaxKind::OpenParenToken => self.parse_paren_type(),
            kind if kind.is_identifier() => self.parse_named_type(false),
            _ => {
                let span = self.scanner.token_span();
                self.error_at(span, &messages::TYPE_EXPECTED, &[]);
                self.arena.alloc_type(TypeKind::Error, span)
            }
        }
    }

    /// `()`, `(T)`, `(A, B)`, `(a: A, b: B) -> R`.
    fn parse_paren_type(&mut self) -> TypeId {
        let start = self.start();
        self.next_token();
        let mut elements = Vec::new();
        let mut trailing_comma = false;
        while !matches!(self.token(), SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken) {
            let label = if self.token().is_identifier() && self.peek() == SyntaxKind::ColonToken {
                let name = self.parse_name();
                self.next_token();
                Some(name)
            } else {
                None
            };
            let ty = self.parse_type();
            elements.push(TupleTypeElement { label, ty });
            trailing_comma = self.optional(SyntaxKind::CommaToken);
            if !trailing_comma {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken);

        if self.optional(SyntaxKind::MinusGreaterThanToken) {
            let ret = self.parse_type();
            return self
                .arena
                .alloc_type(TypeKind::Arrow { params: elements, ret }, self.span_from(start));
        }
        let span = self.span_from(start);
        let kind = match elements.as_slice() {
            [] => TypeKind::Builtin(BuiltinType::Unit),
            [only] if !trailing_comma && only.label.is_none() => TypeKind::Parenthesized(only.ty),
            _ => {
                if elements.iter().any(|element| element.label.is_some()) {
                    self.error_at(span, &messages::NAMED_ELEMENTS_REQUIRE_ARROW, &[]);
                }
                TypeKind::Tuple(elements)
            }
        };
        self.arena.alloc_type(kind, span)
    }

    /// `A`, `a.b.C<T>`; single unqualified builtin names become builtins.
    /// With `tentative`, type arguments go through `try_type_arguments`.
    fn parse_named_type(&mut self, tentative: bool) -> TypeId {
        let start = self.start();
        let mut segments = Vec::new();
        loop {
            let name = self.parse_name();
            let args = if tentative {
                self.try_type_arguments()
            } else if self.token() == SyntaxKind::LessThanToken {
                self.parse_type_argument_list()
            } else {
                Vec::new()
            };
            segments.push(PathSegment { name, args });
            if self.token() == SyntaxKind::DotToken && self.peek().is_identifier() {
                self.next_token();
            } else {
                break;
            }
        }
        let kind = self.named_or_builtin(segments);
        self.arena.alloc_type(kind, self.span_from(start))
    }

    fn named_or_builtin(&self, segments: Vec<PathSegment>) -> TypeKind {
        if let [segment] = segments.as_slice() {
            if segment.args.is_empty() {
                if let Some(builtin) = BuiltinType::from_name(self.interner.resolve(segment.name.text)) {
                    return TypeKind::Builtin(builtin);
                }
            }
        }
        TypeKind::Named(segments)
    }

    /// `<T, U>`
    pub(crate) fn parse_type_argument_list(&mut self) -> Vec<TypeId> {
        self.expect(SyntaxKind::LessThanToken);
        let args = self.parse_list(SyntaxKind::GreaterThanToken, |p| p.parse_type());
        self.expect(SyntaxKind::GreaterThanToken);
        args
    }

    // ========================================================================
    // Type arguments in expressions
    // ========================================================================

    /// Type arguments after a name in value position, if the `<` there
    /// opens a list and not a comparison.
    ///
    /// The list is parsed speculatively. It stands only if the token after
    /// the closing `>` lets it: `f<T>(x)` and `a<b>.c` keep it, `a<b>c`
    /// and `a<b>=c` rewind to relational parsing. Each `<` offset is
    /// decided once per parse.
    pub(crate) fn try_type_arguments(&mut self) -> Vec<TypeId> {
        if self.token() != SyntaxKind::LessThanToken || self.scanner.has_preceding_trivia() {
            return Vec::new();
        }
        let at = self.start();
        if self.generic_memo.get(&at) == Some(&false) {
            return Vec::new();
        }
        let less_than = self.scanner.token_span();
        let outcome = self.speculate(|p| {
            let args = p.parse_type_argument_list();
            let adjacent = !p.scanner.has_preceding_trivia();
            can_follow_type_arguments(p.token(), p.line_break_before(), adjacent).then_some(args)
        });
        match outcome {
            Speculation::Committed(args) => {
                self.generic_memo.insert(at, true);
                args
            }
            Speculation::Rewound => {
                trace!(offset = at, "'<' read as comparison");
                self.generic_memo.insert(at, false);
                Vec::new()
            }
            Speculation::Exhausted => {
                let budget = self.speculation_budget().to_string();
                self.error_at(less_than, &messages::AMBIGUITY_EXHAUSTED_0_1, &["<", &budget]);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Expressions read as types
    // ========================================================================

    /// Reinterpret an element of a parenthesized list as a type, once a
    /// following `->` shows the list was a function type.
    pub(crate) fn expr_to_type(&mut self, id: ExprId) -> TypeId {
        let expr = self.arena.expr(id).clone();
        let kind = match expr.kind {
            ExprKind::TypeExpr(ty) => return ty,
            ExprKind::Identifier { name, type_args } => self.named_or_builtin(vec![PathSegment { name, args: type_args }]),
            ExprKind::Field { .. } => match self.expr_path(id) {
                Some(segments) => TypeKind::Named(segments),
                None => return self.not_a_type(expr.span),
            },
            ExprKind::Parenthesized(inner) => TypeKind::Parenthesized(self.expr_to_type(inner)),
            ExprKind::Tuple(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    let ty = self.expr_to_type(item);
                    elements.push(TupleTypeElement { label: None, ty });
                }
                TypeKind::Tuple(elements)
            }
            ExprKind::Unit => TypeKind::Builtin(BuiltinType::Unit),
            _ => return self.not_a_type(expr.span),
        };
        self.arena.alloc_type(kind, expr.span)
    }

    fn expr_path(&self, id: ExprId) -> Option<Vec<PathSegment>> {
        match &self.arena.expr(id).kind {
            ExprKind::Identifier { name, type_args } => Some(vec![PathSegment {
                name: *name,
                args: type_args.clone(),
            }]),
            ExprKind::Field {
                target,
                name,
                type_args,
                optional: false,
            } => {
                let mut path = self.expr_path(*target)?;
                path.push(PathSegment {
                    name: *name,
                    args: type_args.clone(),
                });
                Some(path)
            }
            _ => None,
        }
    }

    fn not_a_type(&mut self, span: TextSpan) -> TypeId {
        self.error_at(span, &messages::ELEMENT_IS_NOT_A_TYPE, &[]);
        self.arena.alloc_type(TypeKind::Error, span)
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
    fn generic_call_and_comparisons() {
        assert_eq!(dump("f<T, U>(x)"), "(call f<T, U> x)");
        assert_eq!(dump("f(a < b, c > (d))"), "(call f (< a b) (> c (paren d)))");
        assert_eq!(dump("f(a<b, c>(d))"), "(call f (call a<b, c> d))");
    }

    #[test]
    fn adjacent_closer_means_comparison() {
        assert_eq!(dump("a<b>=c"), "(>= (< a b) c)");
        assert_eq!(dump("x<y>>z"), "(< x (>> y z))");
    }

    #[test]
    fn nested_type_arguments_close_one_at_a_time() {
        assert_eq!(dump("make<Array<Int64>>()"), "(call make<Array<Int64>>)");
    }

    #[test]
    fn function_type_in_value_position() {
        assert_eq!(dump("(Int64, Bool) -> Unit"), "(type ((Int64, Bool) -> Unit))");
        assert_eq!(dump("() -> Unit"), "(type (() -> Unit))");
        assert_eq!(dump("(a: Int64) -> pkg.T"), "(type ((a: Int64) -> pkg.T))");
    }

    #[test]
    fn unit_paren_and_tuple() {
        assert_eq!(dump("()"), "()");
        assert_eq!(dump("(1)"), "(paren 1)");
        assert_eq!(dump("(1,)"), "(tuple 1)");
        assert_eq!(dump("(1, 2)"), "(tuple 1 2)");
    }

    #[test]
    fn optional_type_expression() {
        assert_eq!(dump("?Int64"), "(type ?Int64)");
    }
}
