//! Postfix chains: member access, calls, indexing, trailing lambdas and
//! their `?`-prefixed optional forms.

use cangjie_ast::node::*;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_diagnostics::messages;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// A primary expression followed by every suffix that applies to it.
    ///
    /// Calls, indexing and trailing lambdas must start on the operand's
    /// line; `.` and `?.` may continue a chain on the next line.
    pub(crate) fn parse_chain(&mut self) -> ExprId {
        let start = self.start();
        let mut expr = self.parse_primary();
        let mut has_optional = false;
        loop {
            let optional = self.at_optional_link();
            if optional {
                self.next_token();
                has_optional = true;
            }
            let same_line = optional || !self.line_break_before();
            expr = match self.token() {
                SyntaxKind::DotToken => self.parse_member(expr, start, optional),
                SyntaxKind::OpenParenToken if same_line => self.parse_call(expr, start, optional),
                SyntaxKind::OpenBracketToken if same_line => self.parse_index(expr, start, optional),
                SyntaxKind::OpenBraceToken if same_line => {
                    let lambda = self.parse_lambda(false);
                    self.arena.alloc_expr(
                        ExprKind::TrailingLambda {
                            callee: expr,
                            lambda,
                            optional,
                        },
                        self.span_from(start),
                    )
                }
                _ => break,
            };
        }
        if has_optional {
            expr = self.arena.alloc_expr(ExprKind::OptionalChain(expr), self.span_from(start));
        }
        expr
    }

    /// `?` followed by a link. Only `?.` may open a new line.
    fn at_optional_link(&mut self) -> bool {
        if self.token() != SyntaxKind::QuestionToken {
            return false;
        }
        match self.peek() {
            SyntaxKind::DotToken => true,
            SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken => {
                !self.line_break_before()
            }
            _ => false,
        }
    }

    fn parse_member(&mut self, target: ExprId, start: u32, optional: bool) -> ExprId {
        self.next_token();
        let kind = self.token();
        let name = if kind.is_identifier() || kind.is_keyword() {
            let text = kind.keyword_text().unwrap_or_else(|| self.scanner.token_value());
            let name = Name::new(self.intern(text), self.scanner.token_span());
            self.next_token();
            name
        } else {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            self.missing_name()
        };
        let type_args = self.try_type_arguments();
        self.arena.alloc_expr(
            ExprKind::Field {
                target,
                name,
                type_args,
                optional,
            },
            self.span_from(start),
        )
    }

    fn parse_call(&mut self, callee: ExprId, start: u32, optional: bool) -> ExprId {
        self.next_token();
        let args = self.parse_list(SyntaxKind::CloseParenToken, |p| p.parse_argument());
        self.expect(SyntaxKind::CloseParenToken);
        self.arena.alloc_expr(
            ExprKind::Call {
                callee,
                args,
                optional,
            },
            self.span_from(start),
        )
    }

    /// `e`, `name: e` or `inout e`.
    pub(crate) fn parse_argument(&mut self) -> Argument {
        let start = self.start();
        let name = if self.token().is_identifier() && self.peek() == SyntaxKind::ColonToken {
            let name = self.parse_name();
            self.next_token();
            Some(name)
        } else {
            None
        };
        let inout = self.optional(SyntaxKind::InoutKeyword);
        let value = self.parse_expr();
        Argument {
            name,
            inout,
            value,
            span: self.span_from(start),
        }
    }

    /// `[e]`, including the open ranges `[a..]`, `[..b]` and `[..]`.
    fn parse_index(&mut self, target: ExprId, start: u32, optional: bool) -> ExprId {
        self.next_token();
        let index = match self.token() {
            SyntaxKind::DotDotToken | SyntaxKind::DotDotEqualsToken => {
                let range_start = self.start();
                self.parse_range_tail(None, range_start)
            }
            _ => self.parse_expr(),
        };
        self.expect(SyntaxKind::CloseBracketToken);
        self.arena.alloc_expr(
            ExprKind::Index {
                target,
                index,
                optional,
            },
            self.span_from(start),
        )
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
    fn optional_links_share_one_chain() {
        assert_eq!(dump("a?.b?.c()"), "(chain (call (?. (?. a b) c)))");
        assert_eq!(dump("a?[0].b"), "(chain (. (?index a 0) b))");
    }

    #[test]
    fn named_and_inout_arguments() {
        assert_eq!(dump("f(1, by: 2, inout x)"), "(call f 1 (named by 2) (inout x))");
    }

    #[test]
    fn open_range_indices() {
        assert_eq!(dump("s[..]"), "(index s (.. none none))");
        assert_eq!(dump("s[1..]"), "(index s (.. 1 none))");
        assert_eq!(dump("s[..=n]"), "(index s (..= none n))");
    }

    #[test]
    fn trailing_lambda_after_call() {
        assert_eq!(dump("list.map(f) { x => x }"), "(trailing (call (. list map) f) (lambda (x) x))");
        assert_eq!(dump("run { 1 }"), "(trailing run (lambda () 1))");
    }

    #[test]
    fn call_on_next_line_is_not_a_link() {
        let parse = parse_expression(b"f\n(x)", 0, &ParseOptions::default());
        assert_eq!(parse.next_offset, 1);
    }

    #[test]
    fn keywords_as_member_names() {
        assert_eq!(dump("a.type.init"), "(. (. a type) init)");
    }
}
