//! Patterns for `match`, `if let`/`while let`, `for`-in, `catch` and
//! variable declarations.

use cangjie_ast::node::*;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::messages;

use crate::parser::Parser;
use crate::utilities::is_recovery_anchor;

/// Where a pattern appears. Each position accepts a different subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternContext {
    /// `case`, `if let` and `while let`: every form.
    Match,
    /// `catch (e: A | B)`: bindings and wildcards with a type list.
    Catch,
    /// `let`/`var`/`const`: irrefutable forms only.
    Declaration,
    /// `for (p in e)`: irrefutable forms only.
    ForIn,
}

impl PatternContext {
    fn describe(self) -> &'static str {
        match self {
            PatternContext::Match => "a match case",
            PatternContext::Catch => "a catch clause",
            PatternContext::Declaration => "a variable declaration",
            PatternContext::ForIn => "a for-in binding",
        }
    }

    fn allows_refutable(self) -> bool {
        self == PatternContext::Match
    }

    fn allows_annotation(self) -> bool {
        matches!(self, PatternContext::Match | PatternContext::Catch)
    }
}

impl<'src> Parser<'src> {
    pub(crate) fn parse_pattern(&mut self, ctx: PatternContext) -> PatternId {
        self.nested(
            |p, span| p.arena.alloc_pattern(PatternKind::Error, span),
            |p| p.parse_pattern_alternatives(ctx),
        )
    }

    /// `p | q | ...` folded into one node with an ordered alternative list.
    fn parse_pattern_alternatives(&mut self, ctx: PatternContext) -> PatternId {
        let start = self.start();
        let first = self.parse_single_pattern(ctx);
        if self.token() != SyntaxKind::BarToken {
            return first;
        }
        let mut alternatives = vec![first];
        while self.optional(SyntaxKind::BarToken) {
            alternatives.push(self.parse_single_pattern(ctx));
        }
        let span = self.span_from(start);
        if !ctx.allows_refutable() {
            return self.invalid_pattern(span, ctx.describe());
        }
        self.merge_alternatives(&alternatives, span)
    }

    fn merge_alternatives(&mut self, alternatives: &[PatternId], span: TextSpan) -> PatternId {
        let mut constants = Vec::new();
        let mut variants = Vec::new();
        let mut mixed = false;
        for id in alternatives {
            let pattern = self.arena.pattern(*id);
            match &pattern.kind {
                PatternKind::Constant(values) => constants.extend(values.iter().copied()),
                PatternKind::Enum(list) => variants.extend(list.iter().cloned()),
                PatternKind::Binding(name) => variants.push(EnumVariantPattern {
                    path: vec![*name],
                    type_args: Vec::new(),
                    args: Vec::new(),
                    span: pattern.span,
                }),
                PatternKind::Error => {}
                _ => mixed = true,
            }
        }
        if mixed || (!constants.is_empty() && !variants.is_empty()) {
            return self.invalid_pattern(span, "a '|' alternation");
        }
        let kind = if !constants.is_empty() {
            PatternKind::Constant(constants)
        } else if !variants.is_empty() {
            PatternKind::Enum(variants)
        } else {
            PatternKind::Error
        };
        self.arena.alloc_pattern(kind, span)
    }

    fn invalid_pattern(&mut self, span: TextSpan, place: &str) -> PatternId {
        self.error_at(span, &messages::INVALID_PATTERN_IN_0, &[place]);
        self.arena.alloc_pattern(PatternKind::Error, span)
    }

    fn parse_single_pattern(&mut self, ctx: PatternContext) -> PatternId {
        let start = self.start();
        match self.token() {
            SyntaxKind::UnderscoreToken => {
                self.next_token();
                if ctx.allows_annotation() && self.token() == SyntaxKind::ColonToken {
                    let types = self.parse_pattern_types(ctx);
                    return self.arena.alloc_pattern(
                        PatternKind::TypeAnnotated { binding: None, types },
                        self.span_from(start),
                    );
                }
                self.arena.alloc_pattern(PatternKind::Wildcard, self.span_from(start))
            }
            SyntaxKind::OpenParenToken => self.parse_tuple_pattern(ctx),
            kind if kind.is_literal() || kind.is_string_start() || kind == SyntaxKind::MinusToken => {
                let value = self.parse_unary();
                let span = self.span_from(start);
                if !ctx.allows_refutable() {
                    return self.invalid_pattern(span, ctx.describe());
                }
                self.arena.alloc_pattern(PatternKind::Constant(vec![value]), span)
            }
            kind if kind.is_identifier() => self.parse_name_pattern(ctx),
            _ => {
                let span = self.scanner.token_span();
                self.error_at(span, &messages::PATTERN_EXPECTED, &[]);
                if !is_recovery_anchor(self.token()) {
                    self.next_token();
                }
                self.arena.alloc_pattern(PatternKind::Error, span)
            }
        }
    }

    /// `: T`, or `: A | B` in a catch clause.
    fn parse_pattern_types(&mut self, ctx: PatternContext) -> Vec<TypeId> {
        self.next_token();
        let mut types = vec![self.parse_type()];
        if ctx == PatternContext::Catch {
            while self.optional(SyntaxKind::BarToken) {
                types.push(self.parse_type());
            }
        }
        types
    }

    /// `()`, `(p)` or `(p, q, ...)`.
    fn parse_tuple_pattern(&mut self, ctx: PatternContext) -> PatternId {
        let start = self.start();
        self.next_token();
        if self.optional(SyntaxKind::CloseParenToken) {
            let span = self.span_from(start);
            if !ctx.allows_refutable() {
                return self.invalid_pattern(span, ctx.describe());
            }
            let unit = self.arena.alloc_expr(ExprKind::Unit, span);
            return self.arena.alloc_pattern(PatternKind::Constant(vec![unit]), span);
        }
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while self.token() != SyntaxKind::EndOfFileToken {
            items.push(self.parse_pattern(ctx));
            trailing_comma = self.optional(SyntaxKind::CommaToken);
            if !trailing_comma || self.token() == SyntaxKind::CloseParenToken {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken);
        match items.as_slice() {
            [only] if !trailing_comma => *only,
            _ => self.arena.alloc_pattern(PatternKind::Tuple(items), self.span_from(start)),
        }
    }

    /// A binding `x`, an annotated binding `x: T`, or an enum variant
    /// `Path.Name<T>(p, q)`.
    fn parse_name_pattern(&mut self, ctx: PatternContext) -> PatternId {
        let start = self.start();
        let path = self.parse_dotted_name();
        let type_args = if self.token() == SyntaxKind::LessThanToken && !self.scanner.has_preceding_trivia() {
            self.parse_type_argument_list()
        } else {
            Vec::new()
        };

        if let ([name], true) = (path.as_slice(), type_args.is_empty()) {
            if ctx.allows_annotation() && self.token() == SyntaxKind::ColonToken {
                let types = self.parse_pattern_types(ctx);
                return self.arena.alloc_pattern(
                    PatternKind::TypeAnnotated {
                        binding: Some(*name),
                        types,
                    },
                    self.span_from(start),
                );
            }
            if self.token() != SyntaxKind::OpenParenToken {
                return self.arena.alloc_pattern(PatternKind::Binding(*name), self.span_from(start));
            }
        }

        let args = if self.optional(SyntaxKind::OpenParenToken) {
            let args = self.parse_list(SyntaxKind::CloseParenToken, |p| p.parse_pattern(ctx));
            self.expect(SyntaxKind::CloseParenToken);
            args
        } else {
            Vec::new()
        };
        let span = self.span_from(start);
        if !ctx.allows_refutable() {
            return self.invalid_pattern(span, ctx.describe());
        }
        self.arena.alloc_pattern(
            PatternKind::Enum(vec![EnumVariantPattern {
                path,
                type_args,
                args,
                span,
            }]),
            span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use cangjie_ast::dump::Dumper;
    use cangjie_core::intern::StringInterner;

    fn dump(source: &str, ctx: PatternContext) -> (String, usize) {
        let mut parser = Parser::new(source, &ParseOptions::default(), StringInterner::new());
        parser.next_token();
        let pattern = parser.parse_pattern(ctx);
        let errors = parser.error_count as usize;
        let text = Dumper::new(&parser.arena, &parser.interner, source).pattern(pattern);
        (text, errors)
    }

    #[test]
    fn constant_alternatives_are_flat() {
        assert_eq!(dump("1 | 2 | 3", PatternContext::Match), ("(| 1 2 3)".to_string(), 0));
    }

    #[test]
    fn enum_alternatives_are_flat() {
        assert_eq!(
            dump("Some(x) | None", PatternContext::Match),
            ("(| Some(x) None)".to_string(), 0)
        );
    }

    #[test]
    fn mixed_alternatives_are_rejected() {
        let (text, errors) = dump("1 | Some(x)", PatternContext::Match);
        assert_eq!(text, "<error>");
        assert_eq!(errors, 1);
    }

    #[test]
    fn catch_takes_a_type_list() {
        assert_eq!(
            dump("e: IOException | TimeoutException", PatternContext::Catch),
            ("(: e IOException TimeoutException)".to_string(), 0)
        );
        assert_eq!(dump("_: Exception", PatternContext::Catch), ("(: _ Exception)".to_string(), 0));
    }

    #[test]
    fn declarations_reject_refutable_forms() {
        assert_eq!(dump("(a, _)", PatternContext::Declaration), ("(tuple a _)".to_string(), 0));
        let (_, errors) = dump("Some(x)", PatternContext::Declaration);
        assert_eq!(errors, 1);
        let (_, errors) = dump("a | b", PatternContext::ForIn);
        assert_eq!(errors, 1);
    }

    #[test]
    fn negative_and_string_constants() {
        assert_eq!(dump("-1", PatternContext::Match), ("(- 1)".to_string(), 0));
        assert_eq!(dump(r#""a" | "b""#, PatternContext::Match), (r#"(| "a" "b")"#.to_string(), 0));
    }
}
