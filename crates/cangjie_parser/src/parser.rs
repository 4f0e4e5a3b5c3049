//! The Cangjie parser core.
//!
//! A recursive descent parser driving the mode-stack scanner. This module
//! holds the token cursor, speculation, diagnostics, recovery and the
//! file/block level grammar; expressions, chains, types, patterns and
//! declarations live in sibling modules as further `impl Parser` blocks.

use cangjie_ast::node::*;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_ast::types::TokenFlags;
use cangjie_core::intern::{InternedString, StringInterner};
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use cangjie_scanner::{Scanner, ScannerState};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::declarations::DeclContext;
use crate::options::ParseOptions;
use crate::stack::ensure_sufficient_stack;
use crate::utilities::{is_declaration_keyword, is_recovery_anchor};

/// Outcome of a speculative sub-parse.
#[derive(Debug)]
pub(crate) enum Speculation<T> {
    Committed(T),
    /// The attempt did not match; nothing it did is visible.
    Rewound,
    /// The attempt ran out of token budget before deciding.
    Exhausted,
}

/// Everything a rewind has to put back.
struct ParserState {
    scanner: ScannerState,
    arena: ArenaCheckpoint,
    prev_end: u32,
    prev_span: TextSpan,
    prev_kind: SyntaxKind,
    depth: u32,
}

/// Parses one buffer into a [`ParseTree`].
pub struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) arena: AstArena,
    pub(crate) interner: StringInterner,
    diagnostics: DiagnosticCollection,

    max_depth: u32,
    speculation_budget: u32,
    depth: u32,

    /// End of the last consumed token; node spans end here.
    pub(crate) prev_end: u32,
    prev_span: TextSpan,
    pub(crate) prev_kind: SyntaxKind,

    /// Tokens consumed so far, speculation included. Never rewound, so
    /// nested attempts share one budget.
    token_count: u64,
    speculation_depth: u32,
    speculation_limit: Option<u64>,
    speculation_failed: bool,
    budget_exhausted: bool,
    /// Decisions for tentative `<` lists, keyed by the `<` offset.
    pub(crate) generic_memo: FxHashMap<u32, bool>,

    /// Set after a fatal error until the next resynchronisation point.
    suppress_errors: bool,
    last_error_start: Option<u32>,
    /// Every error reported or suppressed outside speculation.
    pub(crate) error_count: u32,
    /// Name of the type whose body is being parsed, for primary inits.
    pub(crate) enclosing_type: Option<InternedString>,
}

impl<'src> Parser<'src> {
    pub fn new(text: &'src str, options: &ParseOptions, interner: StringInterner) -> Self {
        Self {
            scanner: Scanner::new(text),
            arena: AstArena::new(),
            interner,
            diagnostics: DiagnosticCollection::new(),
            max_depth: options.max_recursion_depth,
            speculation_budget: options.speculation_token_budget,
            depth: 0,
            prev_end: 0,
            prev_span: TextSpan::empty(0),
            prev_kind: SyntaxKind::Unknown,
            token_count: 0,
            speculation_depth: 0,
            speculation_limit: None,
            speculation_failed: false,
            budget_exhausted: false,
            generic_memo: FxHashMap::default(),
            suppress_errors: false,
            last_error_start: None,
            error_count: 0,
            enclosing_type: None,
        }
    }

    /// Parse the whole buffer as a file.
    pub fn parse_file(mut self) -> (ParseTree, DiagnosticCollection) {
        self.next_token();
        // Lexical errors ahead of the first token belong to no item.
        self.suppress_errors = false;
        let mut tree = ParseTree::new(self.interner.clone());
        self.parse_file_items(&mut tree);
        tree.arena = std::mem::take(&mut self.arena);
        (tree, self.finish())
    }

    /// Parse one statement-level expression starting at byte `offset`.
    /// Returns the tree holding it, its id and the offset just past it.
    pub fn parse_expression_at(mut self, offset: usize) -> (ParseTree, ExprId, usize, DiagnosticCollection) {
        self.scanner.set_pos(offset);
        self.prev_end = self.scanner.token_start() as u32;
        self.next_token();
        self.suppress_errors = false;
        let expr = self.parse_expression_statement();
        let next_offset = self.prev_end as usize;
        let mut tree = ParseTree::new(self.interner.clone());
        tree.arena = std::mem::take(&mut self.arena);
        (tree, expr, next_offset, self.finish())
    }

    fn finish(mut self) -> DiagnosticCollection {
        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.extend(std::mem::take(&mut self.diagnostics));
        diagnostics.sort();
        diagnostics
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// The current token, or end of file once a speculation has failed so
    /// every loop in the attempt winds down.
    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        if self.speculation_failed {
            SyntaxKind::EndOfFileToken
        } else {
            self.scanner.token()
        }
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_end = self.scanner.token_end() as u32;
        self.prev_span = self.scanner.token_span();
        self.prev_kind = self.scanner.token();
        self.token_count += 1;
        if let Some(limit) = self.speculation_limit {
            if self.token_count > limit {
                self.speculation_failed = true;
                self.budget_exhausted = true;
            }
        }
        let reported = self.scanner.diagnostics().len();
        // Invalid characters were reported by the scanner already; they
        // count as trivia of the token after them.
        let mut skipped = TokenFlags::NONE;
        while self.scanner.scan() == SyntaxKind::Unknown {
            skipped |= (self.scanner.token_flags() & TokenFlags::PRECEDING_LINE_BREAK) | TokenFlags::PRECEDING_TRIVIA;
        }
        self.scanner.add_token_flags(skipped);
        if self.scanner.diagnostics().len() > reported {
            self.lexical_error();
        }
        self.token()
    }

    /// A scanner error while reading ahead. It is the one report for the
    /// item being parsed, which is skipped once it ends.
    fn lexical_error(&mut self) {
        if self.speculating() {
            self.speculation_failed = true;
            return;
        }
        self.error_count += 1;
        self.suppress_errors = true;
    }

    #[inline]
    pub(crate) fn start(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(crate) fn span_from(&self, start: u32) -> TextSpan {
        TextSpan::from_bounds(start, self.prev_end.max(start))
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.token_value()
    }

    #[inline]
    pub(crate) fn line_break_before(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Check if the current token is the contextual word `text`.
    pub(crate) fn is_word(&self, text: &str) -> bool {
        self.token() == SyntaxKind::Identifier && self.token_value() == text
    }

    /// Kind of the token after the current one.
    pub(crate) fn peek(&mut self) -> SyntaxKind {
        self.scanner.look_ahead(|s| s.scan())
    }

    /// The current token in operator position, with `>` re-joined to
    /// `>=`, `>>` or `>>=`.
    pub(crate) fn operator_token(&mut self) -> SyntaxKind {
        if self.token() == SyntaxKind::GreaterThanToken {
            self.scanner.rescan_greater_than_token()
        } else {
            self.token()
        }
    }

    pub(crate) fn optional(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.token() == kind {
            self.next_token();
            return true;
        }
        let text = kind
            .punctuation_text()
            .or_else(|| kind.keyword_text())
            .unwrap_or_else(|| kind.describe());
        self.error(&messages::_0_EXPECTED, &[text]);
        false
    }

    pub(crate) fn intern(&self, text: &str) -> InternedString {
        self.interner.intern(text)
    }

    /// Consume an identifier and return it as a name. Keywords are not
    /// accepted; an empty name stands in after the error.
    pub(crate) fn parse_name(&mut self) -> Name {
        if self.token().is_identifier() {
            let name = Name::new(self.intern(self.token_value()), self.scanner.token_span());
            self.next_token();
            return name;
        }
        self.error(&messages::IDENTIFIER_EXPECTED, &[]);
        self.missing_name()
    }

    pub(crate) fn missing_name(&self) -> Name {
        Name::new(self.interner.intern_static(""), TextSpan::empty(self.start()))
    }

    /// `a.b.c`
    pub(crate) fn parse_dotted_name(&mut self) -> Vec<Name> {
        let mut path = vec![self.parse_name()];
        while self.token() == SyntaxKind::DotToken && self.peek().is_identifier() {
            self.next_token();
            path.push(self.parse_name());
        }
        path
    }

    /// Parse `element (',' element)*` up to, not including, `close`.
    pub(crate) fn parse_list<T>(&mut self, close: SyntaxKind, mut element: impl FnMut(&mut Self) -> T) -> Vec<T> {
        let mut items = Vec::new();
        while self.token() != close && self.token() != SyntaxKind::EndOfFileToken {
            items.push(element(self));
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        items
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub(crate) fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let span = self.scanner.token_span();
        self.error_at(span, message, args);
    }

    /// Report at `span`. Inside a speculation this only marks the attempt
    /// failed; nothing is recorded until a reading commits.
    pub(crate) fn error_at(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        if self.speculation_depth > 0 {
            self.speculation_failed = true;
            return;
        }
        self.error_count += 1;
        if self.suppress_errors || self.last_error_start == Some(span.start) {
            return;
        }
        self.last_error_start = Some(span.start);
        self.diagnostics.add(Diagnostic::new(span, message, args));
    }

    pub(crate) fn speculating(&self) -> bool {
        self.speculation_depth > 0
    }

    pub(crate) fn speculation_budget(&self) -> u32 {
        self.speculation_budget
    }

    /// Report a missing expression and return a placeholder for it. The
    /// offending token is consumed unless an enclosing rule needs it.
    pub(crate) fn expression_expected(&mut self) -> ExprId {
        let span = self.scanner.token_span();
        self.error_at(span, &messages::EXPRESSION_EXPECTED, &[]);
        if !is_recovery_anchor(self.token()) {
            self.next_token();
        }
        self.arena.alloc_expr(ExprKind::Error, span)
    }

    pub(crate) fn error_expr(&mut self, span: TextSpan) -> ExprId {
        self.arena.alloc_expr(ExprKind::Error, span)
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Run `f` one level deeper. Past the configured depth `fallback`
    /// builds the placeholder instead and the rest of the statement is
    /// parsed without further reports.
    pub(crate) fn nested<T>(
        &mut self,
        fallback: impl FnOnce(&mut Self, TextSpan) -> T,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        if self.depth >= self.max_depth {
            let span = self.scanner.token_span();
            self.recursion_limit_exceeded(span);
            return fallback(self, span);
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    fn recursion_limit_exceeded(&mut self, span: TextSpan) {
        if self.speculating() {
            self.speculation_failed = true;
            return;
        }
        if !self.suppress_errors {
            debug!(offset = span.start, depth = self.max_depth, "recursion limit exceeded");
            let depth = self.max_depth.to_string();
            self.diagnostics
                .add(Diagnostic::new(span, &messages::RECURSION_LIMIT_EXCEEDED_0, &[&depth]));
        }
        self.error_count += 1;
        self.suppress_errors = true;
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    fn save_state(&self) -> ParserState {
        ParserState {
            scanner: self.scanner.save_state(),
            arena: self.arena.checkpoint(),
            prev_end: self.prev_end,
            prev_span: self.prev_span,
            prev_kind: self.prev_kind,
            depth: self.depth,
        }
    }

    fn restore_state(&mut self, state: ParserState) {
        self.scanner.restore_state(state.scanner);
        self.arena.rollback(state.arena);
        self.prev_end = state.prev_end;
        self.prev_span = state.prev_span;
        self.prev_kind = state.prev_kind;
        self.depth = state.depth;
    }

    /// Try `f` as a tentative reading. It commits when `f` returns `Some`
    /// without reporting an error inside its token budget; otherwise the
    /// cursor, the arena and the scanner's diagnostics are rewound.
    pub(crate) fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Speculation<T> {
        let state = self.save_state();
        let outer_limit = self.speculation_limit;
        let own_limit = self.token_count + u64::from(self.speculation_budget);
        self.speculation_limit = Some(outer_limit.map_or(own_limit, |limit| limit.min(own_limit)));
        self.speculation_depth += 1;
        trace!(offset = self.start(), depth = self.speculation_depth, "speculation enter");

        let result = f(self);

        self.speculation_depth -= 1;
        self.speculation_limit = outer_limit;
        let failed = std::mem::replace(&mut self.speculation_failed, false);
        let exhausted = std::mem::replace(&mut self.budget_exhausted, false);
        match result {
            Some(value) if !failed => {
                trace!(offset = self.start(), "speculation commit");
                Speculation::Committed(value)
            }
            _ => {
                self.restore_state(state);
                trace!(offset = self.start(), exhausted, "speculation rewind");
                if let Some(limit) = outer_limit {
                    if self.token_count > limit {
                        self.speculation_failed = true;
                        self.budget_exhausted = true;
                    }
                }
                if exhausted {
                    Speculation::Exhausted
                } else {
                    Speculation::Rewound
                }
            }
        }
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Whether the current token ends the statement just parsed. A `;` is
    /// consumed.
    fn at_statement_end(&mut self, stop: fn(SyntaxKind) -> bool) -> bool {
        let kind = self.token();
        if kind == SyntaxKind::SemicolonToken {
            self.next_token();
            return true;
        }
        matches!(
            kind,
            SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken | SyntaxKind::InterpolationEnd
        ) || stop(kind)
            || self.line_break_before()
            || self.prev_kind == SyntaxKind::CloseBraceToken
    }

    fn separator_expected(&mut self) {
        let source = self.scanner.text();
        let previous = self.prev_span.slice(source).unwrap_or("");
        let span = self.scanner.token_span();
        self.error_at(span, &messages::STATEMENT_SEPARATOR_EXPECTED, &[previous]);
    }

    /// Skip to the next statement boundary: past a `;`, or up to a token
    /// that starts a new line, a closing `}` of the enclosing block, or end
    /// of file. Brackets opened along the way are skipped whole.
    pub(crate) fn skip_to_statement_boundary(&mut self, mut must_consume: bool) {
        let from = self.start();
        let mut depth = 0u32;
        loop {
            let kind = self.token();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            if depth == 0 {
                match kind {
                    SyntaxKind::CloseBraceToken | SyntaxKind::InterpolationEnd => break,
                    SyntaxKind::SemicolonToken => {
                        self.next_token();
                        break;
                    }
                    _ if !must_consume && self.line_break_before() => break,
                    _ => {}
                }
            }
            match kind {
                SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.next_token();
            must_consume = false;
        }
        self.resynchronized(from);
    }

    fn resynchronized(&mut self, from: u32) {
        debug!(from, to = self.start(), "resynchronized");
        self.suppress_errors = false;
    }

    /// Skip a malformed top-level item up to the next line that starts a
    /// declaration.
    fn skip_to_declaration(&mut self, mut must_consume: bool) {
        let from = self.start();
        let mut depth = 0u32;
        loop {
            let kind = self.token();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            if depth == 0 && !must_consume {
                if kind == SyntaxKind::SemicolonToken {
                    self.next_token();
                    break;
                }
                if self.line_break_before() && self.at_declaration_start() {
                    break;
                }
            }
            match kind {
                SyntaxKind::OpenParenToken | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken | SyntaxKind::CloseBracketToken | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.next_token();
            must_consume = false;
        }
        self.resynchronized(from);
    }

    /// Check if the current token can begin a declaration.
    pub(crate) fn at_declaration_start(&mut self) -> bool {
        let kind = self.token();
        if kind == SyntaxKind::UnsafeKeyword {
            return self.peek() != SyntaxKind::OpenBraceToken;
        }
        is_declaration_keyword(kind)
            || kind == SyntaxKind::AtToken
            || kind == SyntaxKind::TildeToken
            || (kind == SyntaxKind::Identifier && self.at_modifier_word())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// `{ items }`
    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.start();
        if !self.expect(SyntaxKind::OpenBraceToken) {
            return Block {
                items: Vec::new(),
                span: TextSpan::empty(start),
            };
        }
        let items = self.parse_items_until(|_| false);
        self.expect(SyntaxKind::CloseBraceToken);
        Block {
            items,
            span: self.span_from(start),
        }
    }

    /// Parse block items until `}`, an interpolation end, end of file or a
    /// token accepted by `stop`.
    pub(crate) fn parse_items_until(&mut self, stop: fn(SyntaxKind) -> bool) -> Vec<BlockItem> {
        let mut items = Vec::new();
        loop {
            let kind = self.token();
            if matches!(
                kind,
                SyntaxKind::EndOfFileToken | SyntaxKind::CloseBraceToken | SyntaxKind::InterpolationEnd
            ) || stop(kind)
            {
                break;
            }
            if kind == SyntaxKind::SemicolonToken {
                self.next_token();
                continue;
            }

            let start = self.scanner.token_start();
            let errors = self.error_count;
            let item = self.nested(
                |p, span| BlockItem::Expr(p.error_expr(span)),
                |p| p.parse_block_item(),
            );
            items.push(item);
            self.end_item(start, errors, stop);
        }
        items
    }

    /// Finish one statement or member that started at byte `start`. A
    /// failed or stalled item is skipped past; a clean one must be followed
    /// by a separator.
    pub(crate) fn end_item(&mut self, start: usize, errors: u32, stop: fn(SyntaxKind) -> bool) {
        let progressed = self.scanner.token_start() != start;
        if self.error_count != errors || !progressed {
            self.skip_to_statement_boundary(!progressed);
        } else if !self.at_statement_end(stop) {
            self.separator_expected();
            self.skip_to_statement_boundary(false);
        }
    }

    fn parse_block_item(&mut self) -> BlockItem {
        if self.at_local_declaration() {
            BlockItem::Decl(self.parse_declaration(DeclContext::Local))
        } else {
            BlockItem::Expr(self.parse_expression_statement())
        }
    }

    fn at_local_declaration(&mut self) -> bool {
        match self.token() {
            SyntaxKind::LetKeyword
            | SyntaxKind::VarKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FuncKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::StructKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::AtToken => true,
            SyntaxKind::UnsafeKeyword => self.peek() == SyntaxKind::FuncKeyword,
            SyntaxKind::Identifier => self.at_modifier_word(),
            _ => false,
        }
    }

    // ========================================================================
    // File
    // ========================================================================

    fn parse_file_items(&mut self, tree: &mut ParseTree) {
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    continue;
                }
                _ => {}
            }

            let start = self.scanner.token_start();
            let errors = self.error_count;
            match self.kind_after_modifiers() {
                SyntaxKind::PackageKeyword => self.parse_package_item(tree),
                SyntaxKind::MacroKeyword if self.macro_package_ahead() => self.parse_package_item(tree),
                SyntaxKind::ImportKeyword | SyntaxKind::FromKeyword => {
                    let import = self.parse_import();
                    tree.imports.push(import);
                }
                _ => {
                    let decl = self.parse_declaration(DeclContext::TopLevel);
                    self.place_top_level(tree, decl);
                }
            }

            let progressed = self.scanner.token_start() != start;
            if self.error_count != errors || !progressed {
                self.skip_to_declaration(!progressed);
            } else if !self.at_statement_end(|_| false) {
                self.separator_expected();
                self.skip_to_declaration(false);
            }
        }
    }

    fn parse_package_item(&mut self, tree: &mut ParseTree) {
        let start = self.start();
        let header = self.parse_package();
        if tree.package.is_some() || !tree.imports.is_empty() || !tree.items.is_empty() || tree.main.is_some() {
            self.error_at(header.span, &messages::PACKAGE_HEADER_MISPLACED, &[]);
            debug!(offset = start, "package header ignored");
            return;
        }
        tree.package = Some(header);
    }

    fn place_top_level(&mut self, tree: &mut ParseTree, decl: DeclId) {
        if !matches!(self.arena.decl(decl).kind, DeclKind::Main(_)) {
            tree.items.push(decl);
            return;
        }
        if tree.main.is_some() {
            let span = self.arena.decl(decl).span;
            self.error_at(span, &messages::DUPLICATE_MAIN, &[]);
            tree.items.push(decl);
            return;
        }
        tree.main = Some(decl);
    }

    /// Whether `macro` starts a `macro package` header.
    fn macro_package_ahead(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            while s.token() != SyntaxKind::MacroKeyword && s.token() != SyntaxKind::EndOfFileToken {
                s.scan();
            }
            s.scan() == SyntaxKind::PackageKeyword
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cangjie_ast::dump::Dumper;

    fn parser(text: &str) -> Parser<'_> {
        let mut parser = Parser::new(text, &ParseOptions::default(), StringInterner::new());
        parser.next_token();
        parser
    }

    #[test]
    fn rewound_speculation_leaves_no_trace() {
        let mut p = parser("a + b");
        let before = p.arena.checkpoint();
        let outcome: Speculation<()> = p.speculate(|p| {
            let _ = p.parse_expr();
            p.error(&messages::TYPE_EXPECTED, &[]);
            Some(())
        });
        assert!(matches!(outcome, Speculation::Rewound));
        assert_eq!(p.arena.checkpoint(), before);
        assert_eq!(p.token(), SyntaxKind::Identifier);
        assert_eq!(p.start(), 0);
        assert!(p.diagnostics.is_empty());
    }

    #[test]
    fn committed_speculation_keeps_nodes() {
        let mut p = parser("a + b;");
        let outcome = p.speculate(|p| Some(p.parse_expr()));
        let Speculation::Committed(expr) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(p.token(), SyntaxKind::SemicolonToken);
        let dumper = Dumper::new(&p.arena, &p.interner, "a + b;");
        assert_eq!(dumper.expr(expr), "(+ a b)");
    }

    #[test]
    fn budget_exhaustion_is_reported_as_such() {
        let text = "a b c d e f g h";
        let options = ParseOptions {
            speculation_token_budget: 3,
            ..ParseOptions::default()
        };
        let mut p = Parser::new(text, &options, StringInterner::new());
        p.next_token();
        let outcome: Speculation<()> = p.speculate(|p| {
            while p.token() != SyntaxKind::EndOfFileToken {
                p.next_token();
            }
            Some(())
        });
        assert!(matches!(outcome, Speculation::Exhausted));
        assert_eq!(p.start(), 0);
        assert_eq!(p.token(), SyntaxKind::Identifier);
    }

    #[test]
    fn skip_stops_at_line_break() {
        let mut p = parser("a ( b\n c ) d\nnext");
        p.skip_to_statement_boundary(true);
        assert_eq!(p.token_value(), "next");
    }
}
