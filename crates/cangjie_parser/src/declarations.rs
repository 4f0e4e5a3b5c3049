//! Package headers, imports and declarations.

use cangjie_ast::node::*;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_ast::types::Modifiers;
use cangjie_core::intern::InternedString;
use cangjie_diagnostics::messages;

use crate::parser::Parser;
use crate::patterns::PatternContext;
use crate::precedence::binary_operator;
use crate::utilities::is_declaration_keyword;

/// Where a declaration appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclContext {
    TopLevel,
    /// Inside a function body or other block.
    Local,
    /// Inside a class, struct, interface, enum, extend or foreign body.
    Member,
}

impl DeclContext {
    /// Modifiers that make no sense in this position.
    fn disallowed(self) -> Modifiers {
        match self {
            DeclContext::TopLevel => {
                Modifiers::STATIC | Modifiers::OVERRIDE | Modifiers::REDEF | Modifiers::MUT | Modifiers::OPERATOR
            }
            DeclContext::Local => {
                Modifiers::ACCESSIBILITY
                    | Modifiers::OPEN
                    | Modifiers::ABSTRACT
                    | Modifiers::SEALED
                    | Modifiers::STATIC
                    | Modifiers::OVERRIDE
                    | Modifiers::REDEF
                    | Modifiers::MUT
                    | Modifiers::OPERATOR
                    | Modifiers::FOREIGN
            }
            DeclContext::Member => Modifiers::NONE,
        }
    }
}

impl<'src> Parser<'src> {
    // ========================================================================
    // Modifiers and annotations
    // ========================================================================

    /// Check if the current identifier is a modifier word such as `public`
    /// or `open` followed, on the same line, by more of a declaration.
    pub(crate) fn at_modifier_word(&mut self) -> bool {
        if self.token() != SyntaxKind::Identifier || Modifiers::from_word(self.token_value()).is_none() {
            return false;
        }
        let (next, line_break) = self
            .scanner
            .look_ahead(|s| (s.scan(), s.has_preceding_line_break()));
        !line_break
            && (is_declaration_keyword(next)
                || matches!(next, SyntaxKind::Identifier | SyntaxKind::UnsafeKeyword | SyntaxKind::TildeToken))
    }

    /// Kind of the first token after any leading modifier words.
    pub(crate) fn kind_after_modifiers(&mut self) -> SyntaxKind {
        self.scanner.look_ahead(|s| {
            let mut kind = s.token();
            while kind == SyntaxKind::Identifier && Modifiers::from_word(s.token_value()).is_some() {
                kind = s.scan();
            }
            kind
        })
    }

    /// Modifier words and keywords, reporting each one in `disallowed`.
    fn parse_modifiers(&mut self, disallowed: Modifiers) -> Modifiers {
        let mut modifiers = Modifiers::NONE;
        loop {
            let flag = match self.token() {
                SyntaxKind::Identifier if self.at_modifier_word() => Modifiers::from_word(self.token_value()),
                SyntaxKind::StaticKeyword => Some(Modifiers::STATIC),
                SyntaxKind::OperatorKeyword => Some(Modifiers::OPERATOR),
                SyntaxKind::UnsafeKeyword if self.peek() != SyntaxKind::OpenBraceToken => Some(Modifiers::UNSAFE),
                SyntaxKind::ForeignKeyword
                    if matches!(
                        self.peek(),
                        SyntaxKind::FuncKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword
                    ) =>
                {
                    Some(Modifiers::FOREIGN)
                }
                SyntaxKind::ConstKeyword
                    if matches!(self.peek(), SyntaxKind::FuncKeyword | SyntaxKind::InitKeyword) =>
                {
                    Some(Modifiers::CONST)
                }
                _ => None,
            };
            let Some(flag) = flag else {
                break;
            };
            if disallowed.intersects(flag) {
                let word = flag.to_string();
                self.error(&messages::MODIFIER_0_NOT_ALLOWED_HERE, &[&word]);
            }
            modifiers |= flag;
            self.next_token();
        }
        modifiers
    }

    /// Whether `@` here starts a macro call rather than an annotation:
    /// the path (and optional `[...]`) is followed by `(` on the same line.
    fn at_macro_call(&mut self) -> bool {
        self.scanner.look_ahead(|s| {
            let mut kind = s.scan();
            loop {
                if !kind.is_identifier() {
                    return false;
                }
                kind = s.scan();
                if kind != SyntaxKind::DotToken {
                    break;
                }
                kind = s.scan();
            }
            if kind == SyntaxKind::OpenBracketToken && !s.has_preceding_line_break() {
                let mut depth = 0u32;
                loop {
                    match s.scan() {
                        SyntaxKind::OpenBracketToken => depth += 1,
                        SyntaxKind::CloseBracketToken if depth == 0 => break,
                        SyntaxKind::CloseBracketToken => depth -= 1,
                        SyntaxKind::EndOfFileToken => return false,
                        _ => {}
                    }
                }
                kind = s.scan();
            }
            kind == SyntaxKind::OpenParenToken && !s.has_preceding_line_break()
        })
    }

    /// `@a.b` or `@a.b[args]`
    fn parse_annotation(&mut self) -> Annotation {
        let start = self.start();
        self.next_token();
        let path = self.parse_dotted_name();
        let args = if self.token() == SyntaxKind::OpenBracketToken && !self.line_break_before() {
            self.next_token();
            let args = self.parse_list(SyntaxKind::CloseBracketToken, |p| p.parse_argument());
            self.expect(SyntaxKind::CloseBracketToken);
            args
        } else {
            Vec::new()
        };
        Annotation {
            path,
            args,
            span: self.span_from(start),
        }
    }

    // ========================================================================
    // Package and imports
    // ========================================================================

    /// `[modifiers] [macro] package a.b.c`
    pub(crate) fn parse_package(&mut self) -> PackageHeader {
        let start = self.start();
        let modifiers = self.parse_modifiers(Modifiers::NONE);
        let is_macro = self.optional(SyntaxKind::MacroKeyword);
        self.expect(SyntaxKind::PackageKeyword);
        let path = self.parse_dotted_name();
        PackageHeader {
            is_macro,
            path,
            modifiers,
            span: self.span_from(start),
        }
    }

    /// `[modifiers] [from m] import a.b.*, a.c as d, a.{e, f as g}`
    pub(crate) fn parse_import(&mut self) -> ImportDecl {
        let start = self.start();
        let modifiers = self.parse_modifiers(Modifiers::NONE);
        let from = if self.optional(SyntaxKind::FromKeyword) {
            Some(self.parse_name())
        } else {
            None
        };
        self.expect(SyntaxKind::ImportKeyword);
        let mut items = Vec::new();
        loop {
            self.parse_import_item(&[], &mut items);
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        ImportDecl {
            from,
            items,
            modifiers,
            span: self.span_from(start),
        }
    }

    /// One import path; a `{...}` group expands into one item per member,
    /// each carrying the group's prefix.
    fn parse_import_item(&mut self, prefix: &[Name], items: &mut Vec<ImportItem>) {
        let start = self.start();
        let mut path = prefix.to_vec();
        path.extend(self.parse_dotted_name());
        if self.token() == SyntaxKind::DotToken {
            match self.peek() {
                SyntaxKind::AsteriskToken => {
                    self.next_token();
                    self.next_token();
                    items.push(ImportItem {
                        path,
                        wildcard: true,
                        alias: None,
                        span: self.span_from(start),
                    });
                    return;
                }
                SyntaxKind::OpenBraceToken => {
                    self.next_token();
                    self.next_token();
                    while !matches!(self.token(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
                        self.parse_import_item(&path, items);
                        if !self.optional(SyntaxKind::CommaToken) {
                            break;
                        }
                    }
                    self.expect(SyntaxKind::CloseBraceToken);
                    return;
                }
                _ => {
                    self.next_token();
                    self.error(&messages::IDENTIFIER_EXPECTED, &[]);
                }
            }
        }
        let alias = if self.optional(SyntaxKind::AsKeyword) {
            Some(self.parse_name())
        } else {
            None
        };
        items.push(ImportItem {
            path,
            wildcard: false,
            alias,
            span: self.span_from(start),
        });
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub(crate) fn parse_declaration(&mut self, ctx: DeclContext) -> DeclId {
        let start = self.start();
        let mut annotations = Vec::new();
        while self.token() == SyntaxKind::AtToken {
            if self.at_macro_call() {
                let call = self.parse_macro_call();
                return self.arena.alloc_decl(Decl {
                    kind: DeclKind::MacroExpansion(call),
                    span: self.span_from(start),
                    annotations,
                    modifiers: Modifiers::NONE,
                });
            }
            annotations.push(self.parse_annotation());
        }

        let modifiers = self.parse_modifiers(ctx.disallowed());
        let kind = match self.token() {
            SyntaxKind::FuncKeyword => {
                self.next_token();
                DeclKind::Func(Box::new(self.parse_func()))
            }
            SyntaxKind::LetKeyword | SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                DeclKind::Var(self.parse_var())
            }
            SyntaxKind::ClassKeyword => DeclKind::Class(Box::new(self.parse_type_decl())),
            SyntaxKind::StructKeyword => DeclKind::Struct(Box::new(self.parse_type_decl())),
            SyntaxKind::InterfaceKeyword => DeclKind::Interface(Box::new(self.parse_type_decl())),
            SyntaxKind::EnumKeyword => DeclKind::Enum(Box::new(self.parse_enum())),
            SyntaxKind::TypeKeyword => self.parse_type_alias(),
            SyntaxKind::ExtendKeyword if ctx != DeclContext::Local => DeclKind::Extend(Box::new(self.parse_extend())),
            SyntaxKind::ForeignKeyword if ctx != DeclContext::Local => {
                self.next_token();
                DeclKind::Foreign(self.parse_member_body(None))
            }
            SyntaxKind::MacroKeyword if ctx == DeclContext::TopLevel => {
                DeclKind::MacroDef(Box::new(self.parse_macro_def()))
            }
            SyntaxKind::MainKeyword if ctx == DeclContext::TopLevel => DeclKind::Main(Box::new(self.parse_main())),
            SyntaxKind::PropKeyword if ctx == DeclContext::Member => DeclKind::Prop(Box::new(self.parse_prop())),
            SyntaxKind::InitKeyword if ctx == DeclContext::Member => {
                let kind = if modifiers.contains(Modifiers::STATIC) {
                    InitKind::Static
                } else {
                    InitKind::Regular
                };
                self.next_token();
                DeclKind::Init(Box::new(self.parse_init(kind, None)))
            }
            SyntaxKind::TildeToken if ctx == DeclContext::Member && self.peek() == SyntaxKind::InitKeyword => {
                self.next_token();
                self.next_token();
                DeclKind::Init(Box::new(self.parse_init(InitKind::Finalizer, None)))
            }
            SyntaxKind::Identifier if ctx == DeclContext::Member && self.at_primary_init() => {
                let name = self.parse_name();
                DeclKind::Init(Box::new(self.parse_init(InitKind::Primary, Some(name))))
            }
            _ => {
                let message = if ctx == DeclContext::Member {
                    &messages::MEMBER_DECLARATION_EXPECTED
                } else {
                    &messages::DECLARATION_EXPECTED
                };
                self.error(message, &[]);
                self.skip_to_statement_boundary(true);
                DeclKind::Error
            }
        };
        self.arena.alloc_decl(Decl {
            kind,
            span: self.span_from(start),
            annotations,
            modifiers,
        })
    }

    fn at_primary_init(&mut self) -> bool {
        let Some(owner) = self.enclosing_type else {
            return false;
        };
        self.intern(self.token_value()) == owner && self.peek() == SyntaxKind::OpenParenToken
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Everything after `func`.
    fn parse_func(&mut self) -> FuncDecl {
        let name = self.parse_func_name();
        let generics = self.parse_generic_params();
        let params = self.parse_params();
        let ret = self.parse_return_type();
        let constraints = self.parse_constraints();
        let body = if self.token() == SyntaxKind::OpenBraceToken {
            Some(self.parse_block())
        } else {
            None
        };
        FuncDecl {
            name,
            generics,
            params,
            ret,
            constraints,
            body,
        }
    }

    /// A function name, or the operator an `operator func` overloads:
    /// `+`, `>>`, `!`, `[]`, `()`.
    fn parse_func_name(&mut self) -> Name {
        let kind = self.token();
        if kind.is_identifier() {
            return self.parse_name();
        }
        let start = self.start();
        let text = match kind {
            SyntaxKind::OpenBracketToken | SyntaxKind::OpenParenToken => {
                let (close, text) = if kind == SyntaxKind::OpenBracketToken {
                    (SyntaxKind::CloseBracketToken, "[]")
                } else {
                    (SyntaxKind::CloseParenToken, "()")
                };
                if self.peek() == close {
                    self.next_token();
                    Some(text)
                } else {
                    None
                }
            }
            SyntaxKind::ExclamationToken => Some("!"),
            _ => {
                let op = self.operator_token();
                binary_operator(op).and_then(|_| op.punctuation_text())
            }
        };
        match text {
            Some(text) => {
                self.next_token();
                Name::new(self.interner.intern_static(text), self.span_from(start))
            }
            None => {
                self.error(&messages::IDENTIFIER_EXPECTED, &[]);
                self.missing_name()
            }
        }
    }

    /// `<T, U>` on a declaration.
    fn parse_generic_params(&mut self) -> Vec<Name> {
        if !self.optional(SyntaxKind::LessThanToken) {
            return Vec::new();
        }
        let params = self.parse_list(SyntaxKind::GreaterThanToken, |p| p.parse_name());
        self.expect(SyntaxKind::GreaterThanToken);
        params
    }

    fn parse_params(&mut self) -> Vec<Param> {
        if !self.expect(SyntaxKind::OpenParenToken) {
            return Vec::new();
        }
        let params = self.parse_list(SyntaxKind::CloseParenToken, |p| p.parse_param());
        self.expect(SyntaxKind::CloseParenToken);
        params
    }

    /// `[let|var] name[!]: T [= default]`
    fn parse_param(&mut self) -> Param {
        let start = self.start();
        // Visibility on a primary-init member parameter.
        self.parse_modifiers(Modifiers::NONE);
        let member = match self.token() {
            SyntaxKind::LetKeyword => Some(VarKind::Let),
            SyntaxKind::VarKeyword => Some(VarKind::Var),
            _ => None,
        };
        if member.is_some() {
            self.next_token();
        }
        let name = if self.token() == SyntaxKind::UnderscoreToken {
            let name = Name::new(self.interner.intern_static("_"), self.scanner.token_span());
            self.next_token();
            name
        } else {
            self.parse_name()
        };
        let named = self.optional(SyntaxKind::ExclamationToken);
        self.expect(SyntaxKind::ColonToken);
        let ty = self.parse_type();
        let default = if self.optional(SyntaxKind::EqualsToken) {
            Some(self.parse_expr())
        } else {
            None
        };
        Param {
            name,
            named,
            member,
            ty,
            default,
            span: self.span_from(start),
        }
    }

    fn parse_return_type(&mut self) -> Option<TypeId> {
        if self.optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        }
    }

    /// `where T <: A & B, U <: C`
    fn parse_constraints(&mut self) -> Vec<GenericConstraint> {
        let mut constraints = Vec::new();
        if !self.optional(SyntaxKind::WhereKeyword) {
            return constraints;
        }
        loop {
            let param = self.parse_name();
            self.expect(SyntaxKind::LessThanColonToken);
            let bounds = self.parse_bounds();
            constraints.push(GenericConstraint { param, bounds });
            if !self.optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        constraints
    }

    /// `A & B & C`
    fn parse_bounds(&mut self) -> Vec<TypeId> {
        let mut bounds = vec![self.parse_type()];
        while self.optional(SyntaxKind::AmpersandToken) {
            bounds.push(self.parse_type());
        }
        bounds
    }

    fn parse_supertypes(&mut self) -> Vec<TypeId> {
        if self.optional(SyntaxKind::LessThanColonToken) {
            self.parse_bounds()
        } else {
            Vec::new()
        }
    }

    /// `main(params) [: T] { }`
    fn parse_main(&mut self) -> FuncDecl {
        let name = Name::new(self.interner.intern_static("main"), self.scanner.token_span());
        self.next_token();
        let params = self.parse_params();
        let ret = self.parse_return_type();
        let body = Some(self.parse_block());
        FuncDecl {
            name,
            generics: Vec::new(),
            params,
            ret,
            constraints: Vec::new(),
            body,
        }
    }

    /// `macro Name(input: Tokens) [: Tokens] { }` or `... = e`.
    fn parse_macro_def(&mut self) -> FuncDecl {
        self.next_token();
        let name = self.parse_name();
        let params = self.parse_params();
        let ret = self.parse_return_type();
        let body = if self.optional(SyntaxKind::EqualsToken) {
            let start = self.start();
            let value = self.parse_expr();
            Block {
                items: vec![BlockItem::Expr(value)],
                span: self.span_from(start),
            }
        } else {
            self.parse_block()
        };
        FuncDecl {
            name,
            generics: Vec::new(),
            params,
            ret,
            constraints: Vec::new(),
            body: Some(body),
        }
    }

    // ========================================================================
    // Variables and aliases
    // ========================================================================

    /// `let|var|const pattern [: T] [= e]`
    fn parse_var(&mut self) -> VarDecl {
        let kind = match self.token() {
            SyntaxKind::LetKeyword => VarKind::Let,
            SyntaxKind::VarKeyword => VarKind::Var,
            _ => VarKind::Const,
        };
        self.next_token();
        let pattern = self.parse_pattern(PatternContext::Declaration);
        let ty = self.parse_return_type();
        let value = if self.optional(SyntaxKind::EqualsToken) {
            Some(self.parse_expr())
        } else {
            None
        };
        VarDecl {
            kind,
            pattern,
            ty,
            value,
        }
    }

    /// `type Name<T> = T`
    fn parse_type_alias(&mut self) -> DeclKind {
        self.next_token();
        let name = self.parse_name();
        let generics = self.parse_generic_params();
        self.expect(SyntaxKind::EqualsToken);
        let ty = self.parse_type();
        DeclKind::TypeAlias { name, generics, ty }
    }

    // ========================================================================
    // Types with bodies
    // ========================================================================

    /// `class|struct|interface Name<T> <: A & B where ... { members }`
    fn parse_type_decl(&mut self) -> TypeDecl {
        self.next_token();
        let name = self.parse_name();
        let generics = self.parse_generic_params();
        let supertypes = self.parse_supertypes();
        let constraints = self.parse_constraints();
        let members = self.parse_member_body(Some(name.text));
        TypeDecl {
            name,
            generics,
            supertypes,
            constraints,
            members,
        }
    }

    /// `enum Name<T> <: I { | A | B(T, U) | ... members }`
    fn parse_enum(&mut self) -> EnumDecl {
        self.next_token();
        let name = self.parse_name();
        let generics = self.parse_generic_params();
        let supertypes = self.parse_supertypes();
        let constraints = self.parse_constraints();

        let mut cases = Vec::new();
        let mut non_exhaustive = false;
        let mut members = Vec::new();
        if self.expect(SyntaxKind::OpenBraceToken) {
            let outer = std::mem::replace(&mut self.enclosing_type, Some(name.text));
            self.optional(SyntaxKind::BarToken);
            loop {
                match self.token() {
                    SyntaxKind::DotDotDotToken => {
                        self.next_token();
                        non_exhaustive = true;
                    }
                    SyntaxKind::Identifier if !self.at_modifier_word() => cases.push(self.parse_enum_case()),
                    _ => break,
                }
                if !self.optional(SyntaxKind::BarToken) {
                    break;
                }
            }
            members = self.parse_members();
            self.expect(SyntaxKind::CloseBraceToken);
            self.enclosing_type = outer;
        }
        EnumDecl {
            name,
            generics,
            supertypes,
            constraints,
            cases,
            non_exhaustive,
            members,
        }
    }

    fn parse_enum_case(&mut self) -> EnumCase {
        let start = self.start();
        let name = self.parse_name();
        let params = if self.optional(SyntaxKind::OpenParenToken) {
            let params = self.parse_list(SyntaxKind::CloseParenToken, |p| p.parse_type());
            self.expect(SyntaxKind::CloseParenToken);
            params
        } else {
            Vec::new()
        };
        EnumCase {
            name,
            params,
            span: self.span_from(start),
        }
    }

    /// `extend<T> Type <: I where ... { members }`
    fn parse_extend(&mut self) -> ExtendDecl {
        self.next_token();
        let generics = self.parse_generic_params();
        let target = self.parse_type();
        let supertypes = self.parse_supertypes();
        let constraints = self.parse_constraints();
        let members = self.parse_member_body(None);
        ExtendDecl {
            generics,
            target,
            supertypes,
            constraints,
            members,
        }
    }

    /// `{ members }`; `owner` names the type whose primary init may appear.
    fn parse_member_body(&mut self, owner: Option<InternedString>) -> Vec<DeclId> {
        if !self.expect(SyntaxKind::OpenBraceToken) {
            return Vec::new();
        }
        let outer = std::mem::replace(&mut self.enclosing_type, owner);
        let members = self.parse_members();
        self.expect(SyntaxKind::CloseBraceToken);
        self.enclosing_type = outer;
        members
    }

    fn parse_members(&mut self) -> Vec<DeclId> {
        let mut members = Vec::new();
        loop {
            match self.token() {
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => break,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    continue;
                }
                _ => {}
            }
            let start = self.scanner.token_start();
            let errors = self.error_count;
            let member = self.nested(
                |p, span| {
                    p.arena.alloc_decl(Decl {
                        kind: DeclKind::Error,
                        span,
                        annotations: Vec::new(),
                        modifiers: Modifiers::NONE,
                    })
                },
                |p| p.parse_declaration(DeclContext::Member),
            );
            members.push(member);
            self.end_item(start, errors, |_| false);
        }
        members
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// `prop name: T { get() { } set(v) { } }`; the accessor block is
    /// absent on abstract properties.
    fn parse_prop(&mut self) -> PropDecl {
        self.next_token();
        let name = self.parse_name();
        self.expect(SyntaxKind::ColonToken);
        let ty = self.parse_type();
        let mut getter = None;
        let mut setter = None;
        if self.optional(SyntaxKind::OpenBraceToken) {
            let mut reported = false;
            loop {
                match self.token() {
                    SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => break,
                    SyntaxKind::Identifier if self.is_word("get") => {
                        self.next_token();
                        self.expect(SyntaxKind::OpenParenToken);
                        self.expect(SyntaxKind::CloseParenToken);
                        getter = Some(self.parse_block());
                    }
                    SyntaxKind::Identifier if self.is_word("set") => {
                        self.next_token();
                        self.expect(SyntaxKind::OpenParenToken);
                        let param = self.parse_name();
                        self.expect(SyntaxKind::CloseParenToken);
                        setter = Some((param, self.parse_block()));
                    }
                    _ => {
                        if !reported {
                            self.error(&messages::_0_EXPECTED, &["get"]);
                            reported = true;
                        }
                        self.next_token();
                    }
                }
            }
            self.expect(SyntaxKind::CloseBraceToken);
        }
        PropDecl {
            name,
            ty,
            getter,
            setter,
        }
    }

    /// Parameters and body of an init; the introducing tokens are consumed.
    fn parse_init(&mut self, kind: InitKind, name: Option<Name>) -> InitDecl {
        let params = self.parse_params();
        let body = if self.token() == SyntaxKind::OpenBraceToken {
            Some(self.parse_block())
        } else {
            None
        };
        InitDecl {
            kind,
            name,
            params,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parse_file;
    use cangjie_ast::dump::Dumper;
    use cangjie_ast::node::*;
    use cangjie_ast::types::Modifiers;

    fn items(source: &str) -> Vec<String> {
        let parse = parse_file(source.as_bytes(), &ParseOptions::default());
        assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
        let dumper = Dumper::for_tree(&parse.tree, source);
        parse.tree.items.iter().map(|id| dumper.decl(*id)).collect()
    }

    fn item(source: &str) -> String {
        let mut items = items(source);
        assert_eq!(items.len(), 1);
        items.remove(0)
    }

    #[test]
    fn generic_function_with_named_params() {
        assert_eq!(
            item("func f<T>(a: T, b!: Int64 = 1): T where T <: Hashable & Equatable { a }"),
            "(func f<T> (a: T b!: Int64 = 1) : T (block a))"
        );
    }

    #[test]
    fn operator_functions() {
        assert_eq!(
            item("extend Point { public operator func +(o: Point): Point { o } }"),
            "(extend Point (func + (o: Point) : Point (block o)))"
        );
        assert_eq!(
            item("extend A { operator func [](i: Int64): Int64 { i } }"),
            "(extend A (func [] (i: Int64) : Int64 (block i)))"
        );
        assert_eq!(
            item("extend A { operator func >>(n: Int64): A { this } }"),
            "(extend A (func >> (n: Int64) : A (block this)))"
        );
    }

    #[test]
    fn class_members() {
        let source = "open class A<T> <: B & C {
    A(let x: T) {}
    init() {}
    static init() {}
    ~init() {}
    public mut prop size: Int64 {
        get() { 0 }
        set(v) { }
    }
    var count = 0
    func get(): T { x }
}";
        assert_eq!(
            item(source),
            "(class A<T> <: B C (primary-init A (let x: T) (block)) (init () (block)) \
             (static-init () (block)) (~init () (block)) \
             (prop size: Int64 (get (block 0)) (set v (block))) (var count 0) \
             (func get () : T (block x)))"
        );
    }

    #[test]
    fn modifiers_are_recorded() {
        let parse = parse_file(b"public open class A {}", &ParseOptions::default());
        let decl = parse.tree.arena.decl(parse.tree.items[0]);
        assert_eq!(decl.modifiers, Modifiers::PUBLIC | Modifiers::OPEN);
    }

    #[test]
    fn enum_cases_and_members() {
        assert_eq!(
            item("enum E<T> { | A | B(T, Int64) | ...\n func f(): Unit {} }"),
            "(enum E<T> |A |B(T, Int64) |... (func f () : Unit (block)))"
        );
        assert_eq!(item("enum Color { Red | Green }"), "(enum Color |Red |Green)");
    }

    #[test]
    fn aliases_extends_and_interfaces() {
        assert_eq!(item("type Pair<T> = (T, T)"), "(type Pair<T> (T, T))");
        assert_eq!(
            item("extend<T> Array<T> <: Printable { }"),
            "(extend<T> Array<T> <: Printable)"
        );
        assert_eq!(
            item("interface I { func f(): Unit\n prop p: Int64 }"),
            "(interface I (func f () : Unit) (prop p: Int64))"
        );
    }

    #[test]
    fn package_and_imports() {
        let source = "macro package a.b\nimport std.collection.*\nfrom std import io.{File, Path as P}, x.y as z\n";
        let parse = parse_file(source.as_bytes(), &ParseOptions::default());
        assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
        let tree = &parse.tree;
        let package = tree.package.as_ref().unwrap();
        assert!(package.is_macro);
        assert_eq!(package.path.len(), 2);

        let paths: Vec<String> = tree
            .imports
            .iter()
            .flat_map(|import| import.items.iter())
            .map(|item| {
                let mut text = item.path.iter().map(|n| tree.name(*n)).collect::<Vec<_>>().join(".");
                if item.wildcard {
                    text.push_str(".*");
                }
                if let Some(alias) = item.alias {
                    text.push_str(" as ");
                    text.push_str(tree.name(alias));
                }
                text
            })
            .collect();
        assert_eq!(paths, ["std.collection.*", "io.File", "io.Path as P", "x.y as z"]);
        assert_eq!(tree.imports[1].from.map(|n| tree.name(n)), Some("std"));
    }

    #[test]
    fn main_is_kept_apart() {
        let parse = parse_file(b"func f() {}\nmain(): Int64 { 0 }", &ParseOptions::default());
        assert!(parse.diagnostics.is_empty());
        assert_eq!(parse.tree.items.len(), 1);
        let main = parse.tree.main.unwrap();
        assert_eq!(
            Dumper::for_tree(&parse.tree, "").decl(main),
            "(main main () : Int64 (block 0))"
        );
    }

    #[test]
    fn annotations_and_macro_expansions() {
        let parse = parse_file(b"@Deprecated[message: \"old\"]\nfunc f() {}\n@Memo(func g() {})", &ParseOptions::default());
        assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
        let first = parse.tree.arena.decl(parse.tree.items[0]);
        assert_eq!(first.annotations.len(), 1);
        assert_eq!(first.annotations[0].args.len(), 1);
        let second = parse.tree.arena.decl(parse.tree.items[1]);
        assert!(matches!(second.kind, DeclKind::MacroExpansion(_)));
    }

    #[test]
    fn foreign_and_macro_definitions() {
        assert_eq!(
            items("foreign { func puts(s: CString): Int32 }\nforeign func abs(x: Int32): Int32"),
            ["(foreign (func puts (s: CString) : Int32))", "(func abs (x: Int32) : Int32)"]
        );
        assert_eq!(
            item("public macro M(input: Tokens): Tokens { input }"),
            "(macro M (input: Tokens) : Tokens (block input))"
        );
    }

    #[test]
    fn misplaced_modifier_is_reported() {
        let parse = parse_file(b"func f() {\n public let x = 1\n}", &ParseOptions::default());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].code, 2015);
    }

    #[test]
    fn bad_member_recovers_at_next_line() {
        let source = "class A {\n 1 + 2\n func f() {}\n}";
        let parse = parse_file(source.as_bytes(), &ParseOptions::default());
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].code, 2013);
        let dumper = Dumper::for_tree(&parse.tree, source);
        assert_eq!(dumper.decl(parse.tree.items[0]), "(class A <error> (func f () (block)))");
    }
}
