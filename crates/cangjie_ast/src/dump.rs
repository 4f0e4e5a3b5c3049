//! S-expression rendering of trees, used by tests and debugging output.
//!
//! `a + b * c` renders as `(+ a (* b c))`, `a?.b` inside its chain as
//! `(chain (?. a b))`, `f(x)` as `(call f x)`.

use crate::node::*;
use cangjie_core::intern::StringInterner;
use std::fmt::Write;

pub struct Dumper<'a> {
    arena: &'a AstArena,
    interner: &'a StringInterner,
    source: &'a str,
}

impl<'a> Dumper<'a> {
    pub fn new(arena: &'a AstArena, interner: &'a StringInterner, source: &'a str) -> Self {
        Self {
            arena,
            interner,
            source,
        }
    }

    pub fn for_tree(tree: &'a ParseTree, source: &'a str) -> Self {
        Self::new(&tree.arena, &tree.interner, source)
    }

    fn name(&self, name: Name) -> &'a str {
        self.interner.resolve(name.text)
    }

    fn path(&self, names: &[Name]) -> String {
        names.iter().map(|n| self.name(*n)).collect::<Vec<_>>().join(".")
    }

    fn text(&self, span: cangjie_core::TextSpan) -> &'a str {
        span.slice(self.source).unwrap_or("")
    }

    fn list<T>(&self, out: &mut String, items: &[T], mut f: impl FnMut(&Self, &mut String, &T)) {
        for item in items {
            out.push(' ');
            f(self, out, item);
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn expr(&self, id: ExprId) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, id);
        out
    }

    fn write_expr(&self, out: &mut String, id: ExprId) {
        let expr = self.arena.expr(id);
        match &expr.kind {
            ExprKind::Error => out.push_str("<error>"),
            ExprKind::Literal(lit) => self.write_literal(out, lit),
            ExprKind::Identifier { name, type_args } => {
                out.push_str(self.name(*name));
                self.write_type_args(out, type_args);
            }
            ExprKind::This => out.push_str("this"),
            ExprKind::Super => out.push_str("super"),
            ExprKind::Unit => out.push_str("()"),
            ExprKind::Wildcard => out.push('_'),
            ExprKind::Parenthesized(inner) => self.sexp(out, "paren", &[*inner]),
            ExprKind::Tuple(items) => self.sexp(out, "tuple", items),
            ExprKind::Array(items) => self.sexp(out, "array", items),
            ExprKind::Spread(inner) => self.sexp(out, "spread", &[*inner]),
            ExprKind::Block(block) => self.write_block(out, block),
            ExprKind::If(if_expr) => {
                out.push_str("(if ");
                self.write_condition(out, &if_expr.condition);
                out.push(' ');
                self.write_block(out, &if_expr.then_block);
                if let Some(else_branch) = if_expr.else_branch {
                    out.push(' ');
                    self.write_expr(out, else_branch);
                }
                out.push(')');
            }
            ExprKind::Match(m) => {
                out.push_str("(match");
                if let Some(selector) = m.selector {
                    out.push(' ');
                    self.write_expr(out, selector);
                }
                for arm in &m.arms {
                    out.push_str(" (case ");
                    match arm.case {
                        MatchCase::Pattern(p) => self.write_pattern(out, p),
                        MatchCase::Condition(e) => self.write_expr(out, e),
                    }
                    if let Some(guard) = arm.guard {
                        out.push_str(" where ");
                        self.write_expr(out, guard);
                    }
                    out.push(' ');
                    self.write_block(out, &arm.body);
                    out.push(')');
                }
                out.push(')');
            }
            ExprKind::For(f) => {
                out.push_str("(for ");
                self.write_pattern(out, f.pattern);
                out.push(' ');
                self.write_expr(out, f.iterable);
                if let Some(guard) = f.guard {
                    out.push_str(" where ");
                    self.write_expr(out, guard);
                }
                out.push(' ');
                self.write_block(out, &f.body);
                out.push(')');
            }
            ExprKind::While(w) => {
                out.push_str("(while ");
                self.write_condition(out, &w.condition);
                out.push(' ');
                self.write_block(out, &w.body);
                out.push(')');
            }
            ExprKind::DoWhile { body, condition } => {
                out.push_str("(do ");
                self.write_block(out, body);
                out.push(' ');
                self.write_expr(out, *condition);
                out.push(')');
            }
            ExprKind::Try(t) => {
                out.push_str("(try");
                for resource in &t.resources {
                    let _ = write!(out, " (resource {} ", self.name(resource.name));
                    self.write_expr(out, resource.value);
                    out.push(')');
                }
                out.push(' ');
                self.write_block(out, &t.body);
                for catch in &t.catches {
                    out.push_str(" (catch ");
                    self.write_pattern(out, catch.pattern);
                    out.push(' ');
                    self.write_block(out, &catch.body);
                    out.push(')');
                }
                if let Some(finally) = &t.finally {
                    out.push_str(" (finally ");
                    self.write_block(out, finally);
                    out.push(')');
                }
                out.push(')');
            }
            ExprKind::Return(value) => match value {
                Some(v) => self.sexp(out, "return", &[*v]),
                None => out.push_str("(return)"),
            },
            ExprKind::Throw(value) => self.sexp(out, "throw", &[*value]),
            ExprKind::Break => out.push_str("(break)"),
            ExprKind::Continue => out.push_str("(continue)"),
            ExprKind::Lambda(lambda) => {
                out.push_str("(lambda (");
                for (i, param) in lambda.params.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    match param.name {
                        Some(name) => out.push_str(self.name(name)),
                        None => out.push('_'),
                    }
                    if let Some(ty) = param.ty {
                        out.push_str(": ");
                        self.write_type(out, ty);
                    }
                }
                out.push(')');
                self.write_items(out, &lambda.body.items);
                out.push(')');
            }
            ExprKind::Spawn { context, body } => {
                out.push_str("(spawn");
                if let Some(ctx) = context {
                    out.push(' ');
                    self.write_expr(out, *ctx);
                }
                out.push(' ');
                self.write_block(out, body);
                out.push(')');
            }
            ExprKind::Synchronized { lock, body } => {
                out.push_str("(synchronized ");
                self.write_expr(out, *lock);
                out.push(' ');
                self.write_block(out, body);
                out.push(')');
            }
            ExprKind::Unsafe(body) => {
                out.push_str("(unsafe ");
                self.write_block(out, body);
                out.push(')');
            }
            ExprKind::Quote(parts) => {
                out.push_str("(quote");
                for part in parts {
                    out.push(' ');
                    match part {
                        QuotePart::Tokens(span) => {
                            let _ = write!(out, "{:?}", self.text(*span));
                        }
                        QuotePart::Splice(e) => self.sexp(out, "$", &[*e]),
                    }
                }
                out.push(')');
            }
            ExprKind::MacroCall(call) => {
                let _ = write!(out, "(@{}", self.path(&call.name));
                if let Some(attrs) = call.attributes {
                    let _ = write!(out, " [{}]", self.text(attrs));
                }
                let _ = write!(out, " ({})", self.text(call.input));
                out.push(')');
            }
            ExprKind::Binary { op, lhs, rhs, .. } => self.sexp(out, op.symbol(), &[*lhs, *rhs]),
            ExprKind::Unary { op, operand, .. } => self.sexp(out, op.symbol(), &[*operand]),
            ExprKind::Postfix { op, operand } => {
                let head = format!("post{}", op.symbol());
                self.sexp(out, &head, &[*operand]);
            }
            ExprKind::Assign { op, target, value } => self.sexp(out, op.symbol(), &[*target, *value]),
            ExprKind::Range {
                start,
                end,
                inclusive,
                step,
            } => {
                out.push_str(if *inclusive { "(..=" } else { "(.." });
                for bound in [start, end] {
                    out.push(' ');
                    match bound {
                        Some(e) => self.write_expr(out, *e),
                        None => out.push_str("none"),
                    }
                }
                if let Some(step) = step {
                    out.push_str(" : ");
                    self.write_expr(out, *step);
                }
                out.push(')');
            }
            ExprKind::Field {
                target,
                name,
                type_args,
                optional,
            } => {
                out.push_str(if *optional { "(?. " } else { "(. " });
                self.write_expr(out, *target);
                out.push(' ');
                out.push_str(self.name(*name));
                self.write_type_args(out, type_args);
                out.push(')');
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => {
                out.push_str(if *optional { "(?call " } else { "(call " });
                self.write_expr(out, *callee);
                self.list(out, args, |d, out, arg| d.write_argument(out, arg));
                out.push(')');
            }
            ExprKind::Index {
                target,
                index,
                optional,
            } => self.sexp(out, if *optional { "?index" } else { "index" }, &[*target, *index]),
            ExprKind::TrailingLambda {
                callee,
                lambda,
                optional,
            } => self.sexp(out, if *optional { "?trailing" } else { "trailing" }, &[*callee, *lambda]),
            ExprKind::OptionalChain(inner) => self.sexp(out, "chain", &[*inner]),
            ExprKind::TypeCast { expr, ty } => {
                out.push_str("(as ");
                self.write_expr(out, *expr);
                out.push(' ');
                self.write_type(out, *ty);
                out.push(')');
            }
            ExprKind::TypeCheck { expr, ty } => {
                out.push_str("(is ");
                self.write_expr(out, *expr);
                out.push(' ');
                self.write_type(out, *ty);
                out.push(')');
            }
            ExprKind::TypeExpr(ty) => {
                out.push_str("(type ");
                self.write_type(out, *ty);
                out.push(')');
            }
        }
    }

    fn sexp(&self, out: &mut String, head: &str, children: &[ExprId]) {
        out.push('(');
        out.push_str(head);
        for child in children {
            out.push(' ');
            self.write_expr(out, *child);
        }
        out.push(')');
    }

    fn write_literal(&self, out: &mut String, lit: &Literal) {
        match lit {
            Literal::Integer(n) | Literal::Float(n) => {
                out.push_str(&n.digits);
                if let Some(suffix) = &n.suffix {
                    out.push_str(suffix);
                }
            }
            Literal::Rune(c) => {
                let _ = write!(out, "r{:?}", c);
            }
            Literal::Byte(b) => {
                let _ = write!(out, "b{}", b);
            }
            Literal::ByteString(bytes) => {
                let _ = write!(out, "b{:?}", String::from_utf8_lossy(bytes));
            }
            Literal::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Literal::RawString { text, .. } => {
                let _ = write!(out, "{:?}", text);
            }
            Literal::String(s) => match s.as_plain() {
                Some(text) => {
                    let _ = write!(out, "{:?}", text);
                }
                None => {
                    out.push_str("(str");
                    for part in &s.parts {
                        out.push(' ');
                        match part {
                            StringPart::Text(text) => {
                                let _ = write!(out, "{:?}", text);
                            }
                            StringPart::Interpolation(block) => self.write_block(out, block),
                        }
                    }
                    out.push(')');
                }
            },
        }
    }

    fn write_argument(&self, out: &mut String, arg: &Argument) {
        match (arg.name, arg.inout) {
            (Some(name), _) => {
                let _ = write!(out, "(named {} ", self.name(name));
                self.write_expr(out, arg.value);
                out.push(')');
            }
            (None, true) => self.sexp(out, "inout", &[arg.value]),
            (None, false) => self.write_expr(out, arg.value),
        }
    }

    fn write_condition(&self, out: &mut String, condition: &Condition) {
        match condition {
            Condition::Expr(e) => self.write_expr(out, *e),
            Condition::Let { pattern, value } => {
                out.push_str("(let ");
                self.write_pattern(out, *pattern);
                out.push(' ');
                self.write_expr(out, *value);
                out.push(')');
            }
        }
    }

    fn write_block(&self, out: &mut String, block: &Block) {
        out.push_str("(block");
        self.write_items(out, &block.items);
        out.push(')');
    }

    fn write_items(&self, out: &mut String, items: &[BlockItem]) {
        for item in items {
            out.push(' ');
            match item {
                BlockItem::Expr(e) => self.write_expr(out, *e),
                BlockItem::Decl(d) => self.write_decl(out, *d),
            }
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub fn ty(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    fn write_type_args(&self, out: &mut String, args: &[TypeId]) {
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, *arg);
        }
        out.push('>');
    }

    fn write_tuple_elements(&self, out: &mut String, elements: &[TupleTypeElement]) {
        out.push('(');
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(label) = element.label {
                out.push_str(self.name(label));
                out.push_str(": ");
            }
            self.write_type(out, element.ty);
        }
        out.push(')');
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        match &self.arena.ty(id).kind {
            TypeKind::Error => out.push_str("<error>"),
            TypeKind::Builtin(b) => out.push_str(b.name()),
            TypeKind::Named(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(self.name(segment.name));
                    self.write_type_args(out, &segment.args);
                }
            }
            TypeKind::Tuple(elements) => self.write_tuple_elements(out, elements),
            TypeKind::Arrow { params, ret } => {
                out.push('(');
                self.write_tuple_elements(out, params);
                out.push_str(" -> ");
                self.write_type(out, *ret);
                out.push(')');
            }
            TypeKind::Optional(inner) => {
                out.push('?');
                self.write_type(out, *inner);
            }
            TypeKind::Parenthesized(inner) => {
                out.push_str("(paren ");
                self.write_type(out, *inner);
                out.push(')');
            }
        }
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    pub fn pattern(&self, id: PatternId) -> String {
        let mut out = String::new();
        self.write_pattern(&mut out, id);
        out
    }

    fn write_pattern(&self, out: &mut String, id: PatternId) {
        match &self.arena.pattern(id).kind {
            PatternKind::Error => out.push_str("<error>"),
            PatternKind::Wildcard => out.push('_'),
            PatternKind::Binding(name) => out.push_str(self.name(*name)),
            PatternKind::Tuple(items) => {
                out.push_str("(tuple");
                for item in items {
                    out.push(' ');
                    self.write_pattern(out, *item);
                }
                out.push(')');
            }
            PatternKind::Constant(values) => {
                if let [single] = values.as_slice() {
                    self.write_expr(out, *single);
                } else {
                    self.sexp(out, "|", values);
                }
            }
            PatternKind::TypeAnnotated { binding, types } => {
                out.push_str("(: ");
                match binding {
                    Some(name) => out.push_str(self.name(*name)),
                    None => out.push('_'),
                }
                for ty in types {
                    out.push(' ');
                    self.write_type(out, *ty);
                }
                out.push(')');
            }
            PatternKind::Enum(variants) => {
                if variants.len() > 1 {
                    out.push_str("(|");
                }
                for (i, variant) in variants.iter().enumerate() {
                    if variants.len() > 1 || i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&self.path(&variant.path));
                    self.write_type_args(out, &variant.type_args);
                    if !variant.args.is_empty() {
                        out.push('(');
                        for (j, arg) in variant.args.iter().enumerate() {
                            if j > 0 {
                                out.push(' ');
                            }
                            self.write_pattern(out, *arg);
                        }
                        out.push(')');
                    }
                }
                if variants.len() > 1 {
                    out.push(')');
                }
            }
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn decl(&self, id: DeclId) -> String {
        let mut out = String::new();
        self.write_decl(&mut out, id);
        out
    }

    fn write_generics(&self, out: &mut String, generics: &[Name]) {
        if generics.is_empty() {
            return;
        }
        out.push('<');
        out.push_str(&generics.iter().map(|g| self.name(*g)).collect::<Vec<_>>().join(", "));
        out.push('>');
    }

    fn write_params(&self, out: &mut String, params: &[Param]) {
        out.push_str(" (");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if let Some(member) = param.member {
                out.push_str(member.keyword());
                out.push(' ');
            }
            out.push_str(self.name(param.name));
            if param.named {
                out.push('!');
            }
            out.push_str(": ");
            self.write_type(out, param.ty);
            if let Some(default) = param.default {
                out.push_str(" = ");
                self.write_expr(out, default);
            }
        }
        out.push(')');
    }

    fn write_func(&self, out: &mut String, head: &str, func: &FuncDecl) {
        let _ = write!(out, "({} {}", head, self.name(func.name));
        self.write_generics(out, &func.generics);
        self.write_params(out, &func.params);
        if let Some(ret) = func.ret {
            out.push_str(" : ");
            self.write_type(out, ret);
        }
        if let Some(body) = &func.body {
            out.push(' ');
            self.write_block(out, body);
        }
        out.push(')');
    }

    fn write_members(&self, out: &mut String, supertypes: &[TypeId], members: &[DeclId]) {
        if !supertypes.is_empty() {
            out.push_str(" <:");
            for ty in supertypes {
                out.push(' ');
                self.write_type(out, *ty);
            }
        }
        for member in members {
            out.push(' ');
            self.write_decl(out, *member);
        }
    }

    fn write_decl(&self, out: &mut String, id: DeclId) {
        let decl = self.arena.decl(id);
        match &decl.kind {
            DeclKind::Error => out.push_str("<error>"),
            DeclKind::Var(var) => {
                let _ = write!(out, "({} ", var.kind.keyword());
                self.write_pattern(out, var.pattern);
                if let Some(ty) = var.ty {
                    out.push_str(": ");
                    self.write_type(out, ty);
                }
                if let Some(value) = var.value {
                    out.push(' ');
                    self.write_expr(out, value);
                }
                out.push(')');
            }
            DeclKind::Func(func) => self.write_func(out, "func", func),
            DeclKind::Main(func) => self.write_func(out, "main", func),
            DeclKind::MacroDef(func) => self.write_func(out, "macro", func),
            DeclKind::Class(t) | DeclKind::Struct(t) | DeclKind::Interface(t) => {
                let head = match &decl.kind {
                    DeclKind::Class(_) => "class",
                    DeclKind::Struct(_) => "struct",
                    _ => "interface",
                };
                let _ = write!(out, "({} {}", head, self.name(t.name));
                self.write_generics(out, &t.generics);
                self.write_members(out, &t.supertypes, &t.members);
                out.push(')');
            }
            DeclKind::Enum(e) => {
                let _ = write!(out, "(enum {}", self.name(e.name));
                self.write_generics(out, &e.generics);
                for case in &e.cases {
                    let _ = write!(out, " |{}", self.name(case.name));
                    if !case.params.is_empty() {
                        out.push('(');
                        for (i, p) in case.params.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            self.write_type(out, *p);
                        }
                        out.push(')');
                    }
                }
                if e.non_exhaustive {
                    out.push_str(" |...");
                }
                self.write_members(out, &e.supertypes, &e.members);
                out.push(')');
            }
            DeclKind::TypeAlias { name, generics, ty } => {
                let _ = write!(out, "(type {}", self.name(*name));
                self.write_generics(out, generics);
                out.push(' ');
                self.write_type(out, *ty);
                out.push(')');
            }
            DeclKind::Extend(ext) => {
                out.push_str("(extend");
                self.write_generics(out, &ext.generics);
                out.push(' ');
                self.write_type(out, ext.target);
                self.write_members(out, &ext.supertypes, &ext.members);
                out.push(')');
            }
            DeclKind::Prop(prop) => {
                let _ = write!(out, "(prop {}: ", self.name(prop.name));
                self.write_type(out, prop.ty);
                if let Some(getter) = &prop.getter {
                    out.push_str(" (get ");
                    self.write_block(out, getter);
                    out.push(')');
                }
                if let Some((param, setter)) = &prop.setter {
                    let _ = write!(out, " (set {} ", self.name(*param));
                    self.write_block(out, setter);
                    out.push(')');
                }
                out.push(')');
            }
            DeclKind::Init(init) => {
                let head = match init.kind {
                    InitKind::Regular => "init".to_string(),
                    InitKind::Static => "static-init".to_string(),
                    InitKind::Finalizer => "~init".to_string(),
                    InitKind::Primary => match init.name {
                        Some(name) => format!("primary-init {}", self.name(name)),
                        None => "primary-init".to_string(),
                    },
                };
                let _ = write!(out, "({}", head);
                self.write_params(out, &init.params);
                if let Some(body) = &init.body {
                    out.push(' ');
                    self.write_block(out, body);
                }
                out.push(')');
            }
            DeclKind::Foreign(items) => {
                out.push_str("(foreign");
                for item in items {
                    out.push(' ');
                    self.write_decl(out, *item);
                }
                out.push(')');
            }
            DeclKind::MacroExpansion(call) => self.write_expr(out, *call),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{BinaryOperator, OperatorPrecedence};
    use cangjie_core::TextSpan;

    #[test]
    fn binary_tree_renders_as_sexp() {
        let interner = StringInterner::new();
        let mut arena = AstArena::new();
        let span = TextSpan::empty(0);
        let ident = |arena: &mut AstArena, text: &str| {
            let name = Name::new(interner.intern(text), span);
            arena.alloc_expr(
                ExprKind::Identifier {
                    name,
                    type_args: Vec::new(),
                },
                span,
            )
        };
        let a = ident(&mut arena, "a");
        let b = ident(&mut arena, "b");
        let c = ident(&mut arena, "c");
        let mul = arena.alloc_expr(
            ExprKind::Binary {
                op: BinaryOperator::Multiply,
                lhs: b,
                rhs: c,
                precedence: OperatorPrecedence::Multiplicative,
            },
            span,
        );
        let add = arena.alloc_expr(
            ExprKind::Binary {
                op: BinaryOperator::Add,
                lhs: a,
                rhs: mul,
                precedence: OperatorPrecedence::Additive,
            },
            span,
        );
        let dumper = Dumper::new(&arena, &interner, "");
        assert_eq!(dumper.expr(add), "(+ a (* b c))");
    }

    #[test]
    fn constant_alternatives_render_with_bar() {
        let interner = StringInterner::new();
        let mut arena = AstArena::new();
        let span = TextSpan::empty(0);
        let values: Vec<ExprId> = ["1", "2"]
            .iter()
            .map(|d| {
                let lit = Literal::Integer(NumberLiteral {
                    digits: (*d).into(),
                    suffix: None,
                });
                arena.alloc_expr(ExprKind::Literal(lit), span)
            })
            .collect();
        let pattern = arena.alloc_pattern(PatternKind::Constant(values), span);
        let dumper = Dumper::new(&arena, &interner, "");
        assert_eq!(dumper.pattern(pattern), "(| 1 2)");
    }
}
