//! Syntax tree node definitions.
//!
//! Every node lives in one of the four arenas of an [`AstArena`] and refers
//! to its children by id. Nodes keep only semantic shape: which grammar
//! rule produced them is not recorded.

use crate::operator::*;
use crate::types::Modifiers;
use cangjie_core::arena::Arena;
use cangjie_core::define_id;
use cangjie_core::intern::{InternedString, StringInterner};
use cangjie_core::text::TextSpan;

define_id! {
    /// Index of an [`Expr`] in its tree.
    pub struct ExprId;
}
define_id! {
    /// Index of a [`Type`] in its tree.
    pub struct TypeId;
}
define_id! {
    /// Index of a [`Pattern`] in its tree.
    pub struct PatternId;
}
define_id! {
    /// Index of a [`Decl`] in its tree.
    pub struct DeclId;
}

// ============================================================================
// Names
// ============================================================================

/// An identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    pub text: InternedString,
    pub span: TextSpan,
}

impl Name {
    pub fn new(text: InternedString, span: TextSpan) -> Self {
        Self { text, span }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Placeholder produced by error recovery. Its span is the span of the
    /// diagnostic that caused it.
    Error,
    Literal(Literal),
    Identifier {
        name: Name,
        type_args: Vec<TypeId>,
    },
    This,
    Super,
    /// `()`
    Unit,
    /// `_` as an assignment target.
    Wildcard,
    Parenthesized(ExprId),
    Tuple(Vec<ExprId>),
    Array(Vec<ExprId>),
    /// `*e` inside an array literal.
    Spread(ExprId),
    Block(Block),
    If(Box<IfExpr>),
    Match(Box<MatchExpr>),
    For(Box<ForExpr>),
    While(Box<WhileExpr>),
    DoWhile {
        body: Block,
        condition: ExprId,
    },
    Try(Box<TryExpr>),
    Return(Option<ExprId>),
    Throw(ExprId),
    Break,
    Continue,
    Lambda(Box<Lambda>),
    Spawn {
        context: Option<ExprId>,
        body: Block,
    },
    Synchronized {
        lock: ExprId,
        body: Block,
    },
    Unsafe(Block),
    Quote(Vec<QuotePart>),
    MacroCall(Box<MacroCall>),
    Binary {
        op: BinaryOperator,
        lhs: ExprId,
        rhs: ExprId,
        precedence: OperatorPrecedence,
    },
    Unary {
        op: UnaryOperator,
        operand: ExprId,
        precedence: OperatorPrecedence,
    },
    Postfix {
        op: PostfixOperator,
        operand: ExprId,
    },
    Assign {
        op: AssignOperator,
        target: ExprId,
        value: ExprId,
    },
    Range {
        start: Option<ExprId>,
        end: Option<ExprId>,
        inclusive: bool,
        step: Option<ExprId>,
    },
    Field {
        target: ExprId,
        name: Name,
        type_args: Vec<TypeId>,
        optional: bool,
    },
    Call {
        callee: ExprId,
        args: Vec<Argument>,
        optional: bool,
    },
    Index {
        target: ExprId,
        index: ExprId,
        optional: bool,
    },
    TrailingLambda {
        callee: ExprId,
        lambda: ExprId,
        optional: bool,
    },
    /// Root of a postfix chain that contains at least one `?` link.
    OptionalChain(ExprId),
    TypeCast {
        expr: ExprId,
        ty: TypeId,
    },
    TypeCheck {
        expr: ExprId,
        ty: TypeId,
    },
    /// A type in value position, e.g. `(Int64) -> Unit` as an argument.
    TypeExpr(TypeId),
}

impl ExprKind {
    /// Whether an expression of this shape may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            ExprKind::Identifier { .. }
                | ExprKind::Wildcard
                | ExprKind::Field { .. }
                | ExprKind::Index { .. }
                | ExprKind::Tuple(_)
                | ExprKind::OptionalChain(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(NumberLiteral),
    Float(NumberLiteral),
    Rune(char),
    Byte(u8),
    ByteString(Vec<u8>),
    Bool(bool),
    String(StringLiteral),
    RawString { text: String, fence: u32 },
}

/// Numeric literal text with separators removed and the suffix split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLiteral {
    pub digits: Box<str>,
    pub suffix: Option<Box<str>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub parts: Vec<StringPart>,
    pub multi_line: bool,
}

impl StringLiteral {
    /// The text of a string without holes.
    pub fn as_plain(&self) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                StringPart::Text(text) => out.push_str(text),
                StringPart::Interpolation(_) => return None,
            }
        }
        Some(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    Interpolation(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<BlockItem>,
    pub span: TextSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockItem {
    Expr(ExprId),
    Decl(DeclId),
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Option<Name>,
    pub inout: bool,
    pub value: ExprId,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum Condition {
    Expr(ExprId),
    /// `let pattern <- value`
    Let { pattern: PatternId, value: ExprId },
}

#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Condition,
    pub then_block: Block,
    /// Either an `If` expression (`else if`) or a `Block`.
    pub else_branch: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub struct MatchExpr {
    pub selector: Option<ExprId>,
    pub arms: Vec<MatchArm>,
}

#[derive(Debug, Clone)]
pub enum MatchCase {
    Pattern(PatternId),
    /// An arm of a selector-less `match`.
    Condition(ExprId),
}

#[derive(Debug, Clone)]
pub struct MatchArm {
    pub case: MatchCase,
    pub guard: Option<ExprId>,
    pub body: Block,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct ForExpr {
    pub pattern: PatternId,
    pub iterable: ExprId,
    pub guard: Option<ExprId>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct WhileExpr {
    pub condition: Condition,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct TryExpr {
    pub resources: Vec<TryResource>,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct TryResource {
    pub name: Name,
    pub ty: Option<TypeId>,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub pattern: PatternId,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: Vec<LambdaParam>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct LambdaParam {
    /// `None` for `_`.
    pub name: Option<Name>,
    pub ty: Option<TypeId>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum QuotePart {
    /// A run of tokens taken verbatim.
    Tokens(TextSpan),
    /// `$name` or `$(expr)`.
    Splice(ExprId),
}

#[derive(Debug, Clone)]
pub struct MacroCall {
    pub name: Vec<Name>,
    /// Text inside `[...]`, if present.
    pub attributes: Option<TextSpan>,
    /// Text inside `(...)`.
    pub input: TextSpan,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Type {
    pub kind: TypeKind,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Error,
    Builtin(BuiltinType),
    Named(Vec<PathSegment>),
    /// Two or more elements, optionally labelled.
    Tuple(Vec<TupleTypeElement>),
    Arrow {
        params: Vec<TupleTypeElement>,
        ret: TypeId,
    },
    /// `?T`
    Optional(TypeId),
    Parenthesized(TypeId),
}

#[derive(Debug, Clone)]
pub struct PathSegment {
    pub name: Name,
    pub args: Vec<TypeId>,
}

#[derive(Debug, Clone)]
pub struct TupleTypeElement {
    pub label: Option<Name>,
    pub ty: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int8,
    Int16,
    Int32,
    Int64,
    IntNative,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UIntNative,
    Float16,
    Float32,
    Float64,
    Rune,
    Bool,
    Unit,
    Nothing,
    This,
}

impl BuiltinType {
    pub fn from_name(name: &str) -> Option<BuiltinType> {
        let ty = match name {
            "Int8" => BuiltinType::Int8,
            "Int16" => BuiltinType::Int16,
            "Int32" => BuiltinType::Int32,
            "Int64" => BuiltinType::Int64,
            "IntNative" => BuiltinType::IntNative,
            "UInt8" => BuiltinType::UInt8,
            "UInt16" => BuiltinType::UInt16,
            "UInt32" => BuiltinType::UInt32,
            "UInt64" => BuiltinType::UInt64,
            "UIntNative" => BuiltinType::UIntNative,
            "Float16" => BuiltinType::Float16,
            "Float32" => BuiltinType::Float32,
            "Float64" => BuiltinType::Float64,
            "Rune" => BuiltinType::Rune,
            "Bool" | "Boolean" => BuiltinType::Bool,
            "Unit" => BuiltinType::Unit,
            "Nothing" => BuiltinType::Nothing,
            "This" => BuiltinType::This,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int8 => "Int8",
            BuiltinType::Int16 => "Int16",
            BuiltinType::Int32 => "Int32",
            BuiltinType::Int64 => "Int64",
            BuiltinType::IntNative => "IntNative",
            BuiltinType::UInt8 => "UInt8",
            BuiltinType::UInt16 => "UInt16",
            BuiltinType::UInt32 => "UInt32",
            BuiltinType::UInt64 => "UInt64",
            BuiltinType::UIntNative => "UIntNative",
            BuiltinType::Float16 => "Float16",
            BuiltinType::Float32 => "Float32",
            BuiltinType::Float64 => "Float64",
            BuiltinType::Rune => "Rune",
            BuiltinType::Bool => "Bool",
            BuiltinType::Unit => "Unit",
            BuiltinType::Nothing => "Nothing",
            BuiltinType::This => "This",
        }
    }
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    Error,
    Wildcard,
    Binding(Name),
    Tuple(Vec<PatternId>),
    /// Literal alternatives in source order: `1 | 2 | 3`.
    Constant(Vec<ExprId>),
    /// `e: T` or `_: T1 | T2`; the binding is `None` for `_`.
    TypeAnnotated {
        binding: Option<Name>,
        types: Vec<TypeId>,
    },
    /// Enum-variant alternatives in source order: `Some(x) | None`.
    Enum(Vec<EnumVariantPattern>),
}

#[derive(Debug, Clone)]
pub struct EnumVariantPattern {
    /// Qualifying path followed by the variant name.
    pub path: Vec<Name>,
    pub type_args: Vec<TypeId>,
    pub args: Vec<PatternId>,
    pub span: TextSpan,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: TextSpan,
    pub annotations: Vec<Annotation>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub path: Vec<Name>,
    pub args: Vec<Argument>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    /// A malformed declaration; spans the skipped text.
    Error,
    Var(VarDecl),
    Func(Box<FuncDecl>),
    Main(Box<FuncDecl>),
    Class(Box<TypeDecl>),
    Struct(Box<TypeDecl>),
    Interface(Box<TypeDecl>),
    Enum(Box<EnumDecl>),
    TypeAlias {
        name: Name,
        generics: Vec<Name>,
        ty: TypeId,
    },
    Extend(Box<ExtendDecl>),
    Prop(Box<PropDecl>),
    Init(Box<InitDecl>),
    /// `foreign { ... }`
    Foreign(Vec<DeclId>),
    MacroDef(Box<FuncDecl>),
    /// A macro call in declaration position.
    MacroExpansion(ExprId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Let,
    Var,
    Const,
}

impl VarKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VarKind::Let => "let",
            VarKind::Var => "var",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub kind: VarKind,
    pub pattern: PatternId,
    pub ty: Option<TypeId>,
    pub value: Option<ExprId>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Name,
    /// `name!: T`
    pub named: bool,
    /// `let`/`var` on a primary-init parameter declares a member.
    pub member: Option<VarKind>,
    pub ty: TypeId,
    pub default: Option<ExprId>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct GenericConstraint {
    pub param: Name,
    pub bounds: Vec<TypeId>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// The function name; for `operator func` the interned operator text.
    pub name: Name,
    pub generics: Vec<Name>,
    pub params: Vec<Param>,
    pub ret: Option<TypeId>,
    pub constraints: Vec<GenericConstraint>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: Name,
    pub generics: Vec<Name>,
    pub supertypes: Vec<TypeId>,
    pub constraints: Vec<GenericConstraint>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct EnumCase {
    pub name: Name,
    pub params: Vec<TypeId>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: Name,
    pub generics: Vec<Name>,
    pub supertypes: Vec<TypeId>,
    pub constraints: Vec<GenericConstraint>,
    pub cases: Vec<EnumCase>,
    /// Trailing `...` case.
    pub non_exhaustive: bool,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct ExtendDecl {
    pub generics: Vec<Name>,
    pub target: TypeId,
    pub supertypes: Vec<TypeId>,
    pub constraints: Vec<GenericConstraint>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct PropDecl {
    pub name: Name,
    pub ty: TypeId,
    pub getter: Option<Block>,
    pub setter: Option<(Name, Block)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
    /// `init(...)`
    Regular,
    /// `TypeName(...)` inside the type body.
    Primary,
    /// `static init()`
    Static,
    /// `~init()`
    Finalizer,
}

#[derive(Debug, Clone)]
pub struct InitDecl {
    pub kind: InitKind,
    /// Present for primary inits only.
    pub name: Option<Name>,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

// ============================================================================
// File
// ============================================================================

#[derive(Debug, Clone)]
pub struct PackageHeader {
    pub is_macro: bool,
    pub path: Vec<Name>,
    pub modifiers: Modifiers,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub from: Option<Name>,
    pub items: Vec<ImportItem>,
    pub modifiers: Modifiers,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct ImportItem {
    pub path: Vec<Name>,
    /// `a.b.*`
    pub wildcard: bool,
    pub alias: Option<Name>,
    pub span: TextSpan,
}

/// Arena sizes at some point of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaCheckpoint {
    exprs: usize,
    types: usize,
    patterns: usize,
    decls: usize,
}

/// Storage for every node of one file.
#[derive(Debug, Clone, Default)]
pub struct AstArena {
    pub exprs: Arena<ExprId, Expr>,
    pub types: Arena<TypeId, Type>,
    pub patterns: Arena<PatternId, Pattern>,
    pub decls: Arena<DeclId, Decl>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_expr(&mut self, kind: ExprKind, span: TextSpan) -> ExprId {
        self.exprs.alloc(Expr { kind, span })
    }

    #[inline]
    pub fn alloc_type(&mut self, kind: TypeKind, span: TextSpan) -> TypeId {
        self.types.alloc(Type { kind, span })
    }

    #[inline]
    pub fn alloc_pattern(&mut self, kind: PatternKind, span: TextSpan) -> PatternId {
        self.patterns.alloc(Pattern { kind, span })
    }

    #[inline]
    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.alloc(decl)
    }

    /// Record the current size of every arena.
    pub fn checkpoint(&self) -> ArenaCheckpoint {
        ArenaCheckpoint {
            exprs: self.exprs.len(),
            types: self.types.len(),
            patterns: self.patterns.len(),
            decls: self.decls.len(),
        }
    }

    /// Discard every node allocated since `checkpoint` was taken.
    pub fn rollback(&mut self, checkpoint: ArenaCheckpoint) {
        self.exprs.truncate(checkpoint.exprs);
        self.types.truncate(checkpoint.types);
        self.patterns.truncate(checkpoint.patterns);
        self.decls.truncate(checkpoint.decls);
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id]
    }

    #[inline]
    pub fn pattern(&self, id: PatternId) -> &Pattern {
        &self.patterns[id]
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id]
    }
}

/// The result of parsing one file. Owns every node.
#[derive(Debug, Clone)]
pub struct ParseTree {
    pub package: Option<PackageHeader>,
    pub imports: Vec<ImportDecl>,
    /// Top-level items in source order, `main` excluded.
    pub items: Vec<DeclId>,
    pub main: Option<DeclId>,
    pub arena: AstArena,
    pub interner: StringInterner,
}

impl ParseTree {
    pub fn new(interner: StringInterner) -> Self {
        Self {
            package: None,
            imports: Vec::new(),
            items: Vec::new(),
            main: None,
            arena: AstArena::new(),
            interner,
        }
    }

    /// Resolve an interned name.
    pub fn name(&self, name: Name) -> &str {
        self.interner.resolve(name.text)
    }
}
