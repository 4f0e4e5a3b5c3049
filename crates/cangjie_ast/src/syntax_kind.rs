//! SyntaxKind enum - every token kind the Cangjie scanner produces.
//!
//! Kinds are grouped in contiguous ranges (literals, keywords, punctuation,
//! assignment operators) so the classification helpers are range checks.

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Special
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,

    // ========================================================================
    // Literals
    // ========================================================================
    IntegerLiteral,
    FloatLiteral,
    RuneLiteral,
    ByteLiteral,
    ByteStringLiteral,
    /// A complete `#"..."#` raw string; the token value holds the body.
    RawStringLiteral,

    // String pieces. A line or multi-line string is scanned as a start
    // token, then any number of content/interpolation pieces, then an end.
    /// `"` or `'` opening a line string.
    StringStart,
    /// `"""` opening a multi-line string.
    MultiLineStringStart,
    /// A run of literal text with escapes already processed.
    StringContent,
    /// `${` inside a string body.
    InterpolationStart,
    /// The `}` closing an interpolation hole.
    InterpolationEnd,
    /// The closing quote(s) of a string.
    StringEnd,

    // ========================================================================
    // Identifiers
    // ========================================================================
    Identifier,
    /// A backtick-escaped identifier such as `` `class` ``.
    RawIdentifier,
    /// `$name`, used inside `quote(...)`.
    DollarIdentifier,

    // ========================================================================
    // Keywords
    // ========================================================================
    AsKeyword,
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExtendKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    ForeignKeyword,
    FromKeyword,
    FuncKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InitKeyword,
    InoutKeyword,
    InterfaceKeyword,
    IsKeyword,
    LetKeyword,
    MacroKeyword,
    MainKeyword,
    MatchKeyword,
    OperatorKeyword,
    PackageKeyword,
    PropKeyword,
    QuoteKeyword,
    ReturnKeyword,
    SpawnKeyword,
    StaticKeyword,
    StructKeyword,
    SuperKeyword,
    SynchronizedKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeKeyword,
    UnsafeKeyword,
    VarKeyword,
    WhereKeyword,
    WhileKeyword,

    // ========================================================================
    // Punctuation
    // ========================================================================
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotToken,
    DotDotEqualsToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    ColonToken,
    QuestionToken,
    QuestionQuestionToken,
    LessThanToken,
    LessThanEqualsToken,
    /// `>` is always scanned alone; the parser rescans it into the
    /// longer forms below when it sits in operator position.
    GreaterThanToken,
    GreaterThanEqualsToken,
    GreaterThanGreaterThanToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    MinusGreaterThanToken,
    EqualsGreaterThanToken,
    LessThanMinusToken,
    LessThanColonToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    TildeGreaterThanToken,
    AmpersandAmpersandToken,
    BarBarToken,
    BarGreaterThanToken,
    AtToken,
    HashToken,
    DollarToken,
    BackslashToken,
    UnderscoreToken,

    // Assignment operators (contiguous).
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    AmpersandEqualsToken,
    CaretEqualsToken,
    BarEqualsToken,
    AmpersandAmpersandEqualsToken,
    BarBarEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AsKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::WhileKeyword;
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::GreaterThanGreaterThanEqualsToken;
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::GreaterThanGreaterThanEqualsToken;

    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    /// Whether this kind represents a keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    /// Whether this kind represents a punctuation or operator token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.in_range(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    /// Whether this kind is a literal token that stands alone.
    #[inline]
    pub fn is_literal(self) -> bool {
        self.in_range(SyntaxKind::IntegerLiteral, SyntaxKind::RawStringLiteral)
            || matches!(self, SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword)
    }

    /// Whether this kind opens a (possibly interpolated) string.
    #[inline]
    pub fn is_string_start(self) -> bool {
        matches!(self, SyntaxKind::StringStart | SyntaxKind::MultiLineStringStart)
    }

    #[inline]
    pub fn is_identifier(self) -> bool {
        matches!(self, SyntaxKind::Identifier | SyntaxKind::RawIdentifier)
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.in_range(Self::FIRST_ASSIGNMENT, Self::LAST_ASSIGNMENT)
    }

    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self.in_range(SyntaxKind::PlusEqualsToken, Self::LAST_ASSIGNMENT)
    }

    /// Whether a token of this kind closes a bracketed region or separates
    /// list elements.
    #[inline]
    pub fn is_closer_or_separator(self) -> bool {
        matches!(
            self,
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EqualsGreaterThanToken
                | SyntaxKind::InterpolationEnd
                | SyntaxKind::EndOfFileToken
        )
    }

    /// Get the keyword text for a keyword kind.
    pub fn keyword_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::AsKeyword => "as",
            SyntaxKind::BreakKeyword => "break",
            SyntaxKind::CaseKeyword => "case",
            SyntaxKind::CatchKeyword => "catch",
            SyntaxKind::ClassKeyword => "class",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::ContinueKeyword => "continue",
            SyntaxKind::DoKeyword => "do",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::ExtendKeyword => "extend",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::FinallyKeyword => "finally",
            SyntaxKind::ForKeyword => "for",
            SyntaxKind::ForeignKeyword => "foreign",
            SyntaxKind::FromKeyword => "from",
            SyntaxKind::FuncKeyword => "func",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::InKeyword => "in",
            SyntaxKind::InitKeyword => "init",
            SyntaxKind::InoutKeyword => "inout",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::IsKeyword => "is",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::MacroKeyword => "macro",
            SyntaxKind::MainKeyword => "main",
            SyntaxKind::MatchKeyword => "match",
            SyntaxKind::OperatorKeyword => "operator",
            SyntaxKind::PackageKeyword => "package",
            SyntaxKind::PropKeyword => "prop",
            SyntaxKind::QuoteKeyword => "quote",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::SpawnKeyword => "spawn",
            SyntaxKind::StaticKeyword => "static",
            SyntaxKind::StructKeyword => "struct",
            SyntaxKind::SuperKeyword => "super",
            SyntaxKind::SynchronizedKeyword => "synchronized",
            SyntaxKind::ThisKeyword => "this",
            SyntaxKind::ThrowKeyword => "throw",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::TryKeyword => "try",
            SyntaxKind::TypeKeyword => "type",
            SyntaxKind::UnsafeKeyword => "unsafe",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::WhereKeyword => "where",
            SyntaxKind::WhileKeyword => "while",
            _ => return None,
        };
        Some(text)
    }

    /// Look up a keyword by its text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "as" => SyntaxKind::AsKeyword,
            "break" => SyntaxKind::BreakKeyword,
            "case" => SyntaxKind::CaseKeyword,
            "catch" => SyntaxKind::CatchKeyword,
            "class" => SyntaxKind::ClassKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "continue" => SyntaxKind::ContinueKeyword,
            "do" => SyntaxKind::DoKeyword,
            "else" => SyntaxKind::ElseKeyword,
            "enum" => SyntaxKind::EnumKeyword,
            "extend" => SyntaxKind::ExtendKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "finally" => SyntaxKind::FinallyKeyword,
            "for" => SyntaxKind::ForKeyword,
            "foreign" => SyntaxKind::ForeignKeyword,
            "from" => SyntaxKind::FromKeyword,
            "func" => SyntaxKind::FuncKeyword,
            "if" => SyntaxKind::IfKeyword,
            "import" => SyntaxKind::ImportKeyword,
            "in" => SyntaxKind::InKeyword,
            "init" => SyntaxKind::InitKeyword,
            "inout" => SyntaxKind::InoutKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "is" => SyntaxKind::IsKeyword,
            "let" => SyntaxKind::LetKeyword,
            "macro" => SyntaxKind::MacroKeyword,
            "main" => SyntaxKind::MainKeyword,
            "match" => SyntaxKind::MatchKeyword,
            "operator" => SyntaxKind::OperatorKeyword,
            "package" => SyntaxKind::PackageKeyword,
            "prop" => SyntaxKind::PropKeyword,
            "quote" => SyntaxKind::QuoteKeyword,
            "return" => SyntaxKind::ReturnKeyword,
            "spawn" => SyntaxKind::SpawnKeyword,
            "static" => SyntaxKind::StaticKeyword,
            "struct" => SyntaxKind::StructKeyword,
            "super" => SyntaxKind::SuperKeyword,
            "synchronized" => SyntaxKind::SynchronizedKeyword,
            "this" => SyntaxKind::ThisKeyword,
            "throw" => SyntaxKind::ThrowKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "try" => SyntaxKind::TryKeyword,
            "type" => SyntaxKind::TypeKeyword,
            "unsafe" => SyntaxKind::UnsafeKeyword,
            "var" => SyntaxKind::VarKeyword,
            "where" => SyntaxKind::WhereKeyword,
            "while" => SyntaxKind::WhileKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// Get the punctuation text for a punctuation kind.
    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotToken => "..",
            SyntaxKind::DotDotEqualsToken => "..=",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::QuestionQuestionToken => "??",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::GreaterThanGreaterThanToken => ">>",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::MinusGreaterThanToken => "->",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::LessThanMinusToken => "<-",
            SyntaxKind::LessThanColonToken => "<:",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::AsteriskAsteriskToken => "**",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::PlusPlusToken => "++",
            SyntaxKind::MinusMinusToken => "--",
            SyntaxKind::LessThanLessThanToken => "<<",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::BarToken => "|",
            SyntaxKind::CaretToken => "^",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::TildeToken => "~",
            SyntaxKind::TildeGreaterThanToken => "~>",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::BarGreaterThanToken => "|>",
            SyntaxKind::AtToken => "@",
            SyntaxKind::HashToken => "#",
            SyntaxKind::DollarToken => "$",
            SyntaxKind::BackslashToken => "\\",
            SyntaxKind::UnderscoreToken => "_",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::AsteriskEqualsToken => "*=",
            SyntaxKind::AsteriskAsteriskEqualsToken => "**=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::AmpersandEqualsToken => "&=",
            SyntaxKind::CaretEqualsToken => "^=",
            SyntaxKind::BarEqualsToken => "|=",
            SyntaxKind::AmpersandAmpersandEqualsToken => "&&=",
            SyntaxKind::BarBarEqualsToken => "||=",
            SyntaxKind::LessThanLessThanEqualsToken => "<<=",
            SyntaxKind::GreaterThanGreaterThanEqualsToken => ">>=",
            _ => return None,
        };
        Some(text)
    }

    /// Human-readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            return text;
        }
        match self {
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::IntegerLiteral => "integer literal",
            SyntaxKind::FloatLiteral => "float literal",
            SyntaxKind::RuneLiteral => "rune literal",
            SyntaxKind::ByteLiteral => "byte literal",
            SyntaxKind::ByteStringLiteral => "byte string",
            SyntaxKind::RawStringLiteral => "raw string",
            SyntaxKind::StringStart | SyntaxKind::MultiLineStringStart => "string",
            SyntaxKind::StringContent => "string content",
            SyntaxKind::InterpolationStart => "${",
            SyntaxKind::InterpolationEnd => "}",
            SyntaxKind::StringEnd => "end of string",
            SyntaxKind::Identifier | SyntaxKind::RawIdentifier => "identifier",
            SyntaxKind::DollarIdentifier => "$identifier",
            _ => "unknown token",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}
