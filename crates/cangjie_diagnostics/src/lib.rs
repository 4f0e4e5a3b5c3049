//! cangjie_diagnostics: Diagnostic messages and error reporting.
//!
//! Syntax errors are values. The scanner and parser push [`Diagnostic`]s
//! into a side list and keep going; nothing here is thrown as control flow.
//! A diagnostic carries its span, a coded message and one of the four
//! [`DiagnosticKind`]s the front-end can report.

use cangjie_core::text::TextSpan;
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Severity, SourceCode};
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// The closed error taxonomy of the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Unterminated literal, invalid escape, unbalanced raw-string fence,
    /// invalid identifier character.
    Lex,
    /// A token is present but the grammar does not accept it here.
    UnexpectedToken,
    /// The disambiguator could not commit to any reading within its budget.
    AmbiguityExhausted,
    /// Nesting went past the configured maximum depth.
    RecursionLimitExceeded,
}

impl DiagnosticKind {
    /// Whether this kind leaves the returned tree partial.
    pub fn is_fatal(self) -> bool {
        matches!(self, DiagnosticKind::Lex | DiagnosticKind::RecursionLimitExceeded)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lex => "LexError",
            DiagnosticKind::UnexpectedToken => "UnexpectedToken",
            DiagnosticKind::AmbiguityExhausted => "AmbiguityExhausted",
            DiagnosticKind::RecursionLimitExceeded => "RecursionLimitExceeded",
        };
        f.write_str(name)
    }
}

/// A message template with a stable code.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub kind: DiagnosticKind,
    /// May contain `{0}`, `{1}`, ... placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub span: TextSpan,
    pub message_text: String,
    pub code: u32,
    pub kind: DiagnosticKind,
    pub category: DiagnosticCategory,
    pub related_information: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span,
            message_text: format_message(message.message, args),
            code: message.code,
            kind: message.kind,
            category: message.category,
            related_information: Vec::new(),
        }
    }

    /// Build a diagnostic from an already formatted error value, e.g. a
    /// scanner error whose `Display` is the message.
    pub fn from_error(span: TextSpan, code: u32, kind: DiagnosticKind, error: &dyn fmt::Display) -> Self {
        Self {
            file: None,
            span,
            message_text: error.to_string(),
            code,
            kind,
            category: DiagnosticCategory::Error,
            related_information: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_related(mut self, related: Diagnostic) -> Self {
        self.related_information.push(related);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Render with source context (caret underline, code, message).
    pub fn render(&self, source: &str) -> String {
        let name = self.file.as_deref().unwrap_or("<input>");
        let with_source = WithSource {
            diagnostic: self,
            source: NamedSource::new(name, source.to_string()),
        };
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let mut out = String::new();
        match handler.render_report(&mut out, &with_source) {
            Ok(()) => out,
            Err(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}({}): ", file, self.span.start)?;
        }
        write!(f, "{} CJ{}: {}", self.category, self.code, self.message_text)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("CJ{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let primary = LabeledSpan::at(self.span.to_range(), self.message_text.clone());
        let related = self
            .related_information
            .iter()
            .map(|r| LabeledSpan::at(r.span.to_range(), r.message_text.clone()));
        Some(Box::new(std::iter::once(primary).chain(related)))
    }
}

/// Pairs a diagnostic with the source it points into, for rendering.
struct WithSource<'d> {
    diagnostic: &'d Diagnostic,
    source: NamedSource<String>,
}

impl fmt::Debug for WithSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.diagnostic, f)
    }
}

impl fmt::Display for WithSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic.message_text)
    }
}

impl std::error::Error for WithSource<'_> {}

impl miette::Diagnostic for WithSource<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        miette::Diagnostic::code(self.diagnostic)
    }

    fn severity(&self) -> Option<Severity> {
        miette::Diagnostic::severity(self.diagnostic)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        miette::Diagnostic::help(self.diagnostic)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        miette::Diagnostic::labels(self.diagnostic)
    }
}

/// Replace `{0}`, `{1}`, ... in a template with the given arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated while parsing one file.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Drop everything recorded after the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    /// Stamp a file name on every diagnostic that lacks one.
    pub fn set_file(&mut self, file: &str) {
        for d in self.diagnostics.iter_mut().filter(|d| d.file.is_none()) {
            d.file = Some(file.to_string());
        }
    }

    /// Stable sort by start offset, keeping report order for ties.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| d.span.start);
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                category: DiagnosticCategory::Error,
                kind: DiagnosticKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Syntax errors (2000-2099)
    // ========================================================================
    pub const _0_EXPECTED: DiagnosticMessage = diag!(2001, UnexpectedToken, "'{0}' expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(2002, UnexpectedToken, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(2003, UnexpectedToken, "Type expected.");
    pub const PATTERN_EXPECTED: DiagnosticMessage = diag!(2004, UnexpectedToken, "Pattern expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(2005, UnexpectedToken, "Identifier expected.");
    pub const DECLARATION_EXPECTED: DiagnosticMessage = diag!(2006, UnexpectedToken, "Declaration or expression expected.");
    pub const UNEXPECTED_TOKEN_0: DiagnosticMessage = diag!(2007, UnexpectedToken, "Unexpected token '{0}'.");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage = diag!(2008, UnexpectedToken, "The left-hand side of an assignment must be a variable, field access or index access.");
    pub const ASSIGNMENT_ONLY_AS_STATEMENT: DiagnosticMessage = diag!(2009, UnexpectedToken, "Assignment is only allowed as a statement.");
    pub const STATEMENT_SEPARATOR_EXPECTED: DiagnosticMessage = diag!(2010, UnexpectedToken, "';' or a line break expected after '{0}'.");
    pub const DUPLICATE_MAIN: DiagnosticMessage = diag!(2011, UnexpectedToken, "A file may declare 'main' only once.");
    pub const PACKAGE_HEADER_MISPLACED: DiagnosticMessage = diag!(2012, UnexpectedToken, "The package header must come before imports and declarations.");
    pub const MEMBER_DECLARATION_EXPECTED: DiagnosticMessage = diag!(2013, UnexpectedToken, "Member declaration expected.");
    pub const INVALID_PATTERN_IN_0: DiagnosticMessage = diag!(2014, UnexpectedToken, "This pattern is not allowed in {0}.");
    pub const MODIFIER_0_NOT_ALLOWED_HERE: DiagnosticMessage = diag!(2015, UnexpectedToken, "'{0}' modifier cannot be used here.");

    // ========================================================================
    // Disambiguation (3000-3099)
    // ========================================================================
    pub const AMBIGUITY_EXHAUSTED_0_1: DiagnosticMessage = diag!(3001, AmbiguityExhausted, "Could not decide how to read '{0}' within {1} tokens of lookahead.");
    pub const NAMED_ELEMENTS_REQUIRE_ARROW: DiagnosticMessage = diag!(3002, AmbiguityExhausted, "A parenthesized list with named elements must be followed by '->'.");
    pub const ELEMENT_IS_NOT_A_TYPE: DiagnosticMessage = diag!(3003, AmbiguityExhausted, "This element cannot be read as a type in a function type.");

    // ========================================================================
    // Resource limits (4000-4099)
    // ========================================================================
    pub const RECURSION_LIMIT_EXCEEDED_0: DiagnosticMessage = diag!(4001, RecursionLimitExceeded, "Maximum nesting depth of {0} exceeded.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("'{0}' expected.", &[")"]), "')' expected.");
        assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::new(TextSpan::new(4, 1), &messages::_0_EXPECTED, &[")"]).with_file("main.cj");
        assert_eq!(d.to_string(), "main.cj(4): error CJ2001: ')' expected.");
        assert_eq!(d.kind, DiagnosticKind::UnexpectedToken);
        assert!(!d.is_fatal());
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(DiagnosticKind::Lex.is_fatal());
        assert!(DiagnosticKind::RecursionLimitExceeded.is_fatal());
        assert!(!DiagnosticKind::AmbiguityExhausted.is_fatal());
        assert!(!DiagnosticKind::UnexpectedToken.is_fatal());
    }

    #[test]
    fn test_collection_truncate_and_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(TextSpan::new(10, 1), &messages::EXPRESSION_EXPECTED, &[]));
        collection.add(Diagnostic::new(TextSpan::new(2, 1), &messages::TYPE_EXPECTED, &[]));
        collection.add(Diagnostic::new(TextSpan::new(5, 1), &messages::PATTERN_EXPECTED, &[]));
        assert_eq!(collection.error_count(), 3);

        collection.truncate(2);
        collection.sort();
        let codes: Vec<u32> = collection.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![2003, 2002]);
    }

    #[test]
    fn test_set_file_keeps_existing() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(TextSpan::empty(0), &messages::EXPRESSION_EXPECTED, &[]));
        collection.add(Diagnostic::new(TextSpan::empty(0), &messages::EXPRESSION_EXPECTED, &[]).with_file("other.cj"));
        collection.set_file("main.cj");
        let files: Vec<_> = collection.diagnostics().iter().map(|d| d.file.clone().unwrap_or_default()).collect();
        assert_eq!(files, vec!["main.cj".to_string(), "other.cj".to_string()]);
    }

    #[test]
    fn test_render_mentions_code_and_message() {
        let source = "let x = )";
        let d = Diagnostic::new(TextSpan::new(8, 1), &messages::EXPRESSION_EXPECTED, &[]);
        let rendered = d.render(source);
        assert!(rendered.contains("CJ2002"), "{}", rendered);
        assert!(rendered.contains("Expression expected."), "{}", rendered);
    }

    #[test]
    fn test_miette_labels_cover_span() {
        let d = Diagnostic::new(TextSpan::new(3, 2), &messages::IDENTIFIER_EXPECTED, &[]);
        let labels: Vec<_> = miette::Diagnostic::labels(&d).into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 3);
        assert_eq!(labels[0].len(), 2);
    }
}
