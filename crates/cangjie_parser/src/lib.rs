//! cangjie_parser: Recursive descent parser for Cangjie.
//!
//! Turns one UTF-8 buffer into an arena-allocated [`ParseTree`] plus the
//! diagnostics found along the way. Parsing never stops at the first error:
//! malformed statements become error nodes and the parse resumes at the
//! next statement boundary.

mod chain;
mod declarations;
mod expressions;
mod options;
mod parser;
mod patterns;
mod precedence;
mod stack;
mod types;
mod utilities;

pub use options::{ParseOptions, DEFAULT_MAX_RECURSION_DEPTH, DEFAULT_SPECULATION_TOKEN_BUDGET};
pub use parser::Parser;
pub use precedence::{assign_operator, binary_operator};

use cangjie_ast::node::{ExprId, ExprKind, ParseTree};
use cangjie_core::intern::StringInterner;
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::{Diagnostic, DiagnosticCollection};
use cangjie_scanner::LexError;
use rayon::prelude::*;
use tracing::debug;

/// The result of parsing one file.
#[derive(Debug)]
pub struct FileParse {
    pub tree: ParseTree,
    /// Sorted by start offset.
    pub diagnostics: Vec<Diagnostic>,
    /// A lexical error or a resource limit was hit; the tree may be missing
    /// whole regions of the source.
    pub has_fatal: bool,
}

/// The result of parsing one expression out of a larger buffer.
#[derive(Debug)]
pub struct ExprParse {
    pub tree: ParseTree,
    pub expr: ExprId,
    /// Byte offset just past the expression.
    pub next_offset: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub has_fatal: bool,
}

/// One buffer of a batch.
#[derive(Debug, Clone, Copy)]
pub struct SourceInput<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

/// Parse a whole file.
pub fn parse_file(bytes: &[u8], options: &ParseOptions) -> FileParse {
    parse_file_with_interner(bytes, options, StringInterner::new())
}

/// Parse a whole file, interning names into `interner`.
pub fn parse_file_with_interner(bytes: &[u8], options: &ParseOptions, interner: StringInterner) -> FileParse {
    let (tree, mut diagnostics) = match decode(bytes) {
        Ok(text) => Parser::new(text, options, interner).parse_file(),
        Err(diagnostic) => (ParseTree::new(interner), single(diagnostic)),
    };
    if let Some(name) = &options.file_name {
        diagnostics.set_file(name);
    }
    let has_fatal = diagnostics.has_fatal();
    FileParse {
        tree,
        diagnostics: diagnostics.into_diagnostics(),
        has_fatal,
    }
}

/// Parse one statement-level expression starting at byte `offset`, for
/// callers that embed Cangjie expressions in other text.
pub fn parse_expression(bytes: &[u8], offset: usize, options: &ParseOptions) -> ExprParse {
    let interner = StringInterner::new();
    let offset = offset.min(bytes.len());
    let decoded = decode(bytes).and_then(|text| {
        if text.is_char_boundary(offset) {
            Ok(text)
        } else {
            Err(LexError::InvalidUtf8.into_diagnostic(TextSpan::new(offset as u32, 1)))
        }
    });
    let (tree, expr, next_offset, mut diagnostics) = match decoded {
        Ok(text) => Parser::new(text, options, interner).parse_expression_at(offset),
        Err(diagnostic) => {
            let mut tree = ParseTree::new(interner);
            let expr = tree.arena.alloc_expr(ExprKind::Error, diagnostic.span);
            (tree, expr, offset, single(diagnostic))
        }
    };
    if let Some(name) = &options.file_name {
        diagnostics.set_file(name);
    }
    let has_fatal = diagnostics.has_fatal();
    ExprParse {
        tree,
        expr,
        next_offset,
        diagnostics: diagnostics.into_diagnostics(),
        has_fatal,
    }
}

/// Parse independent files in parallel. Results come back in input order
/// and every tree shares one interner.
pub fn parse_files(inputs: &[SourceInput<'_>], options: &ParseOptions) -> Vec<FileParse> {
    let interner = StringInterner::new();
    debug!(files = inputs.len(), "parsing batch");
    inputs
        .par_iter()
        .map(|input| {
            let options = options.clone().with_file_name(input.name);
            parse_file_with_interner(input.bytes, &options, interner.clone())
        })
        .collect()
}

fn decode(bytes: &[u8]) -> Result<&str, Diagnostic> {
    simdutf8::compat::from_utf8(bytes).map_err(|error| {
        let start = error.valid_up_to() as u32;
        let len = error.error_len().unwrap_or(bytes.len() - error.valid_up_to()) as u32;
        LexError::InvalidUtf8.into_diagnostic(TextSpan::new(start, len))
    })
}

fn single(diagnostic: Diagnostic) -> DiagnosticCollection {
    let mut diagnostics = DiagnosticCollection::new();
    diagnostics.add(diagnostic);
    diagnostics
}
