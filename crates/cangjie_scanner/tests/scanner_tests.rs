//! Scanner integration tests.
//!
//! Verifies tokenization of Cangjie literals, operators, strings with
//! interpolation holes and raw strings, plus lexical error reporting.

use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_ast::types::TokenFlags;
use cangjie_diagnostics::DiagnosticKind;
use cangjie_scanner::{LexError, Scanner, TokenInfo};
use pretty_assertions::assert_eq;

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    scan_infos(source)
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect()
}

fn scan_infos(source: &str) -> Vec<TokenInfo> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push(scanner.token_info());
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

/// Helper: scan everything and return the lexical diagnostics' codes.
fn lex_error_codes(source: &str) -> Vec<u32> {
    let mut scanner = Scanner::new(source);
    while scanner.scan() != SyntaxKind::EndOfFileToken {}
    scanner
        .diagnostics()
        .diagnostics()
        .iter()
        .inspect(|d| assert_eq!(d.kind, DiagnosticKind::Lex))
        .map(|d| d.code)
        .collect()
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
    assert!(scan_all("   \n\t  // comment\n/* block */").is_empty());
}

#[test]
fn test_integer_literals() {
    let cases = [
        ("42", "42", None),
        ("1_000_000", "1000000", None),
        ("0xFF", "0xFF", None),
        ("0b1010_1010", "0b10101010", None),
        ("0o777", "0o777", None),
        ("255u8", "255", Some("u8")),
        ("0x7fi64", "0x7f", Some("i64")),
    ];
    for (source, digits, suffix) in cases {
        let tokens = scan_infos(source);
        assert_eq!(tokens.len(), 1, "{source}");
        assert_eq!(tokens[0].kind, SyntaxKind::IntegerLiteral, "{source}");
        assert_eq!(tokens[0].value, digits);
        assert_eq!(tokens[0].suffix, suffix);
    }
}

#[test]
fn test_float_literals_are_greedy() {
    let cases = [
        ("3.14", "3.14", None),
        ("1.0e-5f32", "1.0e-5", Some("f32")),
        ("2e10", "2e10", None),
        ("0x1.8p3", "0x1.8p3", None),
        ("0x1p-2f64", "0x1p-2", Some("f64")),
        (".5", ".5", None),
    ];
    for (source, digits, suffix) in cases {
        let tokens = scan_infos(source);
        assert_eq!(tokens.len(), 1, "{source}");
        assert_eq!(tokens[0].kind, SyntaxKind::FloatLiteral, "{source}");
        assert_eq!(tokens[0].value, digits);
        assert_eq!(tokens[0].suffix, suffix);
    }
}

#[test]
fn test_range_is_not_a_float() {
    assert_eq!(
        scan_kinds("1..2"),
        vec![SyntaxKind::IntegerLiteral, SyntaxKind::DotDotToken, SyntaxKind::IntegerLiteral]
    );
    assert_eq!(
        scan_kinds("0..=n"),
        vec![SyntaxKind::IntegerLiteral, SyntaxKind::DotDotEqualsToken, SyntaxKind::Identifier]
    );
}

#[test]
fn test_member_access_after_number_and_hex() {
    assert_eq!(
        scan_kinds("x.y"),
        vec![SyntaxKind::Identifier, SyntaxKind::DotToken, SyntaxKind::Identifier]
    );
    assert_eq!(
        scan_kinds("0x1.a"),
        vec![SyntaxKind::IntegerLiteral, SyntaxKind::DotToken, SyntaxKind::Identifier]
    );
}

#[test]
fn test_invalid_numeric_suffix() {
    assert_eq!(lex_error_codes("12abc"), vec![LexError::InvalidSuffix(String::new()).code()]);
    assert_eq!(lex_error_codes("1.5u8"), vec![1015]);
    assert_eq!(lex_error_codes("0x"), vec![1014]);
}

#[test]
fn test_keywords_and_contextual_words() {
    assert_eq!(
        scan_kinds("func let var match case where public get"),
        vec![
            SyntaxKind::FuncKeyword,
            SyntaxKind::LetKeyword,
            SyntaxKind::VarKeyword,
            SyntaxKind::MatchKeyword,
            SyntaxKind::CaseKeyword,
            SyntaxKind::WhereKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_identifier_forms() {
    assert_eq!(
        scan_all("foo `class` $x 变量"),
        vec![
            (SyntaxKind::Identifier, "foo".to_string()),
            (SyntaxKind::RawIdentifier, "class".to_string()),
            (SyntaxKind::DollarIdentifier, "x".to_string()),
            (SyntaxKind::Identifier, "变量".to_string()),
        ]
    );
    assert_eq!(scan_kinds("$("), vec![SyntaxKind::DollarToken, SyntaxKind::OpenParenToken]);
}

#[test]
fn test_operators() {
    assert_eq!(
        scan_kinds("+ - * / % ** == != <= < << && || ! |> ~> ?? -> => <- <:"),
        vec![
            SyntaxKind::PlusToken,
            SyntaxKind::MinusToken,
            SyntaxKind::AsteriskToken,
            SyntaxKind::SlashToken,
            SyntaxKind::PercentToken,
            SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::LessThanEqualsToken,
            SyntaxKind::LessThanToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::ExclamationToken,
            SyntaxKind::BarGreaterThanToken,
            SyntaxKind::TildeGreaterThanToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::MinusGreaterThanToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::LessThanMinusToken,
            SyntaxKind::LessThanColonToken,
        ]
    );
}

#[test]
fn test_assignment_operators() {
    let kinds = scan_kinds("= += -= *= **= /= %= &= ^= |= &&= ||= <<=");
    assert_eq!(kinds.len(), 13);
    assert!(kinds.iter().all(|k| k.is_assignment_operator()));
}

#[test]
fn test_postfix_and_range_tokens() {
    assert_eq!(
        scan_kinds("i++ j-- a...b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::PlusPlusToken,
            SyntaxKind::Identifier,
            SyntaxKind::MinusMinusToken,
            SyntaxKind::Identifier,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_simple_line_string() {
    assert_eq!(
        scan_all(r#""hello\n\u{4F60}""#),
        vec![
            (SyntaxKind::StringStart, String::new()),
            (SyntaxKind::StringContent, "hello\n你".to_string()),
            (SyntaxKind::StringEnd, String::new()),
        ]
    );
}

#[test]
fn test_single_quoted_string_holds_double_quote() {
    assert_eq!(
        scan_all(r#"'say "hi"'"#),
        vec![
            (SyntaxKind::StringStart, String::new()),
            (SyntaxKind::StringContent, "say \"hi\"".to_string()),
            (SyntaxKind::StringEnd, String::new()),
        ]
    );
}

#[test]
fn test_empty_string() {
    assert_eq!(scan_kinds("\"\""), vec![SyntaxKind::StringStart, SyntaxKind::StringEnd]);
    assert_eq!(scan_kinds("''"), vec![SyntaxKind::StringStart, SyntaxKind::StringEnd]);
}

#[test]
fn test_interpolation_pushes_and_pops_modes() {
    let mut scanner = Scanner::new(r#""a${ {x} }b" + 1"#);
    assert_eq!(scanner.scan(), SyntaxKind::StringStart);
    assert_eq!(scanner.mode_depth(), 2);
    assert_eq!(scanner.scan(), SyntaxKind::StringContent);
    assert_eq!(scanner.scan(), SyntaxKind::InterpolationStart);
    assert_eq!(scanner.mode_depth(), 3);
    assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    // The inner `}` closes the braces opened inside the hole.
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.scan(), SyntaxKind::InterpolationEnd);
    assert_eq!(scanner.mode_depth(), 2);
    assert_eq!(scanner.scan(), SyntaxKind::StringContent);
    assert_eq!(scanner.token_value(), "b");
    assert_eq!(scanner.scan(), SyntaxKind::StringEnd);
    assert_eq!(scanner.mode_depth(), 1);
    assert_eq!(scanner.scan(), SyntaxKind::PlusToken);
    assert_eq!(scanner.scan(), SyntaxKind::IntegerLiteral);
    assert!(scanner.diagnostics().is_empty());
}

#[test]
fn test_nested_string_in_hole() {
    assert_eq!(
        scan_kinds(r#""${"inner ${x}"}""#),
        vec![
            SyntaxKind::StringStart,
            SyntaxKind::InterpolationStart,
            SyntaxKind::StringStart,
            SyntaxKind::StringContent,
            SyntaxKind::InterpolationStart,
            SyntaxKind::Identifier,
            SyntaxKind::InterpolationEnd,
            SyntaxKind::StringEnd,
            SyntaxKind::InterpolationEnd,
            SyntaxKind::StringEnd,
        ]
    );
}

#[test]
fn test_escaped_dollar_is_text() {
    assert_eq!(
        scan_all(r#""\${x} $y""#),
        vec![
            (SyntaxKind::StringStart, String::new()),
            (SyntaxKind::StringContent, "${x} $y".to_string()),
            (SyntaxKind::StringEnd, String::new()),
        ]
    );
}

#[test]
fn test_multi_line_string() {
    let source = "\"\"\"\nline one\n\"quoted\" ${n}\n\"\"\"";
    assert_eq!(
        scan_all(source),
        vec![
            (SyntaxKind::MultiLineStringStart, String::new()),
            (SyntaxKind::StringContent, "\nline one\n\"quoted\" ".to_string()),
            (SyntaxKind::InterpolationStart, String::new()),
            (SyntaxKind::Identifier, "n".to_string()),
            (SyntaxKind::InterpolationEnd, String::new()),
            (SyntaxKind::StringContent, "\n".to_string()),
            (SyntaxKind::StringEnd, String::new()),
        ]
    );
}

#[test]
fn test_line_string_stops_at_newline() {
    let mut scanner = Scanner::new("\"abc\nx");
    assert_eq!(scanner.scan(), SyntaxKind::StringStart);
    assert_eq!(scanner.scan(), SyntaxKind::StringContent);
    assert_eq!(scanner.scan(), SyntaxKind::StringEnd);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    let codes: Vec<u32> = scanner.diagnostics().diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![LexError::UnterminatedString.code()]);
}

#[test]
fn test_invalid_escape_is_reported_and_skipped() {
    let tokens = scan_all(r#""a\qb""#);
    assert_eq!(tokens[1], (SyntaxKind::StringContent, "ab".to_string()));
    assert_eq!(lex_error_codes(r#""a\qb""#), vec![LexError::InvalidEscape('q').code()]);
    assert_eq!(lex_error_codes(r#""\u{110000}""#), vec![1010]);
    assert_eq!(lex_error_codes(r#""\u{}""#), vec![1009]);
}

#[test]
fn test_raw_string_fence_matching() {
    let tokens = scan_infos(r##"#"a"#"##);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, SyntaxKind::RawStringLiteral);
    assert_eq!(tokens[0].value, "a");
    assert!(lex_error_codes(r##"#"a"#"##).is_empty());

    let tokens = scan_infos(r###"##"say "#hi"#"##"###);
    assert_eq!(tokens[0].value, "say \"#hi\"#");
}

#[test]
fn test_raw_string_mismatched_fence_reports_closer() {
    let source = r###"##"a"#"###;
    let mut scanner = Scanner::new(source);
    assert_eq!(scanner.scan(), SyntaxKind::RawStringLiteral);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    let diagnostics = scanner.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1004);
    // The unmatched closer is `"#` at offset 4.
    assert_eq!(diagnostics[0].span.start, 4);
    assert_eq!(diagnostics[0].span.length, 2);
}

#[test]
fn test_raw_string_has_no_escapes_or_holes() {
    let tokens = scan_infos(r##"#"\n ${x}"#"##);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, r"\n ${x}");
}

#[test]
fn test_rune_and_byte_literals() {
    assert_eq!(
        scan_all(r"r'a' r'\n' r'\u{1F600}' b'x' b'\u{7f}'"),
        vec![
            (SyntaxKind::RuneLiteral, "a".to_string()),
            (SyntaxKind::RuneLiteral, "\n".to_string()),
            (SyntaxKind::RuneLiteral, "😀".to_string()),
            (SyntaxKind::ByteLiteral, "x".to_string()),
            (SyntaxKind::ByteLiteral, "\u{7f}".to_string()),
        ]
    );
}

#[test]
fn test_byte_literal_errors() {
    assert_eq!(lex_error_codes("b'é'"), vec![LexError::NonAsciiByte.code()]);
    assert_eq!(lex_error_codes(r"b'\u{100}'"), vec![1009]);
    assert_eq!(lex_error_codes(r"b'\$'"), vec![1008]);
    assert_eq!(lex_error_codes("r'ab'"), vec![LexError::CharLiteralLength.code()]);
}

#[test]
fn test_byte_string() {
    assert_eq!(
        scan_all(r#"b"hi\n""#),
        vec![(SyntaxKind::ByteStringLiteral, "hi\n".to_string())]
    );
}

#[test]
fn test_unterminated_comment_and_interpolation() {
    assert_eq!(lex_error_codes("/* never closed"), vec![LexError::UnterminatedComment.code()]);
    assert_eq!(
        lex_error_codes(r#""${x"#),
        vec![LexError::UnterminatedInterpolation.code()]
    );
}

#[test]
fn test_invalid_character_yields_unknown_token() {
    let mut scanner = Scanner::new("a ¤ b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.diagnostics().len(), 1);
}

#[test]
fn test_token_spans_are_byte_offsets() {
    let tokens = scan_infos("let 名 = 1");
    assert_eq!(tokens[1].span.start, 4);
    assert_eq!(tokens[1].span.length, 3);
    assert_eq!(tokens[2].span.start, 8);
}
