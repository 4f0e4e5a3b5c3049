//! Parser integration tests.
//!
//! Verifies that the parser builds the expected trees from Cangjie source
//! and keeps going past malformed input.

use cangjie_ast::dump::Dumper;
use cangjie_ast::node::*;
use cangjie_ast::operator::{Associativity, BinaryOperator};
use cangjie_diagnostics::DiagnosticKind;
use cangjie_parser::{parse_expression, parse_file, parse_files, FileParse, ParseOptions, SourceInput};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Helper: parse source text as a file with default options.
fn parse(source: &str) -> FileParse {
    parse_file(source.as_bytes(), &ParseOptions::default())
}

/// Helper: dump every top-level item of a file that must parse cleanly.
fn dump_items(source: &str) -> Vec<String> {
    let parse = parse(source);
    assert!(parse.diagnostics.is_empty(), "source: {}\n{:?}", source, parse.diagnostics);
    let dumper = Dumper::for_tree(&parse.tree, source);
    parse.tree.items.iter().map(|id| dumper.decl(*id)).collect()
}

/// Helper: dump a single expression that must parse cleanly.
fn dump_expr(source: &str) -> String {
    let parse = parse_expression(source.as_bytes(), 0, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty(), "source: {}\n{:?}", source, parse.diagnostics);
    Dumper::for_tree(&parse.tree, source).expr(parse.expr)
}

/// Helper: dump the first top-level item of a clean file.
fn dump_body(source: &str) -> String {
    let items = dump_items(source);
    items.into_iter().next().unwrap_or_default()
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(dump_expr("a + b * c"), "(+ a (* b c))");
    assert_eq!(dump_expr("a * b + c"), "(+ (* a b) c)");
}

#[test]
fn test_exponent_is_right_associative() {
    assert_eq!(dump_expr("2 ** 3 ** 2"), "(** 2 (** 3 2))");
}

#[test]
fn test_left_associative_chains() {
    assert_eq!(dump_expr("a - b - c"), "(- (- a b) c)");
    assert_eq!(dump_expr("a < b < c"), "(< (< a b) c)");
}

#[test]
fn test_coalescing_and_flow() {
    assert_eq!(dump_expr("a ?? b || c"), "(?? a (|| b c))");
    assert_eq!(dump_expr("xs |> f ~> g"), "(~> (|> xs f) g)");
}

#[test]
fn test_range_sits_between_shift_and_relational() {
    assert_eq!(dump_expr("a << 1..b"), "(.. (<< a 1) b)");
    assert_eq!(dump_expr("0..n : 2"), "(.. 0 n : 2)");
}

#[test]
fn test_greater_than_pairs_rejoin_in_operator_position() {
    assert_eq!(dump_expr("a >> 2"), "(>> a 2)");
    assert_eq!(dump_expr("a >= b"), "(>= a b)");
}

fn operator() -> impl Strategy<Value = BinaryOperator> {
    prop::sample::select(BinaryOperator::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_operator_pairs_group_by_precedence(first in operator(), second in operator()) {
        let source = format!("a {} b {} c", first.symbol(), second.symbol());
        let (outer, inner) = (first.precedence().value(), second.precedence().value());
        let left_grouped = outer > inner || (outer == inner && first.associativity() == Associativity::Left);
        let expected = if left_grouped {
            format!("({} ({} a b) c)", second.symbol(), first.symbol())
        } else {
            format!("({} a ({} b c))", first.symbol(), second.symbol())
        };
        let parse = parse_expression(source.as_bytes(), 0, &ParseOptions::default());
        prop_assert!(parse.diagnostics.is_empty(), "{}: {:?}", source, parse.diagnostics);
        prop_assert_eq!(Dumper::for_tree(&parse.tree, &source).expr(parse.expr), expected);
    }
}

// ============================================================================
// Generics and Types
// ============================================================================

#[test]
fn test_generic_call_versus_comparisons() {
    assert_eq!(dump_expr("f<T, U>(x)"), "(call f<T, U> x)");
    assert_eq!(dump_expr("f(a < b, c > (d))"), "(call f (< a b) (> c (paren d)))");
}

#[test]
fn test_comparisons_after_casts_and_type_checks() {
    assert_eq!(dump_expr("a as Int64 < b"), "(< (as a Int64) b)");
    assert_eq!(dump_expr("x is T > y"), "(> (is x T) y)");
    assert_eq!(dump_expr("x is Foo<Int64>"), "(is x Foo<Int64>)");
    assert_eq!(dump_expr("x is Foo<Int64> && ok"), "(&& (is x Foo<Int64>) ok)");
    assert_eq!(dump_expr("a as T<b>c"), "(> (< (as a T) b) c)");
}

#[test]
fn test_nested_generic_arguments() {
    assert_eq!(
        dump_items("let m: HashMap<String, Array<Int64>> = HashMap<String, Array<Int64>>()"),
        ["(let m: HashMap<String, Array<Int64>> (call HashMap<String, Array<Int64>>))"]
    );
}

#[test]
fn test_function_and_optional_types() {
    assert_eq!(
        dump_items("func f(g: (Int64) -> ?String): ??Bool { g }"),
        ["(func f (g: ((Int64) -> ?String)) : ??Bool (block g))"]
    );
}

// ============================================================================
// Literals and Strings
// ============================================================================

#[test]
fn test_raw_string_fences() {
    let parse = parse_expression(br##"#"a"#"##, 0, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);

    let parse = parse_expression(br##"##"a"#"##, 0, &ParseOptions::default());
    assert_eq!(parse.diagnostics.len(), 1);
    let diagnostic = &parse.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::Lex);
    assert_eq!(diagnostic.code, 1004);
    assert_eq!(diagnostic.span.start, 4);
    assert!(parse.has_fatal);
}

#[test]
fn test_interpolated_string() {
    assert_eq!(dump_expr(r#""sum: ${a + b}!""#), r#"(str "sum: " (block (+ a b)) "!")"#);
}

#[test]
fn test_unterminated_string_is_fatal() {
    let parse = parse("let s = \"abc\nlet t = 1");
    assert!(parse.has_fatal);
    assert!(parse.diagnostics.iter().any(|d| d.code == 1001));
}

#[test]
fn test_invalid_utf8_yields_empty_tree() {
    let parse = parse_file(b"let a = 1\n\xff\xfe", &ParseOptions::default().with_file_name("bad.cj"));
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, 1016);
    assert_eq!(parse.diagnostics[0].span.start, 10);
    assert_eq!(parse.diagnostics[0].file.as_deref(), Some("bad.cj"));
    assert!(parse.tree.items.is_empty());
    assert!(parse.has_fatal);
}

// ============================================================================
// Chains, Tuples and Lambdas
// ============================================================================

#[test]
fn test_optional_chain_is_one_expression() {
    let parse = parse_expression(b"a?.b?.c()", 0, &ParseOptions::default());
    assert_eq!(parse.next_offset, 9);
    assert_eq!(Dumper::for_tree(&parse.tree, "a?.b?.c()").expr(parse.expr), "(chain (call (?. (?. a b) c)))");
}

#[test]
fn test_optional_member_may_start_a_line() {
    let source = "a\n  ?.b";
    let parse = parse_expression(source.as_bytes(), 0, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
    assert_eq!(parse.next_offset, source.len());
    assert_eq!(Dumper::for_tree(&parse.tree, source).expr(parse.expr), "(chain (?. a b))");

    // Calls and indexing stay on the operand's line.
    let parse = parse_expression(b"a\n?(b)", 0, &ParseOptions::default());
    assert_eq!(parse.next_offset, 1);
}

#[test]
fn test_unit_parenthesized_and_tuples() {
    assert_eq!(dump_expr("()"), "()");
    assert_eq!(dump_expr("(1)"), "(paren 1)");
    assert_eq!(dump_expr("(1,)"), "(tuple 1)");
    assert_eq!(dump_expr("(1, 2)"), "(tuple 1 2)");
}

#[test]
fn test_trailing_lambda_needs_same_line() {
    assert_eq!(
        dump_body("func f() {\n xs.forEach { x => println(x) }\n}"),
        "(func f () (block (trailing (. xs forEach) (lambda (x) (call println x)))))"
    );
    assert_eq!(
        dump_body("func f() {\n g\n { => 1 }\n}"),
        "(func f () (block g (lambda () 1)))"
    );
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_match_alternatives() {
    let source = "func f() {\n match (x) {\n case 1 | 2 | 3 => a\n case Some(v) | None => b\n case _ => c\n }\n}";
    assert_eq!(
        dump_body(source),
        "(func f () (block (match x (case (| 1 2 3) (block a)) \
         (case (| Some(v) None) (block b)) (case _ (block c)))))"
    );
}

#[test]
fn test_alternative_lists_keep_order() {
    let parse = parse_expression(b"match (x) { case Some(v) | None => 0 }", 0, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
    let tree = &parse.tree;
    let ExprKind::Match(m) = &tree.arena.expr(parse.expr).kind else {
        panic!("expected a match");
    };
    let MatchCase::Pattern(pattern) = m.arms[0].case else {
        panic!("expected a pattern arm");
    };
    let PatternKind::Enum(variants) = &tree.arena.pattern(pattern).kind else {
        panic!("expected an enum pattern");
    };
    let names: Vec<&str> = variants.iter().map(|v| tree.name(v.path[0])).collect();
    assert_eq!(names, ["Some", "None"]);
}

#[test]
fn test_for_in_and_let_patterns() {
    assert_eq!(
        dump_body("func f() {\n for ((k, _) in pairs where k > 0) { k }\n}"),
        "(func f () (block (for (tuple k _) pairs where (> k 0) (block k))))"
    );
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_one_malformed_statement_one_diagnostic() {
    let source = "func a() {}\nlet x = = 3\nfunc b() {}\n";
    let parse = parse(source);
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
    assert_eq!(parse.diagnostics[0].kind, DiagnosticKind::UnexpectedToken);
    assert!(!parse.has_fatal);

    let dumper = Dumper::for_tree(&parse.tree, source);
    let items: Vec<String> = parse.tree.items.iter().map(|id| dumper.decl(*id)).collect();
    assert_eq!(items, ["(func a () (block))", "(let x (= <error> 3))", "(func b () (block))"]);
}

#[test]
fn test_invalid_character_is_the_only_diagnostic() {
    let source = "func a() {}\nlet x = 1 \u{a7} 2\nfunc b() {}";
    let parse = parse(source);
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
    assert_eq!(parse.diagnostics[0].code, 1013);
    assert_eq!(parse.diagnostics[0].span.start, 22);

    let dumper = Dumper::for_tree(&parse.tree, source);
    let items: Vec<String> = parse.tree.items.iter().map(|id| dumper.decl(*id)).collect();
    assert_eq!(items, ["(func a () (block))", "(let x 1)", "(func b () (block))"]);
}

#[test]
fn test_lexical_errors_inside_blocks() {
    let parse = parse("func f() {\n f(a \u{a7} b)\n g()\n}");
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
    assert_eq!(parse.diagnostics[0].code, 1013);

    // The line break before a skipped character still ends the statement.
    let source = "func f() {\n let a = 1\n \u{a7} a = 2\n}";
    let parse = self::parse(source);
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
    let dumper = Dumper::for_tree(&parse.tree, source);
    assert_eq!(dumper.decl(parse.tree.items[0]), "(func f () (block (let a 1) (= a 2)))");
}

#[test]
fn test_malformed_statement_inside_block() {
    let source = "func f() {\n let a = 1\n a + * 2\n let b = 2\n}";
    let parse = parse(source);
    assert_eq!(parse.diagnostics.len(), 1, "{:?}", parse.diagnostics);
    let dumper = Dumper::for_tree(&parse.tree, source);
    assert_eq!(
        dumper.decl(parse.tree.items[0]),
        "(func f () (block (let a 1) (+ a <error>) (let b 2)))"
    );
}

#[test]
fn test_missing_separator_is_reported() {
    let parse = parse("func f() { let a = 1 let b = 2 }");
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, 2010);
}

#[test]
fn test_duplicate_main() {
    let parse = parse("main() {}\nmain() {}");
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, 2011);
    assert!(parse.tree.main.is_some());
    assert_eq!(parse.tree.items.len(), 1);
}

#[test]
fn test_recursion_limit() {
    let depth = 100;
    let source = format!("let x = {}1{}", "(".repeat(depth), ")".repeat(depth));
    let options = ParseOptions {
        max_recursion_depth: 32,
        ..ParseOptions::default()
    };
    let parse = parse_file(source.as_bytes(), &options);
    let trips = parse
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::RecursionLimitExceeded)
        .count();
    assert_eq!(trips, 1);
    assert_eq!(parse.diagnostics.len(), 1);
    assert!(parse.has_fatal);
}

#[test]
fn test_deep_nesting_with_default_options_does_not_overflow() {
    let source = format!("let x = {}1{}", "[".repeat(50_000), "]".repeat(50_000));
    let parse = parse(&source);
    assert!(parse.has_fatal);
}

// ============================================================================
// Entry Points and Options
// ============================================================================

#[test]
fn test_parse_expression_at_offset() {
    let source = b"${count + 1} items";
    let parse = parse_expression(source, 2, &ParseOptions::default());
    assert!(parse.diagnostics.is_empty());
    assert_eq!(parse.next_offset, 11);
    assert_eq!(Dumper::for_tree(&parse.tree, "").expr(parse.expr), "(+ count 1)");
}

#[test]
fn test_parse_expression_inside_character_is_rejected() {
    let parse = parse_expression("é".as_bytes(), 1, &ParseOptions::default());
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].code, 1016);
}

#[test]
fn test_options_from_json() {
    let options = ParseOptions::from_json(r#"{"speculationTokenBudget": 2, "fileName": "x.cj"}"#).unwrap();
    let parse = parse_expression(b"f<A, B, C, D>(x)", 0, &options);
    assert_eq!(parse.diagnostics.len(), 1);
    assert_eq!(parse.diagnostics[0].kind, DiagnosticKind::AmbiguityExhausted);
    assert_eq!(parse.diagnostics[0].file.as_deref(), Some("x.cj"));
    assert!(!parse.has_fatal);
}

#[test]
fn test_parse_files_keeps_order_and_shares_interner() {
    let inputs = [
        SourceInput {
            name: "a.cj",
            bytes: b"func a() {}",
        },
        SourceInput {
            name: "b.cj",
            bytes: b"let = 1",
        },
        SourceInput {
            name: "c.cj",
            bytes: b"class C {}",
        },
    ];
    let results = parse_files(&inputs, &ParseOptions::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].diagnostics.is_empty());
    assert_eq!(results[1].diagnostics[0].file.as_deref(), Some("b.cj"));
    assert!(results[2].diagnostics.is_empty());
    assert!(results[0].tree.interner.ptr_eq(&results[2].tree.interner));
}

#[test]
fn test_tracing_events_do_not_disturb_parsing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    assert_eq!(dump_expr("a<b>c"), "(> (< a b) c)");
}
