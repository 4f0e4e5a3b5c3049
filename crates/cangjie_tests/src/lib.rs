//! Conformance corpus for the Cangjie parser.
//!
//! Each case is a complete source file tagged with the grammar area it
//! exercises and whether it must parse cleanly or must be reported.

use std::collections::BTreeMap;
use std::fmt;

use cangjie_diagnostics::Diagnostic;
use cangjie_parser::{parse_file, ParseOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Expressions,
    Types,
    Patterns,
    Strings,
    Declarations,
    Recovery,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Expressions,
        Category::Types,
        Category::Patterns,
        Category::Strings,
        Category::Declarations,
        Category::Recovery,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Expressions => "expressions",
            Category::Types => "types",
            Category::Patterns => "patterns",
            Category::Strings => "strings",
            Category::Declarations => "declarations",
            Category::Recovery => "recovery",
        };
        f.write_str(name)
    }
}

/// What a case must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// No diagnostics.
    Clean,
    /// At least one diagnostic, and still a tree.
    Errors,
}

#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub name: &'static str,
    pub category: Category,
    pub expect: Expect,
    pub source: &'static str,
}

const fn clean(name: &'static str, category: Category, source: &'static str) -> Case {
    Case {
        name,
        category,
        expect: Expect::Clean,
        source,
    }
}

const fn errors(name: &'static str, source: &'static str) -> Case {
    Case {
        name,
        category: Category::Recovery,
        expect: Expect::Errors,
        source,
    }
}

// ============================================================================
// Corpus
// ============================================================================

pub const CASES: &[Case] = &[
    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------
    clean("arithmetic_precedence", Category::Expressions, "let x = a + b * c - d / e % f"),
    clean("exponent_chain", Category::Expressions, "let x = 2 ** 3 ** 2"),
    clean("coalescing", Category::Expressions, "let v = opt ?? 0"),
    clean("pipeline", Category::Expressions, "let r = xs |> map(f) |> sum"),
    clean("range_with_step", Category::Expressions, "let r = 0..10 : 2"),
    clean(
        "compound_assignment",
        Category::Expressions,
        "main() {\n    var x = 1\n    x += 2\n    x >>= 1\n    x **= 2\n}",
    ),
    clean(
        "tuple_assignment",
        Category::Expressions,
        "main() {\n    var a = 0\n    var b = 1\n    (a, b) = (b, a)\n    _ = f()\n}",
    ),
    clean(
        "if_else_chain",
        Category::Expressions,
        "main() {\n    let m = if (a > b) { a } else if (a == b) { 0 } else { b }\n}",
    ),
    clean("if_let", Category::Expressions, "main() {\n    if (let Some(v) <- opt) { v }\n}"),
    clean(
        "selectorless_match",
        Category::Expressions,
        "main() {\n    match {\n        case x > 0 => 1\n        case _ => 0\n    }\n}",
    ),
    clean(
        "loops",
        Category::Expressions,
        "main() {\n    var i = 0\n    while (i < 10) { i++ }\n    do { i-- } while (i > 0)\n}",
    ),
    clean(
        "for_in_with_guard",
        Category::Expressions,
        "main() {\n    for (i in 0..10 where i % 2 == 0) {\n        println(i)\n    }\n}",
    ),
    clean(
        "try_catch_finally",
        Category::Expressions,
        "main() {\n    try {\n        risky()\n    } catch (e: IOException | TimeoutException) {\n        log(e)\n    } finally {\n        close()\n    }\n}",
    ),
    clean(
        "try_with_resources",
        Category::Expressions,
        "main() {\n    try (r = open(\"f\")) {\n        r.read()\n    } catch (_: Exception) {\n    }\n}",
    ),
    clean("lambda", Category::Expressions, "let add = { a: Int64, b: Int64 => a + b }"),
    clean(
        "trailing_lambda",
        Category::Expressions,
        "main() {\n    xs.forEach { x => println(x) }\n}",
    ),
    clean("optional_chain", Category::Expressions, "let n = a?.b?.c()"),
    clean(
        "spawn_and_synchronized",
        Category::Expressions,
        "main() {\n    let f = spawn { work() }\n    synchronized (m) { count++ }\n}",
    ),
    clean("quote", Category::Expressions, "let t = quote(a + $b)"),
    clean("macro_call", Category::Expressions, "let v = @Memo(fib(10))"),
    clean(
        "type_test_and_cast",
        Category::Expressions,
        "let b = x is Int64 && (y as Float64).isSome()",
    ),
    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------
    clean("generic_constructor", Category::Types, "let m = HashMap<String, Int64>()"),
    clean(
        "nested_generics",
        Category::Types,
        "let m: HashMap<String, Array<Int64>> = HashMap<String, Array<Int64>>()",
    ),
    clean("function_type", Category::Types, "let f: (Int64, Int64) -> Int64 = add"),
    clean("optional_type", Category::Types, "var o: ?Int64 = None"),
    clean("tuple_type", Category::Types, "let p: (Int64, String) = (1, \"a\")"),
    clean("comparisons_not_generics", Category::Types, "let c = f(a < b, c > (d))"),
    clean("qualified_type", Category::Types, "let t: std.time.Duration = d"),
    // ------------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------------
    clean(
        "match_forms",
        Category::Patterns,
        "main() {\n    match (x) {\n        case 1 | 2 => a\n        case Some(v) | None => b\n        case (p, _) => c\n        case n: Int64 => d\n        case _ => e\n    }\n}",
    ),
    clean(
        "match_guard",
        Category::Patterns,
        "main() {\n    match (x) {\n        case Some(v) where v > 0 => v\n        case _ => 0\n    }\n}",
    ),
    clean("destructuring_let", Category::Patterns, "let (a, b) = pair"),
    clean(
        "qualified_enum_pattern",
        Category::Patterns,
        "main() {\n    match (c) {\n        case Color.Red => 1\n        case Color.Rgb(r, _, _) => r\n        case _ => 0\n    }\n}",
    ),
    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------
    clean("interpolation", Category::Strings, "let s = \"sum: ${a + b}\""),
    clean("multi_line", Category::Strings, "let s = \"\"\"\nline ${x}\n\"\"\""),
    clean("raw_string", Category::Strings, r##"let r = #"no \n escapes"#"##),
    clean("rune_and_byte", Category::Strings, "let c = r'a'\nlet b = b'x'"),
    clean("single_quoted", Category::Strings, "let s = 'it \"works\"'"),
    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------
    clean(
        "package_and_imports",
        Category::Declarations,
        "package demo.app\nimport std.collection.*\nimport std.io.{InputStream, OutputStream as Out}\n",
    ),
    clean(
        "class_members",
        Category::Declarations,
        "public open class Account <: Printable {
    Account(private let owner: String, var balance: Int64) {}
    public prop total: Int64 {
        get() { balance }
    }
    public func deposit(amount!: Int64 = 0): Unit {
        balance += amount
    }
    static init() {}
    ~init() {}
}",
    ),
    clean(
        "generic_struct",
        Category::Declarations,
        "struct Pair<T, U> where T <: Equatable<T> {\n    let first: T\n    let second: U\n}",
    ),
    clean(
        "interface",
        Category::Declarations,
        "interface Shape {\n    func area(): Float64\n    prop name: String\n}",
    ),
    clean(
        "enum_with_members",
        Category::Declarations,
        "enum Option<T> {\n    | Some(T) | None\n    func isSome(): Bool {\n        match (this) {\n            case Some(_) => true\n            case None => false\n        }\n    }\n}",
    ),
    clean(
        "extend",
        Category::Declarations,
        "extend<T> Array<T> <: Printable where T <: ToString {\n    public func print(): Unit {}\n}",
    ),
    clean(
        "operator_function",
        Category::Declarations,
        "struct V {\n    operator func +(o: V): V { o }\n}",
    ),
    clean("type_alias", Category::Declarations, "type Name = String"),
    clean(
        "foreign_function",
        Category::Declarations,
        "foreign func strlen(s: CString): UIntNative",
    ),
    clean(
        "macro_definition",
        Category::Declarations,
        "public macro Log(input: Tokens): Tokens { input }",
    ),
    clean("main", Category::Declarations, "main(): Int64 {\n    return 0\n}"),
    clean("annotation", Category::Declarations, "@Deprecated\nfunc old() {}"),
    // ------------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------------
    errors("missing_expression", "let x = = 3"),
    errors("unclosed_paren", "let x = (1 + 2\nlet y = 3"),
    errors("expression_in_class_body", "class A {\n    1 + 2\n}"),
    errors("missing_separator", "main() { let a = 1 let b = 2 }"),
    errors("unterminated_string", "let s = \"abc"),
    errors("raw_fence_mismatch", r##"let r = ##"a"#"##),
    errors("assignment_as_value", "let x = (a = 1)"),
    errors("duplicate_main", "main() {}\nmain() {}"),
    errors("missing_type_name", "class {}"),
    errors("missing_parameter_type", "func f(a: ) {}"),
    errors("match_without_case", "main() {\n    match (x) { 1 => 2 }\n}"),
    errors("alternation_in_declaration", "let (a | b) = p"),
];

// ============================================================================
// Runner
// ============================================================================

/// Outcome of one case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub case: Case,
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the parser panicked.
    pub panic: Option<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        if self.panic.is_some() {
            return false;
        }
        match self.case.expect {
            Expect::Clean => self.diagnostics.is_empty(),
            Expect::Errors => !self.diagnostics.is_empty(),
        }
    }

    /// One line explaining a failure.
    pub fn explain(&self) -> String {
        if let Some(message) = &self.panic {
            return format!("panicked: {}", message);
        }
        match self.diagnostics.first() {
            Some(d) => format!("{} at {}: {}", d.code, d.span.start, d.message_text),
            None => "no diagnostics reported".to_string(),
        }
    }
}

/// Parse one case, catching panics so the rest of the corpus still runs.
pub fn run_case(case: &Case) -> CaseResult {
    let options = ParseOptions::default().with_file_name(format!("{}.cj", case.name));
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        parse_file(case.source.as_bytes(), &options)
    }));
    match outcome {
        Ok(parse) => CaseResult {
            case: *case,
            diagnostics: parse.diagnostics,
            panic: None,
        },
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "unknown panic".to_string()
            };
            CaseResult {
                case: *case,
                diagnostics: Vec::new(),
                panic: Some(message),
            }
        }
    }
}

pub fn run_all() -> Vec<CaseResult> {
    CASES.iter().map(run_case).collect()
}

/// Pass counts per category, and the failures.
pub fn summarize(results: &[CaseResult]) -> String {
    let mut by_category: BTreeMap<Category, (usize, usize)> = BTreeMap::new();
    for result in results {
        let entry = by_category.entry(result.case.category).or_insert((0, 0));
        if result.passed() {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    let passed = results.iter().filter(|r| r.passed()).count();
    let mut out = format!("conformance: {}/{} passed\n", passed, results.len());
    for (category, (passed, total)) in &by_category {
        out.push_str(&format!("  {}: {}/{}\n", category, passed, total));
    }
    for failure in results.iter().filter(|r| !r.passed()) {
        out.push_str(&format!(
            "  FAIL [{}] {}: {}\n",
            failure.case.category,
            failure.case.name,
            failure.explain()
        ));
    }
    out
}
