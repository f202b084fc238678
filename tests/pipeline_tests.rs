use carbonize::emit::{EmitError, EmitResult, Emitter, RuleSet, StmtVariant};
use carbonize::errors::pretty::format_translate_error;
use carbonize::errors::ErrorCode;
use carbonize::ir::{Block, Expr, Function, Stmt, Type};
use carbonize::lowering::{ArithmeticTyping, LowerError, LowerOptions};
use carbonize::{TranslateError, TranslateOptions, Translator};

const LOOPS: &str = r#"
// running sum over a half-open range
int sum_to(int n) {
    int sum = 0;
    for (int i = 0; i < n; i++) {
        sum += i;
    }
    return sum;
}

bool in_range(int x, int lo, int hi) {
    return x >= lo && x <= hi;
}
"#;

fn translate(source: &str) -> Result<carbonize::Translation, TranslateError> {
    Translator::default().translate_source(source)
}

#[test]
fn translates_a_unit_end_to_end() {
    let translation = translate(LOOPS).expect("translates");
    assert!(translation.is_clean());

    let expected = [
        "fn sum_to(n: i32) -> i32 {",
        "  var sum: i32 = 0;",
        "  var i: i32 = 0;",
        "  while ((i < n)) {",
        "    sum = (sum + i);",
        "    i = (i + 1);",
        "  }",
        "  return sum;",
        "}",
        "",
        "fn in_range(x: i32, lo: i32, hi: i32) -> bool {",
        "  return ((x >= lo) and (x <= hi));",
        "}",
    ]
    .join("\n");
    assert_eq!(translation.output(), expected);

    let names = translation
        .functions
        .iter()
        .map(|function| function.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["sum_to", "in_range"]);
    assert_eq!(translation.functions[1].ir.return_type, Type::bool());
}

#[test]
fn prototypes_are_skipped() {
    let translation = translate("int later(int x);\nint now(void) { return 1; }").expect("translates");
    assert_eq!(translation.functions.len(), 1);
    assert_eq!(translation.output(), "fn now() -> i32 {\n  return 1;\n}");
}

#[test]
fn empty_unit_produces_no_output() {
    let translation = translate("// nothing here\n").expect("translates");
    assert!(translation.functions.is_empty());
    assert_eq!(translation.output(), "");
}

#[test]
fn type_errors_stop_the_unit_by_default() {
    let source = "int ok(void) { return 1; }\nint bad(int x) { if (x) { return 1; } return 0; }\nint never(void) { return 2; }";
    let err = translate(source).unwrap_err();
    assert_eq!(err.function(), Some("bad"));
    let TranslateError::Type { source: diag, .. } = &err else {
        panic!("expected a type error, got {err:?}");
    };
    assert_eq!(diag.code, ErrorCode::InvalidIr);
    assert_eq!(diag.message, "If condition must be Bool, got I32");
    assert_eq!(
        err.to_string(),
        "in function 'bad': E_INVALID_IR: If condition must be Bool, got I32 @ Var(x:I32)"
    );
}

#[test]
fn keep_going_records_failures_and_continues() {
    let options = TranslateOptions {
        keep_going: true,
        ..TranslateOptions::default()
    };
    let source = "int first(void) { return 1; }\n\
                  int looping(void) { while (true) { break; } return 0; }\n\
                  int last(void) { return 3; }";
    let translation = Translator::new(options)
        .translate_source(source)
        .expect("unit translates");

    assert!(!translation.is_clean());
    assert_eq!(translation.functions.len(), 2);
    assert_eq!(translation.failures.len(), 1);
    assert!(matches!(
        &translation.failures[0],
        TranslateError::Lower {
            function,
            source: LowerError::Unsupported { kind },
        } if function == "looping" && kind == "BreakStmt"
    ));
    assert_eq!(
        translation.output(),
        "fn first() -> i32 {\n  return 1;\n}\n\nfn last() -> i32 {\n  return 3;\n}"
    );
}

#[test]
fn typecheck_can_be_disabled() {
    let source = "int loose(int x) { if (x) { return 1; } return 0; }";
    let options = TranslateOptions {
        typecheck: false,
        ..TranslateOptions::default()
    };
    let translation = Translator::new(options)
        .translate_source(source)
        .expect("emits without checking");
    assert_eq!(
        translation.output(),
        "fn loose(x: i32) -> i32 {\n  if (x) {\n    return 1;\n  }\n  return 0;\n}"
    );
}

#[test]
fn arithmetic_typing_flows_into_the_check() {
    let source = "double twice(double x) { return x + x; }";

    let err = translate(source).unwrap_err();
    assert!(matches!(err, TranslateError::Type { .. }));

    let options = TranslateOptions {
        lower: LowerOptions {
            arithmetic: ArithmeticTyping::FromOperands,
        },
        ..TranslateOptions::default()
    };
    let translation = Translator::new(options)
        .translate_source(source)
        .expect("operand typing checks");
    assert_eq!(
        translation.output(),
        "fn twice(x: f64) -> f64 {\n  return (x + x);\n}"
    );
}

#[test]
fn lex_and_parse_errors_surface_before_any_function() {
    assert!(matches!(
        translate("int f(void) { return 1 @ 2; }"),
        Err(TranslateError::Lex(_))
    ));
    let err = translate("int f(void) { do { } while (true); }").unwrap_err();
    assert!(matches!(err, TranslateError::Parse(_)));
    assert_eq!(err.function(), None);
}

fn emit_return_upper(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::Return(value) = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    Ok(vec![format!(
        "{}RETURN {};",
        "  ".repeat(indent),
        emitter.emit_expr(value)?
    )])
}

#[test]
fn custom_rules_overlay_the_defaults() {
    let rules = RuleSet::new().with_stmt(StmtVariant::Return, emit_return_upper);
    let translator = Translator::with_rules(TranslateOptions::default(), &rules);
    let translation = translator
        .translate_source("int one(void) { int x = 1; return x; }")
        .expect("translates");
    assert_eq!(
        translation.output(),
        "fn one() -> i32 {\n  var x: i32 = 1;\n  RETURN x;\n}"
    );
}

#[test]
fn hand_built_ir_goes_through_check_and_emit() {
    let function = Function::new(
        "flag",
        Vec::new(),
        Type::bool(),
        Block::new(vec![Stmt::Return(Expr::int(1, Type::i32()))]),
    );
    let err = Translator::default().translate_ir(&function).unwrap_err();
    assert_eq!(err.function(), Some("flag"));
    assert!(matches!(err, TranslateError::Type { .. }));
}

#[test]
fn rendered_errors_point_at_the_function() {
    let source = "int bad(int x) { return x && x; }";
    let err = translate(source).unwrap_err();
    let rendered = format_translate_error("bad.c", source, &err);
    assert!(rendered.starts_with("type error [E_INVALID_IR]: Logical expects Bool Bool -> Bool"));
    assert!(rendered.contains("--> bad.c (function 'bad')"));
    assert!(rendered.contains("node: Binary(LAND:Bool, Var(x:I32), Var(x:I32))"));
}

#[test]
fn emitter_failures_render_as_internal_errors() {
    let source = "int one(void) { return 1; }";
    let translator =
        Translator::with_emitter(TranslateOptions::default(), Emitter::new(RuleSet::new()));
    let err = translator.translate_source(source).unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Emit {
            source: EmitError::UnsupportedType(_),
            ..
        }
    ));
    let rendered = format_translate_error("one.c", source, &err);
    assert!(rendered.starts_with("internal error [E_INTERNAL]: type not supported by target: I32"));
    assert!(rendered.contains("--> one.c (function 'one')"));
}

#[test]
fn out_of_range_floats_stop_at_the_lexer() {
    let err = translate("double f(void) { double x = 1e999; return x; }").unwrap_err();
    assert!(matches!(err, TranslateError::Lex(_)));
    assert_eq!(err.function(), None);
}
