use carbonize::lexer::lex;
use carbonize::lowering::{NodeKind, SyntaxNode};
use carbonize::parser::ast::Node;
use carbonize::parser::{parse, ParseError};

fn parse_source(source: &str) -> Result<Node, ParseError> {
    parse(lex(source).expect("lex should succeed"))
}

fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
    nodes.iter().map(|node| node.kind()).collect()
}

fn body(function: &Node) -> &Node {
    function
        .children()
        .iter()
        .find(|child| child.kind() == NodeKind::CompoundStmt)
        .expect("function body")
}

#[test]
fn functions_carry_name_type_and_parameters() {
    let unit = parse_source("unsigned int add(unsigned int a, int b) { return a; }")
        .expect("parses");
    assert_eq!(unit.kind(), NodeKind::TranslationUnit);

    let function = unit.functions().next().expect("function");
    assert_eq!(function.spelling(), "add");
    assert_eq!(function.type_text(), "unsigned int");
    assert_eq!(
        kinds(function.children()),
        vec![NodeKind::ParmDecl, NodeKind::ParmDecl, NodeKind::CompoundStmt]
    );
    let params = &function.children()[..2];
    assert_eq!(params[0].spelling(), "a");
    assert_eq!(params[0].type_text(), "unsigned int");
    assert_eq!(params[1].type_text(), "int");
}

#[test]
fn prototypes_have_no_body() {
    let unit = parse_source("int later(void);\nint now(void) { return 0; }").expect("parses");
    let functions = unit.functions().collect::<Vec<_>>();
    assert_eq!(functions.len(), 2);
    assert!(functions[0].children().is_empty());
    assert_eq!(
        kinds(functions[1].children()),
        vec![NodeKind::CompoundStmt]
    );
}

#[test]
fn statements_map_to_cursor_kinds() {
    let unit = parse_source(
        "int f(int n) {
            int a = 1, b;
            if (n > 0) a = 2; else { b = 3; }
            while (a < n) a += 1;
            for (;;) { }
            ;
            return a;
        }",
    )
    .expect("parses");
    let function = unit.functions().next().expect("function");
    let stmts = body(function).children();
    assert_eq!(
        kinds(stmts),
        vec![
            NodeKind::DeclStmt,
            NodeKind::IfStmt,
            NodeKind::WhileStmt,
            NodeKind::ForStmt,
            NodeKind::NullStmt,
            NodeKind::ReturnStmt,
        ]
    );

    let decls = stmts[0].children();
    assert_eq!(kinds(decls), vec![NodeKind::VarDecl, NodeKind::VarDecl]);
    assert_eq!(kinds(decls[0].children()), vec![NodeKind::IntegerLiteral]);
    assert!(decls[1].children().is_empty());

    assert_eq!(stmts[1].children().len(), 3);
    assert_eq!(
        kinds(stmts[2].children()),
        vec![NodeKind::BinaryOperator, NodeKind::CompoundAssignOperator]
    );
    // an empty for header contributes no children
    assert_eq!(kinds(stmts[3].children()), vec![NodeKind::CompoundStmt]);
}

#[test]
fn expressions_respect_precedence() {
    let unit = parse_source("bool f(int a, int b) { return a + b * 2 < 7 || !(a == b); }")
        .expect("parses");
    let function = unit.functions().next().expect("function");
    let ret = &body(function).children()[0];
    let or = &ret.children()[0];
    assert_eq!(or.kind(), NodeKind::BinaryOperator);

    let token_text = |node: &Node| {
        node.tokens()
            .iter()
            .map(|token| token.spelling.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    assert_eq!(token_text(or), "a + b * 2 < 7 || ! ( a == b )");

    let [less, not] = or.children() else {
        panic!("expected two operands");
    };
    assert_eq!(token_text(less), "a + b * 2 < 7");
    assert_eq!(not.kind(), NodeKind::UnaryOperator);
    assert_eq!(kinds(not.children()), vec![NodeKind::ParenExpr]);

    let sum = &less.children()[0];
    assert_eq!(token_text(sum), "a + b * 2");
    assert_eq!(token_text(&sum.children()[1]), "b * 2");
}

#[test]
fn references_carry_their_declared_type() {
    let unit = parse_source("double f(float x) { double y = x; return y; }").expect("parses");
    let function = unit.functions().next().expect("function");
    let decl = &body(function).children()[0].children()[0];
    let init = &decl.children()[0];
    assert_eq!(init.kind(), NodeKind::DeclRefExpr);
    assert_eq!(init.spelling(), "x");
    assert_eq!(init.type_text(), "float");
}

#[test]
fn casts_calls_and_literals() {
    let unit = parse_source("int f(int x) { return (int) 2.5f + g(x, 1u) + true; }")
        .expect("parses");
    let function = unit.functions().next().expect("function");
    let sum = &body(function).children()[0].children()[0];
    let [lhs, literal] = sum.children() else {
        panic!("expected two operands");
    };
    assert_eq!(literal.kind(), NodeKind::BoolLiteral);

    let [cast, call] = lhs.children() else {
        panic!("expected two operands");
    };
    assert_eq!(cast.kind(), NodeKind::CStyleCastExpr);
    assert_eq!(cast.type_text(), "int");
    assert_eq!(cast.children()[0].kind(), NodeKind::FloatingLiteral);
    assert_eq!(cast.children()[0].type_text(), "float");

    assert_eq!(call.kind(), NodeKind::CallExpr);
    assert_eq!(call.spelling(), "g");
    assert_eq!(call.children()[1].type_text(), "unsigned int");
}

#[test]
fn extents_follow_the_source_offsets() {
    let source = "int f(int a) { return a; }";
    let unit = parse_source(source).expect("parses");
    let function = unit.functions().next().expect("function");
    let ret = &body(function).children()[0];
    let extent = ret.extent();
    assert_eq!(&source[extent.start..extent.end], "return a;");
}

#[test]
fn undeclared_identifiers_are_rejected() {
    let err = parse_source("int f(void) { return y; }").unwrap_err();
    assert_eq!(err.message, "use of undeclared identifier 'y'");
    assert_eq!((err.line, err.column), (1, 22));
}

#[test]
fn locals_do_not_leak_between_functions() {
    let err = parse_source("int f(void) { int x = 1; return x; }\nint g(void) { return x; }")
        .unwrap_err();
    assert_eq!(err.message, "use of undeclared identifier 'x'");
    assert_eq!(err.line, 2);
}

#[test]
fn unsupported_top_level_and_loops() {
    let err = parse_source("int counter;").unwrap_err();
    assert_eq!(
        err.message,
        "expected '(' after function name; only function declarations are supported"
    );

    let err = parse_source("int f(void) { do { } while (1); }").unwrap_err();
    assert_eq!(err.message, "do-while loops are not supported");

    let err = parse_source("int f(void) { return 1 }").unwrap_err();
    assert_eq!(err.message, "expected ';' after return");
    assert_eq!(
        err.to_string(),
        "parse error at line 1, column 24: expected ';' after return"
    );
}
