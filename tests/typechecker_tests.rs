use carbonize::errors::{Diagnostic, ErrorCode};
use carbonize::ir::{BinOp, Block, Expr, Function, LiteralValue, Stmt, Type, Var};
use carbonize::typechecker::check_function;

fn main_returning(return_type: Type, stmts: Vec<Stmt>) -> Function {
    Function::new("main", Vec::new(), return_type, Block::new(stmts))
}

fn check(stmts: Vec<Stmt>) -> Result<(), Diagnostic> {
    check_function(&main_returning(Type::i32(), stmts))
}

fn i32_var(name: &str) -> Var {
    Var::new(name, Type::i32())
}

fn int(value: i64) -> Expr {
    Expr::int(value, Type::i32())
}

#[test]
fn accepts_well_typed_loop_and_branch() {
    let i = i32_var("i");
    let sum = i32_var("sum");
    let ret = i32_var("ret");
    let flag = Var::new("flag", Type::bool());

    let function = main_returning(
        Type::i32(),
        vec![
            Stmt::VarDecl {
                var: i.clone(),
                init: Some(int(0)),
            },
            Stmt::VarDecl {
                var: sum.clone(),
                init: Some(int(0)),
            },
            Stmt::VarDecl {
                var: flag.clone(),
                init: Some(Expr::boolean(true)),
            },
            Stmt::VarDecl {
                var: ret.clone(),
                init: Some(int(0)),
            },
            Stmt::While {
                cond: Expr::binary(BinOp::Lt, i.clone().into(), int(3), Type::bool()),
                body: Block::new(vec![
                    Stmt::assign(
                        sum.clone(),
                        Expr::binary(BinOp::Add, sum.clone().into(), i.clone().into(), Type::i32()),
                    ),
                    Stmt::assign(
                        i.clone(),
                        Expr::binary(BinOp::Add, i.clone().into(), int(1), Type::i32()),
                    ),
                ]),
            },
            Stmt::If {
                cond: Expr::binary(
                    BinOp::LAnd,
                    flag.into(),
                    Expr::binary(BinOp::Ge, sum.into(), int(1), Type::bool()),
                    Type::bool(),
                ),
                then_block: Block::new(vec![Stmt::assign(ret.clone(), int(1))]),
                else_block: Some(Block::new(vec![Stmt::assign(ret.clone(), int(0))])),
            },
            Stmt::Return(ret.into()),
        ],
    );

    assert_eq!(check_function(&function), Ok(()));
}

#[test]
fn rejects_non_bool_if_condition() {
    let err = check(vec![Stmt::If {
        cond: Expr::var("x", Type::i32()),
        then_block: Block::default(),
        else_block: None,
    }])
    .expect_err("i32 condition");
    assert_eq!(err.code, ErrorCode::InvalidIr);
    assert_eq!(err.message, "If condition must be Bool, got I32");
    assert_eq!(err.node_hint.as_deref(), Some("Var(x:I32)"));
}

#[test]
fn rejects_non_bool_while_condition() {
    let err = check(vec![Stmt::While {
        cond: int(1),
        body: Block::default(),
    }])
    .expect_err("i32 condition");
    assert_eq!(err.message, "While condition must be Bool, got I32");
}

#[test]
fn rejects_bool_assigned_to_i32() {
    let err = check(vec![Stmt::assign(i32_var("x"), Expr::boolean(true))])
        .expect_err("bool into i32");
    assert_eq!(
        err.to_string(),
        "E_INVALID_IR: Assign type mismatch: target x:I32 but value is Bool \
         @ Assign(x:I32 = Literal(true:Bool))"
    );
}

#[test]
fn rejects_mismatched_var_decl_init() {
    let err = check(vec![Stmt::VarDecl {
        var: i32_var("x"),
        init: Some(Expr::boolean(false)),
    }])
    .expect_err("bool init");
    assert_eq!(
        err.message,
        "VarDecl init type mismatch: var x:I32 but init is Bool"
    );
}

#[test]
fn rejects_returning_bool_from_i32_function() {
    let err = check(vec![Stmt::Return(Expr::boolean(true))]).expect_err("bool return");
    assert_eq!(
        err.message,
        "Return type mismatch: function returns I32 but returned expr is Bool"
    );
}

#[test]
fn rejects_logical_and_over_ints() {
    let err = check(vec![Stmt::ExprStmt(Expr::binary(
        BinOp::LAnd,
        Expr::var("a", Type::i32()),
        Expr::var("b", Type::i32()),
        Type::bool(),
    ))])
    .expect_err("i32 && i32");
    assert!(err.message.starts_with("Logical expects Bool Bool -> Bool"));
    assert_eq!(
        err.node_hint.as_deref(),
        Some("Binary(LAND:Bool, Var(a:I32), Var(b:I32))")
    );
}

#[test]
fn rejects_comparison_typed_as_int() {
    let err = check(vec![Stmt::ExprStmt(Expr::binary(
        BinOp::Lt,
        int(1),
        int(2),
        Type::i32(),
    ))])
    .expect_err("< typed i32");
    assert_eq!(
        err.message,
        "Comparison expects same numeric types -> Bool: lhs=I32 rhs=I32 result=I32"
    );
}

#[test]
fn rejects_bool_literal_holding_an_integer() {
    let bogus = Expr::Literal {
        value: LiteralValue::Int(1),
        ty: Type::bool(),
    };
    let err = check(vec![Stmt::ExprStmt(bogus)]).expect_err("int-valued bool literal");
    assert_eq!(
        err.message,
        "Bool literal expects a boolean value, got an integer"
    );
}

#[test]
fn signedness_mismatch_is_not_coerced() {
    let err = check(vec![Stmt::assign(
        Var::new("u", Type::u32()),
        Expr::var("i", Type::i32()),
    )])
    .expect_err("i32 into u32");
    assert_eq!(
        err.message,
        "Assign type mismatch: target u:U32 but value is I32"
    );
}

#[test]
fn arithmetic_requires_identical_operands_and_result() {
    let mixed = Expr::binary(
        BinOp::Add,
        Expr::var("a", Type::i32()),
        Expr::var("b", Type::u32()),
        Type::i32(),
    );
    assert!(check(vec![Stmt::ExprStmt(mixed)]).is_err());

    let floats = Expr::binary(
        BinOp::Mul,
        Expr::var("a", Type::f64()),
        Expr::float(2.0, Type::f64()),
        Type::f64(),
    );
    assert_eq!(check(vec![Stmt::ExprStmt(floats)]), Ok(()));

    let bools = Expr::binary(
        BinOp::Add,
        Expr::boolean(true),
        Expr::boolean(false),
        Type::bool(),
    );
    let err = check(vec![Stmt::ExprStmt(bools)]).expect_err("bool arithmetic");
    assert!(err.message.starts_with("Arithmetic expects same numeric types"));
}

#[test]
fn equality_accepts_bools_but_not_mixed_kinds() {
    let bools = Expr::binary(
        BinOp::Eq,
        Expr::boolean(true),
        Expr::var("flag", Type::bool()),
        Type::bool(),
    );
    assert_eq!(check(vec![Stmt::ExprStmt(bools)]), Ok(()));

    let mixed = Expr::binary(BinOp::Ne, int(1), Expr::boolean(true), Type::bool());
    let err = check(vec![Stmt::ExprStmt(mixed)]).expect_err("i32 != bool");
    assert!(err
        .message
        .starts_with("Equality expects same (int/float/bool) types -> Bool"));
}

#[test]
fn not_requires_bool_operand() {
    let err = check(vec![Stmt::ExprStmt(Expr::not(int(0)))]).expect_err("!i32");
    assert_eq!(err.message, "Unary NOT expects Bool -> Bool, got I32 -> Bool");
}

#[test]
fn casts_report_their_target_type() {
    let cast = Expr::cast(Expr::var("i", Type::i32()), Type::u32());
    assert_eq!(
        check(vec![Stmt::assign(Var::new("u", Type::u32()), cast)]),
        Ok(())
    );

    let from_void = Expr::cast(Expr::var("v", Type::void()), Type::i32());
    let err = check(vec![Stmt::ExprStmt(from_void)]).expect_err("cast from void");
    assert_eq!(err.message, "Cast from unsupported type Void to I32");
}

#[test]
fn nested_blocks_keep_the_function_return_type() {
    let err = check_function(&main_returning(
        Type::bool(),
        vec![Stmt::While {
            cond: Expr::boolean(true),
            body: Block::new(vec![Stmt::If {
                cond: Expr::boolean(false),
                then_block: Block::new(vec![Stmt::Return(int(1))]),
                else_block: None,
            }]),
        }],
    ))
    .expect_err("i32 returned from bool function");
    assert_eq!(
        err.message,
        "Return type mismatch: function returns Bool but returned expr is I32"
    );
}

#[test]
fn first_violation_wins() {
    let err = check(vec![
        Stmt::Return(Expr::boolean(true)),
        Stmt::assign(i32_var("x"), Expr::boolean(true)),
    ])
    .expect_err("two violations");
    assert!(err.message.starts_with("Return type mismatch"));
}
