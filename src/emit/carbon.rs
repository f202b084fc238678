//! Default Carbon rule set.

use super::{pad, EmitError, EmitResult, Emitter, ExprVariant, RuleSet, StmtVariant};
use crate::ir::{BinOp, Expr, LiteralValue, Stmt, Type, UnOp};

/// Build the default Carbon rules. Every IR variant gets an entry; the
/// exhaustive matches below fail to compile when a variant is added
/// without a handler.
pub fn rules() -> RuleSet {
    let mut rules = RuleSet::new();
    for variant in ExprVariant::ALL {
        rules = rules.with_expr(variant, expr_rule(variant));
    }
    for variant in StmtVariant::ALL {
        rules = rules.with_stmt(variant, stmt_rule(variant));
    }
    rules
        .with_type(Type::i32(), "i32")
        .with_type(Type::u32(), "u32")
        .with_type(Type::bool(), "bool")
        .with_type(Type::f32(), "f32")
        .with_type(Type::f64(), "f64")
        .with_type(Type::void(), "()")
}

fn expr_rule(variant: ExprVariant) -> super::ExprRule {
    match variant {
        ExprVariant::Literal => emit_literal,
        ExprVariant::Var => emit_var,
        ExprVariant::Binary => emit_binary,
        ExprVariant::Unary => emit_unary,
        ExprVariant::Cast => emit_cast,
    }
}

fn stmt_rule(variant: StmtVariant) -> super::StmtRule {
    match variant {
        StmtVariant::VarDecl => emit_var_decl,
        StmtVariant::Assign => emit_assign,
        StmtVariant::Return => emit_return,
        StmtVariant::ExprStmt => emit_expr_stmt,
        StmtVariant::If => emit_if,
        StmtVariant::While => emit_while,
        StmtVariant::Block => emit_nested_block,
    }
}

pub fn binary_op(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::LAnd => "and",
        BinOp::LOr => "or",
    }
}

pub fn unary_op(op: UnOp) -> &'static str {
    match op {
        UnOp::Not => "not",
    }
}

fn emit_literal(_: &Emitter, expr: &Expr) -> EmitResult<String> {
    let Expr::Literal { value, ty } = expr else {
        return Err(EmitError::NoExprRule(ExprVariant::of(expr)));
    };
    match (value, ty) {
        (LiteralValue::Bool(b), Type::Bool) => Ok(if *b { "true" } else { "false" }.to_string()),
        (LiteralValue::Int(v), Type::Int { .. }) => Ok(v.to_string()),
        (LiteralValue::Float(v), Type::Float { .. }) => {
            float_text(*v).ok_or_else(|| EmitError::UnsupportedLiteral(expr.hint()))
        }
        _ => Err(EmitError::UnsupportedLiteral(expr.hint())),
    }
}

/// Plain decimal spelling with at least one digit on each side of the
/// point. `Display` for `f64` never switches to exponent form.
fn float_text(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Some(text)
}

fn emit_var(_: &Emitter, expr: &Expr) -> EmitResult<String> {
    match expr {
        Expr::Var(var) => Ok(var.name.clone()),
        other => Err(EmitError::NoExprRule(ExprVariant::of(other))),
    }
}

fn emit_binary(emitter: &Emitter, expr: &Expr) -> EmitResult<String> {
    let Expr::Binary { op, lhs, rhs, .. } = expr else {
        return Err(EmitError::NoExprRule(ExprVariant::of(expr)));
    };
    Ok(format!(
        "({} {} {})",
        emitter.emit_expr(lhs)?,
        binary_op(*op),
        emitter.emit_expr(rhs)?
    ))
}

fn emit_unary(emitter: &Emitter, expr: &Expr) -> EmitResult<String> {
    let Expr::Unary { op, operand, .. } = expr else {
        return Err(EmitError::NoExprRule(ExprVariant::of(expr)));
    };
    Ok(format!("({} {})", unary_op(*op), emitter.emit_expr(operand)?))
}

fn emit_cast(emitter: &Emitter, expr: &Expr) -> EmitResult<String> {
    let Expr::Cast { expr: inner, to } = expr else {
        return Err(EmitError::NoExprRule(ExprVariant::of(expr)));
    };
    Ok(format!(
        "({}) as {}",
        emitter.emit_expr(inner)?,
        emitter.emit_type(to)?
    ))
}

fn emit_var_decl(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::VarDecl { var, init } = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    let ty = emitter.emit_type(&var.ty)?;
    let line = match init {
        Some(init) => format!(
            "{}var {}: {} = {};",
            pad(indent),
            var.name,
            ty,
            emitter.emit_expr(init)?
        ),
        None => format!("{}var {}: {};", pad(indent), var.name, ty),
    };
    Ok(vec![line])
}

fn emit_assign(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::Assign { target, value } = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    Ok(vec![format!(
        "{}{} = {};",
        pad(indent),
        target.name,
        emitter.emit_expr(value)?
    )])
}

fn emit_return(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::Return(value) = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    Ok(vec![format!(
        "{}return {};",
        pad(indent),
        emitter.emit_expr(value)?
    )])
}

fn emit_expr_stmt(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::ExprStmt(expr) = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    Ok(vec![format!("{}{};", pad(indent), emitter.emit_expr(expr)?)])
}

fn emit_if(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::If {
        cond,
        then_block,
        else_block,
    } = stmt
    else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    let pad = pad(indent);
    let mut lines = vec![format!("{}if ({}) {{", pad, emitter.emit_expr(cond)?)];
    lines.extend(emitter.emit_block(then_block, indent + 1)?);
    if let Some(else_block) = else_block {
        lines.push(format!("{}}} else {{", pad));
        lines.extend(emitter.emit_block(else_block, indent + 1)?);
    }
    lines.push(format!("{}}}", pad));
    Ok(lines)
}

fn emit_while(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::While { cond, body } = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    let pad = pad(indent);
    let mut lines = vec![format!("{}while ({}) {{", pad, emitter.emit_expr(cond)?)];
    lines.extend(emitter.emit_block(body, indent + 1)?);
    lines.push(format!("{}}}", pad));
    Ok(lines)
}

fn emit_nested_block(emitter: &Emitter, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
    let Stmt::Block(block) = stmt else {
        return Err(EmitError::NoStmtRule(StmtVariant::of(stmt)));
    };
    let pad = pad(indent);
    let mut lines = vec![format!("{}{{", pad)];
    lines.extend(emitter.emit_block(block, indent + 1)?);
    lines.push(format!("{}}}", pad));
    Ok(lines)
}
