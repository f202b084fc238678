//! IR pretty-printing for debugging
//!
//! `render_function` produces an indented tree, two spaces per level.
//! `Expr::hint` and `Stmt::hint` produce a compact single-line form used as
//! the node hint in diagnostics.

use super::*;
use std::fmt;

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(value) => write!(f, "{}", value),
            LiteralValue::Float(value) => write!(f, "{:?}", value),
            LiteralValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_function(self))
    }
}

/// Render a function as an indented IR tree.
pub fn render_function(function: &Function) -> String {
    let params = function
        .params
        .iter()
        .map(|param| format!("{}:{}", param.name, param.ty.short()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut lines = vec![format!(
        "Function {}({}) -> {}",
        function.name,
        params,
        function.return_type.short()
    )];
    render_block(&function.body, 1, &mut lines);
    lines.join("\n")
}

/// Render a single statement subtree starting at `level`.
pub fn render_stmt(stmt: &Stmt, level: usize) -> String {
    let mut lines = Vec::new();
    push_stmt(stmt, level, &mut lines);
    lines.join("\n")
}

/// Render a single expression subtree starting at `level`.
pub fn render_expr(expr: &Expr, level: usize) -> String {
    let mut lines = Vec::new();
    push_expr(expr, level, &mut lines);
    lines.join("\n")
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

fn render_block(block: &Block, level: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}Block", indent(level)));
    for stmt in &block.stmts {
        push_stmt(stmt, level + 1, lines);
    }
}

fn push_stmt(stmt: &Stmt, level: usize, lines: &mut Vec<String>) {
    let pad = indent(level);
    match stmt {
        Stmt::VarDecl { var, init } => match init {
            Some(init) => {
                lines.push(format!("{}VarDecl {}:{} =", pad, var.name, var.ty.short()));
                push_expr(init, level + 1, lines);
            }
            None => lines.push(format!("{}VarDecl {}:{}", pad, var.name, var.ty.short())),
        },
        Stmt::Assign { target, value } => {
            lines.push(format!(
                "{}Assign {}:{} =",
                pad,
                target.name,
                target.ty.short()
            ));
            push_expr(value, level + 1, lines);
        }
        Stmt::Return(value) => {
            lines.push(format!("{}Return", pad));
            push_expr(value, level + 1, lines);
        }
        Stmt::ExprStmt(expr) => {
            lines.push(format!("{}ExprStmt", pad));
            push_expr(expr, level + 1, lines);
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            lines.push(format!("{}If", pad));
            push_expr(cond, level + 1, lines);
            render_block(then_block, level + 1, lines);
            if let Some(else_block) = else_block {
                lines.push(format!("{}Else", pad));
                render_block(else_block, level + 1, lines);
            }
        }
        Stmt::While { cond, body } => {
            lines.push(format!("{}While", pad));
            push_expr(cond, level + 1, lines);
            render_block(body, level + 1, lines);
        }
        Stmt::Block(block) => render_block(block, level, lines),
    }
}

fn push_expr(expr: &Expr, level: usize, lines: &mut Vec<String>) {
    let pad = indent(level);
    match expr {
        Expr::Literal { value, ty } => {
            lines.push(format!("{}Literal {} : {}", pad, value, ty.short()));
        }
        Expr::Var(var) => lines.push(format!("{}Var {} : {}", pad, var.name, var.ty.short())),
        Expr::Binary { op, lhs, rhs, ty } => {
            lines.push(format!("{}Binary {} : {}", pad, op.name(), ty.short()));
            push_expr(lhs, level + 1, lines);
            push_expr(rhs, level + 1, lines);
        }
        Expr::Unary { op, operand, ty } => {
            lines.push(format!("{}Unary {} : {}", pad, op.name(), ty.short()));
            push_expr(operand, level + 1, lines);
        }
        Expr::Cast { expr, to } => {
            lines.push(format!("{}Cast -> {}", pad, to.short()));
            push_expr(expr, level + 1, lines);
        }
    }
}

impl Expr {
    /// One-line summary of the node, e.g. `Binary(LAND:Bool, Var(a:I32), Var(b:I32))`.
    pub fn hint(&self) -> String {
        match self {
            Expr::Literal { value, ty } => format!("Literal({}:{})", value, ty.short()),
            Expr::Var(var) => format!("Var({}:{})", var.name, var.ty.short()),
            Expr::Binary { op, lhs, rhs, ty } => format!(
                "Binary({}:{}, {}, {})",
                op.name(),
                ty.short(),
                lhs.hint(),
                rhs.hint()
            ),
            Expr::Unary { op, operand, ty } => {
                format!("Unary({}:{}, {})", op.name(), ty.short(), operand.hint())
            }
            Expr::Cast { expr, to } => format!("Cast({} -> {})", expr.hint(), to.short()),
        }
    }
}

impl Stmt {
    /// One-line summary of the statement; nested blocks are summarized by length.
    pub fn hint(&self) -> String {
        match self {
            Stmt::VarDecl { var, init } => match init {
                Some(init) => format!(
                    "VarDecl({}:{} = {})",
                    var.name,
                    var.ty.short(),
                    init.hint()
                ),
                None => format!("VarDecl({}:{})", var.name, var.ty.short()),
            },
            Stmt::Assign { target, value } => format!(
                "Assign({}:{} = {})",
                target.name,
                target.ty.short(),
                value.hint()
            ),
            Stmt::Return(value) => format!("Return({})", value.hint()),
            Stmt::ExprStmt(expr) => format!("ExprStmt({})", expr.hint()),
            Stmt::If {
                cond, else_block, ..
            } => {
                if else_block.is_some() {
                    format!("If({}, else)", cond.hint())
                } else {
                    format!("If({})", cond.hint())
                }
            }
            Stmt::While { cond, body } => {
                format!("While({}, Block[{}])", cond.hint(), body.stmts.len())
            }
            Stmt::Block(block) => format!("Block[{}]", block.stmts.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_tree() {
        let i = Var::new("i", Type::i32());
        let function = Function::new(
            "main",
            vec![],
            Type::i32(),
            Block::new(vec![
                Stmt::While {
                    cond: Expr::binary(
                        BinOp::Lt,
                        i.clone().into(),
                        Expr::int(3, Type::i32()),
                        Type::bool(),
                    ),
                    body: Block::new(vec![Stmt::assign(
                        i.clone(),
                        Expr::binary(
                            BinOp::Add,
                            i.clone().into(),
                            Expr::int(1, Type::i32()),
                            Type::i32(),
                        ),
                    )]),
                },
                Stmt::Return(i.into()),
            ]),
        );

        let expected = "\
Function main() -> I32
  Block
    While
      Binary LT : Bool
        Var i : I32
        Literal 3 : I32
      Block
        Assign i:I32 =
          Binary ADD : I32
            Var i : I32
            Literal 1 : I32
    Return
      Var i : I32";
        assert_eq!(render_function(&function), expected);
    }

    #[test]
    fn hints_are_single_line() {
        let expr = Expr::binary(
            BinOp::LAnd,
            Expr::var("a", Type::i32()),
            Expr::var("b", Type::i32()),
            Type::bool(),
        );
        assert_eq!(expr.hint(), "Binary(LAND:Bool, Var(a:I32), Var(b:I32))");
        assert_eq!(Expr::float(1.0, Type::f64()).hint(), "Literal(1.0:F64)");
        let stmt = Stmt::assign(Var::new("x", Type::i32()), Expr::boolean(true));
        assert_eq!(stmt.hint(), "Assign(x:I32 = Literal(true:Bool))");
    }
}
