//! Structural type checking over a lowered function.
//!
//! Every node is verified bottom-up against its declared type. Types must
//! match exactly; there is no promotion and no symbol table. The first
//! violation aborts the check.

use tracing::debug;

use crate::errors::Diagnostic;
use crate::ir::{BinOp, Block, Expr, Function, LiteralValue, Stmt, Type, TypeKind, UnOp};

pub type CheckResult<T> = Result<T, Diagnostic>;

/// Check a whole function. Parameters are trusted as declared.
pub fn check_function(function: &Function) -> CheckResult<()> {
    debug!(function = %function.name, "type checking");
    TypeChecker::new(function.return_type).check_block(&function.body)
}

/// Checker state: the return type of the function in scope.
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker {
    return_type: Type,
}

impl TypeChecker {
    pub fn new(return_type: Type) -> Self {
        Self { return_type }
    }

    pub fn check_block(&self, block: &Block) -> CheckResult<()> {
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn check_stmt(&self, stmt: &Stmt) -> CheckResult<()> {
        match stmt {
            Stmt::VarDecl { var, init } => {
                if let Some(init) = init {
                    let init_ty = self.check_expr(init)?;
                    if init_ty != var.ty {
                        return Err(Diagnostic::invalid_ir(
                            format!(
                                "VarDecl init type mismatch: var {}:{} but init is {}",
                                var.name,
                                var.ty.short(),
                                init_ty.short()
                            ),
                            stmt.hint(),
                        ));
                    }
                }
                Ok(())
            }
            Stmt::Assign { target, value } => {
                let value_ty = self.check_expr(value)?;
                if value_ty != target.ty {
                    return Err(Diagnostic::invalid_ir(
                        format!(
                            "Assign type mismatch: target {}:{} but value is {}",
                            target.name,
                            target.ty.short(),
                            value_ty.short()
                        ),
                        stmt.hint(),
                    ));
                }
                Ok(())
            }
            Stmt::Return(value) => {
                let value_ty = self.check_expr(value)?;
                if value_ty != self.return_type {
                    return Err(Diagnostic::invalid_ir(
                        format!(
                            "Return type mismatch: function returns {} but returned expr is {}",
                            self.return_type.short(),
                            value_ty.short()
                        ),
                        stmt.hint(),
                    ));
                }
                Ok(())
            }
            Stmt::ExprStmt(expr) => self.check_expr(expr).map(|_| ()),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.check_condition("If", cond)?;
                self.check_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.check_condition("While", cond)?;
                self.check_block(body)
            }
            Stmt::Block(block) => self.check_block(block),
        }
    }

    fn check_condition(&self, construct: &str, cond: &Expr) -> CheckResult<()> {
        let cond_ty = self.check_expr(cond)?;
        if !cond_ty.is_bool() {
            return Err(Diagnostic::invalid_ir(
                format!(
                    "{} condition must be Bool, got {}",
                    construct,
                    cond_ty.short()
                ),
                cond.hint(),
            ));
        }
        Ok(())
    }

    /// Verify `expr` and return its (declared) type.
    pub fn check_expr(&self, expr: &Expr) -> CheckResult<Type> {
        match expr {
            Expr::Literal { value, ty } => {
                check_literal(value, ty, expr)?;
                Ok(*ty)
            }
            Expr::Var(var) => Ok(var.ty),
            // A cast's type is its target by construction; only the source is checked.
            Expr::Cast { expr: inner, to } => {
                let inner_ty = self.check_expr(inner)?;
                if !matches!(
                    inner_ty.kind(),
                    TypeKind::Int | TypeKind::Float | TypeKind::Bool
                ) {
                    return Err(Diagnostic::invalid_ir(
                        format!(
                            "Cast from unsupported type {} to {}",
                            inner_ty.short(),
                            to.short()
                        ),
                        expr.hint(),
                    ));
                }
                Ok(*to)
            }
            Expr::Unary { op, operand, ty } => {
                let operand_ty = self.check_expr(operand)?;
                match op {
                    UnOp::Not => {
                        if !operand_ty.is_bool() || !ty.is_bool() {
                            return Err(Diagnostic::invalid_ir(
                                format!(
                                    "Unary NOT expects Bool -> Bool, got {} -> {}",
                                    operand_ty.short(),
                                    ty.short()
                                ),
                                expr.hint(),
                            ));
                        }
                    }
                }
                Ok(*ty)
            }
            Expr::Binary { op, lhs, rhs, ty } => {
                let lhs_ty = self.check_expr(lhs)?;
                let rhs_ty = self.check_expr(rhs)?;
                check_binary(*op, lhs_ty, rhs_ty, *ty, expr)?;
                Ok(*ty)
            }
        }
    }
}

fn check_literal(value: &LiteralValue, ty: &Type, expr: &Expr) -> CheckResult<()> {
    let ok = match ty.kind() {
        TypeKind::Bool => matches!(value, LiteralValue::Bool(_)),
        TypeKind::Int => matches!(value, LiteralValue::Int(_)),
        TypeKind::Float => matches!(value, LiteralValue::Float(_)),
        TypeKind::Void => {
            return Err(Diagnostic::invalid_ir(
                "Literal cannot have type Void",
                expr.hint(),
            ))
        }
    };
    if ok {
        return Ok(());
    }
    Err(Diagnostic::invalid_ir(
        format!(
            "{} literal expects {} value, got {}",
            ty.short(),
            expected_value_shape(ty),
            value_shape(value)
        ),
        expr.hint(),
    ))
}

fn expected_value_shape(ty: &Type) -> &'static str {
    match ty.kind() {
        TypeKind::Bool => "a boolean",
        TypeKind::Int => "an integer",
        TypeKind::Float => "a float",
        TypeKind::Void => "no",
    }
}

fn value_shape(value: &LiteralValue) -> &'static str {
    match value {
        LiteralValue::Int(_) => "an integer",
        LiteralValue::Float(_) => "a float",
        LiteralValue::Bool(_) => "a boolean",
    }
}

fn check_binary(op: BinOp, lhs: Type, rhs: Type, result: Type, expr: &Expr) -> CheckResult<()> {
    let (ok, rule) = match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => (
            lhs.is_numeric() && lhs == rhs && result == lhs,
            "Arithmetic expects same numeric types",
        ),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => (
            lhs.is_numeric() && lhs == rhs && result.is_bool(),
            "Comparison expects same numeric types -> Bool",
        ),
        BinOp::Eq | BinOp::Ne => (
            lhs == rhs
                && result.is_bool()
                && matches!(lhs.kind(), TypeKind::Int | TypeKind::Float | TypeKind::Bool),
            "Equality expects same (int/float/bool) types -> Bool",
        ),
        BinOp::LAnd | BinOp::LOr => (
            lhs.is_bool() && rhs.is_bool() && result.is_bool(),
            "Logical expects Bool Bool -> Bool",
        ),
    };
    if ok {
        return Ok(());
    }
    Err(Diagnostic::invalid_ir(
        format!(
            "{}: lhs={} rhs={} result={}",
            rule,
            lhs.short(),
            rhs.short(),
            result.short()
        ),
        expr.hint(),
    ))
}
