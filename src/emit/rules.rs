use std::collections::HashMap;
use std::fmt;

use super::{EmitError, EmitResult, Emitter};
use crate::ir::{Expr, Stmt, Type};

/// Renders one expression node.
pub type ExprRule = fn(&Emitter, &Expr) -> EmitResult<String>;
/// Renders one statement node at the given indent depth, one entry per output line.
pub type StmtRule = fn(&Emitter, &Stmt, usize) -> EmitResult<Vec<String>>;

/// Table key for expression nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprVariant {
    Literal,
    Var,
    Binary,
    Unary,
    Cast,
}

impl ExprVariant {
    pub const ALL: [ExprVariant; 5] = [
        ExprVariant::Literal,
        ExprVariant::Var,
        ExprVariant::Binary,
        ExprVariant::Unary,
        ExprVariant::Cast,
    ];

    pub fn of(expr: &Expr) -> Self {
        match expr {
            Expr::Literal { .. } => ExprVariant::Literal,
            Expr::Var(_) => ExprVariant::Var,
            Expr::Binary { .. } => ExprVariant::Binary,
            Expr::Unary { .. } => ExprVariant::Unary,
            Expr::Cast { .. } => ExprVariant::Cast,
        }
    }
}

impl fmt::Display for ExprVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Table key for statement nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StmtVariant {
    VarDecl,
    Assign,
    Return,
    ExprStmt,
    If,
    While,
    Block,
}

impl StmtVariant {
    pub const ALL: [StmtVariant; 7] = [
        StmtVariant::VarDecl,
        StmtVariant::Assign,
        StmtVariant::Return,
        StmtVariant::ExprStmt,
        StmtVariant::If,
        StmtVariant::While,
        StmtVariant::Block,
    ];

    pub fn of(stmt: &Stmt) -> Self {
        match stmt {
            Stmt::VarDecl { .. } => StmtVariant::VarDecl,
            Stmt::Assign { .. } => StmtVariant::Assign,
            Stmt::Return(_) => StmtVariant::Return,
            Stmt::ExprStmt(_) => StmtVariant::ExprStmt,
            Stmt::If { .. } => StmtVariant::If,
            Stmt::While { .. } => StmtVariant::While,
            Stmt::Block(_) => StmtVariant::Block,
        }
    }
}

impl fmt::Display for StmtVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Variant-keyed emission table. A rule set is built once and never
/// mutated in place; customization goes through [`RuleSet::overlay`].
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    expr_rules: HashMap<ExprVariant, ExprRule>,
    stmt_rules: HashMap<StmtVariant, StmtRule>,
    type_names: HashMap<Type, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expr(mut self, variant: ExprVariant, rule: ExprRule) -> Self {
        self.expr_rules.insert(variant, rule);
        self
    }

    pub fn with_stmt(mut self, variant: StmtVariant, rule: StmtRule) -> Self {
        self.stmt_rules.insert(variant, rule);
        self
    }

    pub fn with_type(mut self, ty: Type, name: impl Into<String>) -> Self {
        self.type_names.insert(ty, name.into());
        self
    }

    pub fn expr_rule(&self, expr: &Expr) -> EmitResult<ExprRule> {
        let variant = ExprVariant::of(expr);
        self.expr_rules
            .get(&variant)
            .copied()
            .ok_or(EmitError::NoExprRule(variant))
    }

    pub fn stmt_rule(&self, stmt: &Stmt) -> EmitResult<StmtRule> {
        let variant = StmtVariant::of(stmt);
        self.stmt_rules
            .get(&variant)
            .copied()
            .ok_or(EmitError::NoStmtRule(variant))
    }

    pub fn type_name(&self, ty: &Type) -> EmitResult<&str> {
        self.type_names
            .get(ty)
            .map(String::as_str)
            .ok_or_else(|| EmitError::UnsupportedType(ty.short()))
    }

    pub fn has_expr_rule(&self, variant: ExprVariant) -> bool {
        self.expr_rules.contains_key(&variant)
    }

    pub fn has_stmt_rule(&self, variant: StmtVariant) -> bool {
        self.stmt_rules.contains_key(&variant)
    }

    /// Merge `other` over `self`; entries in `other` win per variant.
    pub fn overlay(&self, other: &RuleSet) -> RuleSet {
        let mut merged = self.clone();
        merged
            .expr_rules
            .extend(other.expr_rules.iter().map(|(k, v)| (*k, *v)));
        merged
            .stmt_rules
            .extend(other.stmt_rules.iter().map(|(k, v)| (*k, *v)));
        merged.type_names.extend(
            other
                .type_names
                .iter()
                .map(|(ty, name)| (*ty, name.clone())),
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_placeholder(_: &Emitter, _: &Expr) -> EmitResult<String> {
        Ok("lit".to_string())
    }

    fn literal_override(_: &Emitter, _: &Expr) -> EmitResult<String> {
        Ok("LIT".to_string())
    }

    #[test]
    fn missing_variant_is_reported() {
        let rules = RuleSet::new().with_expr(ExprVariant::Literal, literal_placeholder);
        let err = rules
            .expr_rule(&Expr::var("x", Type::i32()))
            .expect_err("no Var rule");
        assert_eq!(err, EmitError::NoExprRule(ExprVariant::Var));
        assert!(rules.stmt_rule(&Stmt::Return(Expr::boolean(true))).is_err());
    }

    #[test]
    fn overlay_prefers_the_overlay_entry() {
        let base = RuleSet::new()
            .with_expr(ExprVariant::Literal, literal_placeholder)
            .with_type(Type::i32(), "i32");
        let top = RuleSet::new()
            .with_expr(ExprVariant::Literal, literal_override)
            .with_type(Type::u32(), "u32");
        let merged = base.overlay(&top);
        let emitter = Emitter::new(merged.clone());
        let rule = merged
            .expr_rule(&Expr::boolean(true))
            .expect("literal rule");
        assert_eq!(rule(&emitter, &Expr::boolean(true)).expect("emit"), "LIT");
        assert_eq!(merged.type_name(&Type::i32()).expect("i32"), "i32");
        assert_eq!(merged.type_name(&Type::u32()).expect("u32"), "u32");
        // the base table is untouched
        let rule = base.expr_rule(&Expr::boolean(true)).expect("literal rule");
        assert_eq!(rule(&emitter, &Expr::boolean(true)).expect("emit"), "lit");
    }
}
