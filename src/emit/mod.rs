//! Table-driven rendering of IR into target syntax.
//!
//! The [`Emitter`] walks a function and, for every node, looks up the rule
//! registered for that node's variant in its [`RuleSet`]. Target-specific
//! text lives entirely in the rules; the walk itself never changes.

pub mod carbon;
pub mod rules;

use thiserror::Error;
use tracing::debug;

use crate::ir::{Block, Expr, Function, Stmt, Type};
pub use rules::{ExprRule, ExprVariant, RuleSet, StmtRule, StmtVariant};

/// One level of indentation in emitted text.
pub const INDENT_UNIT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("no rule for expression variant {0}")]
    NoExprRule(ExprVariant),
    #[error("no rule for statement variant {0}")]
    NoStmtRule(StmtVariant),
    #[error("literal not supported by target: {0}")]
    UnsupportedLiteral(String),
    #[error("type not supported by target: {0}")]
    UnsupportedType(String),
}

pub type EmitResult<T> = Result<T, EmitError>;

/// Leading whitespace for a line at `indent` levels.
pub fn pad(indent: usize) -> String {
    INDENT_UNIT.repeat(indent)
}

#[derive(Debug, Clone)]
pub struct Emitter {
    rules: RuleSet,
}

impl Emitter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Emitter using the default Carbon rules.
    pub fn carbon() -> Self {
        Self::new(carbon::rules())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Render a whole function: header, body at depth 1, closing brace.
    /// Statements are emitted in their original order.
    pub fn emit_function(&self, function: &Function) -> EmitResult<String> {
        debug!(function = %function.name, "emitting");
        let mut params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            params.push(format!("{}: {}", param.name, self.emit_type(&param.ty)?));
        }
        let mut lines = vec![format!(
            "fn {}({}) -> {} {{",
            function.name,
            params.join(", "),
            self.emit_type(&function.return_type)?
        )];
        lines.extend(self.emit_block(&function.body, 1)?);
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }

    pub fn emit_block(&self, block: &Block, indent: usize) -> EmitResult<Vec<String>> {
        let mut lines = Vec::new();
        for stmt in &block.stmts {
            lines.extend(self.emit_stmt(stmt, indent)?);
        }
        Ok(lines)
    }

    pub fn emit_stmt(&self, stmt: &Stmt, indent: usize) -> EmitResult<Vec<String>> {
        let rule = self.rules.stmt_rule(stmt)?;
        rule(self, stmt, indent)
    }

    pub fn emit_expr(&self, expr: &Expr) -> EmitResult<String> {
        let rule = self.rules.expr_rule(expr)?;
        rule(self, expr)
    }

    pub fn emit_type(&self, ty: &Type) -> EmitResult<String> {
        self.rules.type_name(ty).map(str::to_string)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::carbon()
    }
}
