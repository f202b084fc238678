//! Lowering of C syntax trees into IR.
//!
//! The engine works against the [`SyntaxNode`] capability interface only.
//! Sugar is expanded on the way down: `for` loops become a `while` with the
//! increment appended to the body, `x op= y` and `x++` become plain
//! assignments, and binary operators are recovered from the raw tokens
//! since cursors do not carry them.
//!
//! Any construct without an IR equivalent aborts the whole function.

mod expr;
mod stmt;
pub mod syntax;
pub mod types;

use thiserror::Error;
use tracing::debug;

use crate::ir::{Block, Function, Var};
pub use syntax::{Extent, NodeKind, SyntaxNode, SyntaxToken};
pub use types::lower_type;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("unsupported construct: {kind}")]
    Unsupported { kind: String },
    #[error("unsupported type '{0}'")]
    UnsupportedType(String),
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),
    #[error("could not recover the operator of {kind} '{text}'")]
    MissingOperator { kind: NodeKind, text: String },
    #[error("{construct} target must be a plain variable")]
    InvalidTarget { construct: &'static str },
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: NodeKind, reason: String },
    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),
}

impl LowerError {
    pub(crate) fn unsupported(kind: impl ToString) -> Self {
        LowerError::Unsupported {
            kind: kind.to_string(),
        }
    }

    pub(crate) fn malformed(kind: NodeKind, reason: impl Into<String>) -> Self {
        LowerError::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

pub type LowerResult<T> = Result<T, LowerError>;

/// Result typing for arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArithmeticTyping {
    /// Arithmetic always yields `i32`, whatever the operands are.
    #[default]
    FixedI32,
    /// Arithmetic yields the type of its left operand.
    FromOperands,
}

impl ArithmeticTyping {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fixed" => Some(ArithmeticTyping::FixedI32),
            "operands" => Some(ArithmeticTyping::FromOperands),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticTyping::FixedI32 => "fixed",
            ArithmeticTyping::FromOperands => "operands",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LowerOptions {
    pub arithmetic: ArithmeticTyping,
}

/// Lower one function definition with default options.
pub fn lower_function<N: SyntaxNode>(node: &N) -> LowerResult<Function> {
    Lowerer::default().lower_function(node)
}

/// True when `node` is a function declaration that carries a body.
pub fn is_definition<N: SyntaxNode>(node: &N) -> bool {
    node.kind() == NodeKind::FunctionDecl
        && node
            .children()
            .iter()
            .any(|child| child.kind() == NodeKind::CompoundStmt)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lowerer {
    options: LowerOptions,
}

impl Lowerer {
    pub fn new(options: LowerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LowerOptions {
        self.options
    }

    pub fn lower_function<N: SyntaxNode>(&self, node: &N) -> LowerResult<Function> {
        if node.kind() != NodeKind::FunctionDecl {
            return Err(LowerError::malformed(
                node.kind(),
                "expected a function declaration",
            ));
        }

        let return_type = lower_type(node.type_text())?;
        let mut params = Vec::new();
        let mut body: Option<Block> = None;
        for child in node.children() {
            match child.kind() {
                NodeKind::ParmDecl => {
                    params.push(Var::new(child.spelling(), lower_type(child.type_text())?));
                }
                NodeKind::CompoundStmt => body = Some(self.lower_compound(child)?),
                _ => {}
            }
        }
        let body = body.ok_or_else(|| {
            LowerError::malformed(NodeKind::FunctionDecl, "declaration has no body")
        })?;

        debug!(
            function = node.spelling(),
            statements = body.stmts.len(),
            "lowered function"
        );
        Ok(Function::new(node.spelling(), params, return_type, body))
    }
}

/// Skip through parenthesized and implicit wrapper nodes.
pub(crate) fn strip_wrappers<N: SyntaxNode>(node: &N) -> &N {
    let mut current = node;
    while matches!(
        current.kind(),
        NodeKind::ParenExpr | NodeKind::UnexposedExpr
    ) && current.children().len() == 1
    {
        current = &current.children()[0];
    }
    current
}
