//! Narrow view of a C syntax tree, as seen by the lowering engine.
//!
//! Lowering only needs what a clang cursor exposes: a kind tag, a spelling,
//! the declared type as text, ordered children, the raw tokens under the
//! node and source offsets. Any parser that can answer these questions can
//! be lowered, including hand-built trees in tests.

use std::fmt;

/// Half-open range of source offsets covered by a node or token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Extent {
    pub start: usize,
    pub end: usize,
}

impl Extent {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, other: &Extent) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One raw token under a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    pub spelling: String,
    pub extent: Extent,
}

impl SyntaxToken {
    pub fn new(spelling: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            spelling: spelling.into(),
            extent: Extent::new(start, end),
        }
    }
}

/// Cursor kinds the lowering engine knows about. Foreign parsers report
/// anything else as `Other`, which always fails to lower.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    FunctionDecl,
    ParmDecl,
    CompoundStmt,
    DeclStmt,
    VarDecl,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    NullStmt,
    BreakStmt,
    ContinueStmt,
    BinaryOperator,
    CompoundAssignOperator,
    UnaryOperator,
    ParenExpr,
    UnexposedExpr,
    CStyleCastExpr,
    CallExpr,
    IntegerLiteral,
    FloatingLiteral,
    BoolLiteral,
    DeclRefExpr,
    Other(String),
}

impl NodeKind {
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::BinaryOperator
                | NodeKind::CompoundAssignOperator
                | NodeKind::UnaryOperator
                | NodeKind::ParenExpr
                | NodeKind::UnexposedExpr
                | NodeKind::CStyleCastExpr
                | NodeKind::CallExpr
                | NodeKind::IntegerLiteral
                | NodeKind::FloatingLiteral
                | NodeKind::BoolLiteral
                | NodeKind::DeclRefExpr
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Other(name) => f.write_str(name),
            kind => fmt::Debug::fmt(kind, f),
        }
    }
}

pub trait SyntaxNode: Sized {
    fn kind(&self) -> NodeKind;

    /// Declared name for declarations and references, literal text for literals.
    fn spelling(&self) -> &str;

    /// C type of the node as written (`unsigned int`, `double`, ...). For
    /// function declarations this is the return type.
    fn type_text(&self) -> &str;

    fn children(&self) -> &[Self];

    /// Tokens covering the node's source span, in order.
    fn tokens(&self) -> &[SyntaxToken];

    fn extent(&self) -> Extent;
}
