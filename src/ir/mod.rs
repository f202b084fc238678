//! Typed intermediate representation
//!
//! The IR is a small, owned tree of expressions and statements. It is
//! independent of both the C input and the Carbon output: lowering builds
//! it once, and the checker and emitter only read it.

pub mod printer;
pub mod types;

pub use types::{Signedness, Type, TypeKind};

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    LAnd,
    LOr,
}

impl BinOp {
    /// Upper-case mnemonic used by IR dumps (`ADD`, `LAND`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Lt => "LT",
            BinOp::Le => "LE",
            BinOp::Gt => "GT",
            BinOp::Ge => "GE",
            BinOp::Eq => "EQ",
            BinOp::Ne => "NE",
            BinOp::LAnd => "LAND",
            BinOp::LOr => "LOR",
        }
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::LAnd | BinOp::LOr)
    }

    /// Whether the operator always yields `bool`.
    pub fn yields_bool(&self) -> bool {
        self.is_relational() || self.is_equality() || self.is_logical()
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
}

impl UnOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnOp::Not => "NOT",
        }
    }
}

/// Value carried by a literal. The representation is checked against the
/// literal's declared type by the type checker; nothing converts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// A named, typed variable reference. Uses of the same name are not
/// cross-checked; keeping them consistent is up to whoever builds the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub ty: Type,
}

impl Var {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant value with its declared type
    Literal { value: LiteralValue, ty: Type },
    /// Variable read
    Var(Var),
    /// Binary operation with its declared result type
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        ty: Type,
    },
    /// Unary operation with its declared result type
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        ty: Type,
    },
    /// Explicit conversion; the node's type is always `to`
    Cast { expr: Box<Expr>, to: Type },
}

impl Expr {
    pub fn int(value: i64, ty: Type) -> Self {
        Expr::Literal {
            value: LiteralValue::Int(value),
            ty,
        }
    }

    pub fn float(value: f64, ty: Type) -> Self {
        Expr::Literal {
            value: LiteralValue::Float(value),
            ty,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Literal {
            value: LiteralValue::Bool(value),
            ty: Type::Bool,
        }
    }

    pub fn var(name: impl Into<String>, ty: Type) -> Self {
        Expr::Var(Var::new(name, ty))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr, ty: Type) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            ty,
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Unary {
            op: UnOp::Not,
            operand: Box::new(operand),
            ty: Type::Bool,
        }
    }

    pub fn cast(expr: Expr, to: Type) -> Self {
        Expr::Cast {
            expr: Box::new(expr),
            to,
        }
    }

    /// Declared type of this node.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Literal { ty, .. } => *ty,
            Expr::Var(var) => var.ty,
            Expr::Binary { ty, .. } => *ty,
            Expr::Unary { ty, .. } => *ty,
            Expr::Cast { to, .. } => *to,
        }
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::Var(var)
    }
}

/// Ordered statement list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration with optional initializer
    VarDecl { var: Var, init: Option<Expr> },
    /// Store into a plain variable
    Assign { target: Var, value: Expr },
    /// Return a value from the enclosing function
    Return(Expr),
    /// Expression evaluated for effect
    ExprStmt(Expr),
    /// Conditional with optional else branch
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// Pre-tested loop
    While { cond: Expr, body: Block },
    /// Nested block
    Block(Block),
}

impl Stmt {
    pub fn assign(target: Var, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }
}

/// A function definition
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    pub params: Vec<Var>,
    /// Declared return type
    pub return_type: Type,
    /// Function body
    pub body: Block,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<Var>, return_type: Type, body: Block) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            body,
        }
    }
}
