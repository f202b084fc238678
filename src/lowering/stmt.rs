use super::expr::{binary_operator, binop_from_spelling, operands, single_child, unary_operator};
use super::syntax::{Extent, NodeKind, SyntaxNode};
use super::{lower_type, strip_wrappers, LowerError, LowerResult, Lowerer};
use crate::ir::{BinOp, Block, Expr, Stmt, Type, TypeKind, Var};

impl Lowerer {
    /// Lower one statement cursor. Desugaring may produce several IR
    /// statements (`for` loops, multi-declarator declarations) or none
    /// (empty statements).
    pub fn lower_stmt<N: SyntaxNode>(&self, node: &N) -> LowerResult<Vec<Stmt>> {
        match node.kind() {
            NodeKind::CompoundStmt => Ok(vec![Stmt::Block(self.lower_compound(node)?)]),
            NodeKind::DeclStmt => node
                .children()
                .iter()
                .map(|decl| self.lower_var_decl(decl))
                .collect(),
            NodeKind::ReturnStmt => match node.children() {
                [value] => Ok(vec![Stmt::Return(self.lower_expr(value)?)]),
                [] => Err(LowerError::malformed(
                    NodeKind::ReturnStmt,
                    "return without a value",
                )),
                children => Err(LowerError::malformed(
                    NodeKind::ReturnStmt,
                    format!("expected 1 child, found {}", children.len()),
                )),
            },
            NodeKind::IfStmt => {
                let (cond, then_node, else_node) = match node.children() {
                    [cond, then_node] => (cond, then_node, None),
                    [cond, then_node, else_node] => (cond, then_node, Some(else_node)),
                    children => {
                        return Err(LowerError::malformed(
                            NodeKind::IfStmt,
                            format!("expected 2 or 3 children, found {}", children.len()),
                        ))
                    }
                };
                let else_block = match else_node {
                    Some(else_node) => Some(self.lower_body(else_node)?),
                    None => None,
                };
                Ok(vec![Stmt::If {
                    cond: self.lower_expr(cond)?,
                    then_block: self.lower_body(then_node)?,
                    else_block,
                }])
            }
            NodeKind::WhileStmt => match node.children() {
                [cond, body] => Ok(vec![Stmt::While {
                    cond: self.lower_expr(cond)?,
                    body: self.lower_body(body)?,
                }]),
                children => Err(LowerError::malformed(
                    NodeKind::WhileStmt,
                    format!("expected 2 children, found {}", children.len()),
                )),
            },
            NodeKind::ForStmt => self.lower_for(node),
            NodeKind::NullStmt => Ok(Vec::new()),
            kind if kind.is_expression() => Ok(vec![self.lower_expr_stmt(node)?]),
            kind => Err(LowerError::unsupported(kind)),
        }
    }

    pub(crate) fn lower_compound<N: SyntaxNode>(&self, node: &N) -> LowerResult<Block> {
        let mut stmts = Vec::new();
        for child in node.children() {
            stmts.extend(self.lower_stmt(child)?);
        }
        Ok(Block::new(stmts))
    }

    /// Lower a statement that must become a block; single statements are wrapped.
    fn lower_body<N: SyntaxNode>(&self, node: &N) -> LowerResult<Block> {
        if node.kind() == NodeKind::CompoundStmt {
            return self.lower_compound(node);
        }
        Ok(Block::new(self.lower_stmt(node)?))
    }

    fn lower_var_decl<N: SyntaxNode>(&self, node: &N) -> LowerResult<Stmt> {
        if node.kind() != NodeKind::VarDecl {
            return Err(LowerError::unsupported(node.kind()));
        }
        let var = Var::new(node.spelling(), lower_type(node.type_text())?);
        let init = match node.children() {
            [] => None,
            [init] => Some(self.lower_expr(init)?),
            children => {
                return Err(LowerError::malformed(
                    NodeKind::VarDecl,
                    format!("expected at most 1 initializer, found {}", children.len()),
                ))
            }
        };
        Ok(Stmt::VarDecl { var, init })
    }

    /// `for (init; cond; inc) body` becomes
    /// `init; while (cond) { body; inc; }`, with a missing condition
    /// defaulting to `true`.
    fn lower_for<N: SyntaxNode>(&self, node: &N) -> LowerResult<Vec<Stmt>> {
        let parts = ForParts::split(node)?;
        let mut stmts = Vec::new();
        if let Some(init) = parts.init {
            stmts.extend(self.lower_stmt(init)?);
        }
        let cond = match parts.cond {
            Some(cond) => self.lower_expr(cond)?,
            None => Expr::boolean(true),
        };
        let mut body = self.lower_body(parts.body)?;
        if let Some(inc) = parts.inc {
            body.stmts.push(self.lower_expr_stmt(inc)?);
        }
        stmts.push(Stmt::While { cond, body });
        Ok(stmts)
    }

    /// Lower an expression used as a statement. Stores into plain variables
    /// become `Assign`; everything else is evaluated for effect.
    pub fn lower_expr_stmt<N: SyntaxNode>(&self, node: &N) -> LowerResult<Stmt> {
        let node = strip_wrappers(node);
        match node.kind() {
            NodeKind::BinaryOperator if binary_operator(node)? == "=" => {
                let (lhs, rhs) = operands(node)?;
                let target = self.store_target(lhs, "assignment")?;
                Ok(Stmt::assign(target, self.lower_expr(rhs)?))
            }
            NodeKind::CompoundAssignOperator => {
                let (lhs, rhs) = operands(node)?;
                let spelling = binary_operator(node)?;
                let op = binop_from_spelling(spelling.trim_end_matches('='))?;
                let target = self.store_target(lhs, "compound assignment")?;
                let value = Expr::binary(
                    op,
                    target.clone().into(),
                    self.lower_expr(rhs)?,
                    target.ty,
                );
                Ok(Stmt::assign(target, value))
            }
            NodeKind::UnaryOperator => match unary_operator(node)? {
                spelling @ ("++" | "--") => {
                    let target = self.store_target(single_child(node)?, "increment")?;
                    let op = if spelling == "++" {
                        BinOp::Add
                    } else {
                        BinOp::Sub
                    };
                    let value = Expr::binary(
                        op,
                        target.clone().into(),
                        unit_literal(target.ty)?,
                        target.ty,
                    );
                    Ok(Stmt::assign(target, value))
                }
                _ => Ok(Stmt::ExprStmt(self.lower_expr(node)?)),
            },
            _ => Ok(Stmt::ExprStmt(self.lower_expr(node)?)),
        }
    }
}

/// Literal `1` in the representation of `ty`.
fn unit_literal(ty: Type) -> LowerResult<Expr> {
    match ty.kind() {
        TypeKind::Int => Ok(Expr::int(1, ty)),
        TypeKind::Float => Ok(Expr::float(1.0, ty)),
        TypeKind::Bool | TypeKind::Void => Err(LowerError::malformed(
            NodeKind::UnaryOperator,
            format!("cannot increment a value of type {}", ty.short()),
        )),
    }
}

/// The optional header parts of a `for` cursor. Cursors list only the parts
/// that are present, so each child is placed by where it starts relative to
/// the two header semicolons and the closing parenthesis.
struct ForParts<'a, N> {
    init: Option<&'a N>,
    cond: Option<&'a N>,
    inc: Option<&'a N>,
    body: &'a N,
}

impl<'a, N: SyntaxNode> ForParts<'a, N> {
    fn split(node: &'a N) -> LowerResult<Self> {
        let children = node.children();
        let (body, header) = children
            .split_last()
            .ok_or_else(|| LowerError::malformed(NodeKind::ForStmt, "missing body"))?;

        let Some((first_semi, second_semi, close)) = header_markers(node) else {
            // No usable tokens: only a full header can be placed.
            return match header {
                [init, cond, inc] => Ok(Self {
                    init: Some(init),
                    cond: Some(cond),
                    inc: Some(inc),
                    body,
                }),
                [] => Ok(Self {
                    init: None,
                    cond: None,
                    inc: None,
                    body,
                }),
                _ => Err(LowerError::malformed(
                    NodeKind::ForStmt,
                    "cannot place header parts without tokens",
                )),
            };
        };

        let mut parts = Self {
            init: None,
            cond: None,
            inc: None,
            body,
        };
        for child in header {
            let start = child.extent().start;
            let slot = if start < first_semi.start {
                &mut parts.init
            } else if start >= first_semi.end && start < second_semi.start {
                &mut parts.cond
            } else if start >= second_semi.end && start < close.start {
                &mut parts.inc
            } else {
                return Err(LowerError::malformed(
                    NodeKind::ForStmt,
                    "header part outside the parentheses",
                ));
            };
            if slot.replace(child).is_some() {
                return Err(LowerError::malformed(
                    NodeKind::ForStmt,
                    "two children in one header slot",
                ));
            }
        }
        Ok(parts)
    }
}

/// Extents of the two top-level `;` and the closing `)` of a for header.
fn header_markers<N: SyntaxNode>(node: &N) -> Option<(Extent, Extent, Extent)> {
    let mut depth = 0usize;
    let mut semis = Vec::with_capacity(2);
    for token in node.tokens() {
        match token.spelling.as_str() {
            "(" => depth += 1,
            ")" => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return match semis.as_slice() {
                        [first, second] => Some((*first, *second, token.extent)),
                        _ => None,
                    };
                }
            }
            ";" if depth == 1 => semis.push(token.extent),
            _ => {}
        }
    }
    None
}
