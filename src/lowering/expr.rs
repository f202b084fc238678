use super::{lower_type, strip_wrappers, ArithmeticTyping, LowerError, LowerResult, Lowerer};
use super::syntax::{NodeKind, SyntaxNode, SyntaxToken};
use crate::ir::{BinOp, Expr, LiteralValue, Signedness, Type, Var};

/// Every spelling a binary or compound-assignment cursor can carry.
const BINARY_SPELLINGS: &[&str] = &[
    "+", "-", "*", "/", "%", "<", "<=", ">", ">=", "==", "!=", "&&", "||", "&", "|", "^", "<<",
    ">>", "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

const UNARY_SPELLINGS: &[&str] = &["!", "-", "+", "~", "++", "--", "&", "*"];

impl Lowerer {
    pub fn lower_expr<N: SyntaxNode>(&self, node: &N) -> LowerResult<Expr> {
        match node.kind() {
            NodeKind::ParenExpr | NodeKind::UnexposedExpr => {
                self.lower_expr(single_child(node)?)
            }
            NodeKind::IntegerLiteral => {
                let text = literal_text(node);
                let value = parse_int_literal(text)
                    .ok_or_else(|| LowerError::InvalidLiteral(text.to_string()))?;
                int_literal(value, lower_type(node.type_text())?, text)
            }
            NodeKind::FloatingLiteral => {
                let text = literal_text(node);
                let value = parse_float_literal(text)
                    .ok_or_else(|| LowerError::InvalidLiteral(text.to_string()))?;
                Ok(Expr::float(value, lower_type(node.type_text())?))
            }
            NodeKind::BoolLiteral => match literal_text(node) {
                "true" => Ok(Expr::boolean(true)),
                "false" => Ok(Expr::boolean(false)),
                other => Err(LowerError::InvalidLiteral(other.to_string())),
            },
            NodeKind::DeclRefExpr => Ok(Expr::var(
                node.spelling(),
                lower_type(node.type_text())?,
            )),
            NodeKind::CStyleCastExpr => {
                let operand = node.children().last().ok_or_else(|| {
                    LowerError::malformed(NodeKind::CStyleCastExpr, "cast without operand")
                })?;
                Ok(Expr::cast(
                    self.lower_expr(operand)?,
                    lower_type(node.type_text())?,
                ))
            }
            NodeKind::UnaryOperator => self.lower_unary(node),
            NodeKind::BinaryOperator => {
                let (lhs, rhs) = operands(node)?;
                let spelling = binary_operator(node)?;
                if spelling == "=" {
                    return Err(LowerError::unsupported("assignment used as a value"));
                }
                let op = binop_from_spelling(spelling)?;
                let lhs = self.lower_expr(lhs)?;
                let rhs = self.lower_expr(rhs)?;
                let ty = self.result_type(op, &lhs);
                Ok(Expr::binary(op, lhs, rhs, ty))
            }
            NodeKind::CompoundAssignOperator => Err(LowerError::unsupported(
                "compound assignment used as a value",
            )),
            kind => Err(LowerError::unsupported(kind)),
        }
    }

    fn lower_unary<N: SyntaxNode>(&self, node: &N) -> LowerResult<Expr> {
        let operand = single_child(node)?;
        match unary_operator(node)? {
            "!" => Ok(Expr::not(self.lower_expr(operand)?)),
            "+" => self.lower_expr(operand),
            "-" => {
                // Negate integer literals before the range check so the
                // most negative value of a type is accepted.
                let inner = strip_wrappers(operand);
                if inner.kind() == NodeKind::IntegerLiteral {
                    let text = literal_text(inner);
                    let value = parse_int_literal(text)
                        .ok_or_else(|| LowerError::InvalidLiteral(text.to_string()))?;
                    let ty = lower_type(inner.type_text())?;
                    return int_literal(-value, ty, &format!("-{}", text));
                }
                negate_literal(self.lower_expr(operand)?)
            }
            "++" | "--" => Err(LowerError::unsupported(
                "increment/decrement used as a value",
            )),
            other => Err(LowerError::UnsupportedOperator(other.to_string())),
        }
    }

    /// Declared result type of a lowered binary node.
    pub(crate) fn result_type(&self, op: BinOp, lhs: &Expr) -> Type {
        if op.yields_bool() {
            return Type::bool();
        }
        match self.options.arithmetic {
            ArithmeticTyping::FixedI32 => Type::i32(),
            ArithmeticTyping::FromOperands => lhs.ty(),
        }
    }

    /// Resolve the variable a store writes to. Only plain variables qualify.
    pub(crate) fn store_target<N: SyntaxNode>(
        &self,
        node: &N,
        construct: &'static str,
    ) -> LowerResult<Var> {
        let node = strip_wrappers(node);
        if node.kind() != NodeKind::DeclRefExpr {
            return Err(LowerError::InvalidTarget { construct });
        }
        Ok(Var::new(node.spelling(), lower_type(node.type_text())?))
    }
}

fn negate_literal(expr: Expr) -> LowerResult<Expr> {
    match expr {
        Expr::Literal {
            value: LiteralValue::Int(v),
            ty,
        } => {
            let negated = v
                .checked_neg()
                .ok_or_else(|| LowerError::InvalidLiteral(format!("-({})", v)))?;
            int_literal(negated, ty, &format!("-({})", v))
        }
        Expr::Literal {
            value: LiteralValue::Float(v),
            ty,
        } => Ok(Expr::float(-v, ty)),
        _ => Err(LowerError::unsupported("negation of a non-literal")),
    }
}

/// Integer literal of type `ty`, rejected when `value` does not fit the
/// type's width and signedness.
fn int_literal(value: i64, ty: Type, text: &str) -> LowerResult<Expr> {
    if let Type::Int { bits, signedness } = ty {
        let bits = u32::from(bits).clamp(1, 64);
        let (min, max) = match signedness {
            Signedness::Signed => (-(1i128 << (bits - 1)), (1i128 << (bits - 1)) - 1),
            Signedness::Unsigned => (0, (1i128 << bits) - 1),
        };
        if !(min..=max).contains(&i128::from(value)) {
            return Err(LowerError::InvalidLiteral(text.to_string()));
        }
    }
    Ok(Expr::int(value, ty))
}

pub(crate) fn single_child<N: SyntaxNode>(node: &N) -> LowerResult<&N> {
    match node.children() {
        [child] => Ok(child),
        children => Err(LowerError::malformed(
            node.kind(),
            format!("expected 1 child, found {}", children.len()),
        )),
    }
}

pub(crate) fn operands<N: SyntaxNode>(node: &N) -> LowerResult<(&N, &N)> {
    match node.children() {
        [lhs, rhs] => Ok((lhs, rhs)),
        children => Err(LowerError::malformed(
            node.kind(),
            format!("expected 2 operands, found {}", children.len()),
        )),
    }
}

fn literal_text<N: SyntaxNode>(node: &N) -> &str {
    match node.tokens().first() {
        Some(token) => &token.spelling,
        None => node.spelling(),
    }
}

/// Recover the operator of a binary or compound-assignment cursor.
///
/// The operator is the recognized token lying strictly between the two
/// operands. When none does, the last recognized token in the node's span
/// is used instead.
pub(crate) fn binary_operator<N: SyntaxNode>(node: &N) -> LowerResult<&str> {
    let (lhs, rhs) = operands(node)?;
    let (gap_start, gap_end) = (lhs.extent().end, rhs.extent().start);
    let between = node.tokens().iter().find(|token| {
        token.extent.start >= gap_start
            && token.extent.end <= gap_end
            && BINARY_SPELLINGS.contains(&token.spelling.as_str())
    });
    let found = between.or_else(|| {
        node.tokens()
            .iter()
            .rev()
            .find(|token| BINARY_SPELLINGS.contains(&token.spelling.as_str()))
    });
    found
        .map(|token| token.spelling.as_str())
        .ok_or_else(|| missing_operator(node))
}

/// Recover the operator of a unary cursor: the first recognized token
/// outside the operand's span.
pub(crate) fn unary_operator<N: SyntaxNode>(node: &N) -> LowerResult<&str> {
    let operand = single_child(node)?.extent();
    node.tokens()
        .iter()
        .filter(|token| !operand.contains(&token.extent))
        .find(|token| UNARY_SPELLINGS.contains(&token.spelling.as_str()))
        .map(|token| token.spelling.as_str())
        .ok_or_else(|| missing_operator(node))
}

fn missing_operator<N: SyntaxNode>(node: &N) -> LowerError {
    LowerError::MissingOperator {
        kind: node.kind(),
        text: node
            .tokens()
            .iter()
            .map(|token: &SyntaxToken| token.spelling.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

pub(crate) fn binop_from_spelling(spelling: &str) -> LowerResult<BinOp> {
    let op = match spelling {
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        "<" => BinOp::Lt,
        "<=" => BinOp::Le,
        ">" => BinOp::Gt,
        ">=" => BinOp::Ge,
        "==" => BinOp::Eq,
        "!=" => BinOp::Ne,
        "&&" => BinOp::LAnd,
        "||" => BinOp::LOr,
        other => return Err(LowerError::UnsupportedOperator(other.to_string())),
    };
    Ok(op)
}

pub(crate) fn parse_int_literal(text: &str) -> Option<i64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        return i64::from_str_radix(hex, 16).ok();
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return i64::from_str_radix(&digits[1..], 8).ok();
    }
    digits.parse().ok()
}

pub(crate) fn parse_float_literal(text: &str) -> Option<f64> {
    text.trim_end_matches(['f', 'F', 'l', 'L'])
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
