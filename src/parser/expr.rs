use crate::lexer::token::TokenKind;
use crate::lowering::syntax::{NodeKind, SyntaxNode};

use super::ast::Node;
use super::{ParseError, Parser};

/// Binding strength of binary operators, loosest first.
fn binary_precedence(kind: &TokenKind) -> Option<usize> {
    let level = match kind {
        TokenKind::PipePipe => 0,
        TokenKind::AmpAmp => 1,
        TokenKind::Pipe => 2,
        TokenKind::Caret => 3,
        TokenKind::Amp => 4,
        TokenKind::EqualEqual | TokenKind::BangEqual => 5,
        TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => 6,
        TokenKind::LessLess | TokenKind::GreaterGreater => 7,
        TokenKind::Plus | TokenKind::Minus => 8,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 9,
        _ => return None,
    };
    Some(level)
}

fn is_compound_assign(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PlusEqual
            | TokenKind::MinusEqual
            | TokenKind::StarEqual
            | TokenKind::SlashEqual
            | TokenKind::PercentEqual
    )
}

/// C type of a binary expression, following the usual arithmetic
/// conversions over the scalar subset.
fn binary_type(op: &TokenKind, lhs: &str, rhs: &str) -> String {
    if binary_precedence(op).map_or(false, |level| level <= 1 || level == 5 || level == 6) {
        return "int".to_string();
    }
    for wider in ["double", "float", "unsigned int"] {
        if lhs == wider || rhs == wider {
            return wider.to_string();
        }
    }
    "int".to_string()
}

impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Node, ParseError> {
        self.assignment()
    }

    /// Assignment is right-associative; the target is not validated here.
    pub(crate) fn assignment(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        let lhs = self.binary(0)?;

        let kind = if self.check_kind(&TokenKind::Equal) {
            NodeKind::BinaryOperator
        } else if is_compound_assign(self.peek_kind()) {
            NodeKind::CompoundAssignOperator
        } else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.assignment()?;
        let type_text = lhs.type_text().to_string();
        Ok(self.node(kind, "", type_text, vec![lhs, rhs], start))
    }

    fn binary(&mut self, min_level: usize) -> Result<Node, ParseError> {
        let start = self.current;
        let mut lhs = self.unary()?;

        while let Some(level) = binary_precedence(self.peek_kind()) {
            if level < min_level {
                break;
            }
            let op = self.advance().kind.clone();
            let rhs = self.binary(level + 1)?;
            let type_text = binary_type(&op, lhs.type_text(), rhs.type_text());
            lhs = self.node(NodeKind::BinaryOperator, "", type_text, vec![lhs, rhs], start);
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        match self.peek_kind() {
            TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => {
                let is_not = self.advance().kind == TokenKind::Bang;
                let operand = self.unary()?;
                let type_text = if is_not {
                    "int".to_string()
                } else {
                    operand.type_text().to_string()
                };
                Ok(self.node(NodeKind::UnaryOperator, "", type_text, vec![operand], start))
            }
            TokenKind::LeftParen
                if self
                    .peek_kind_at(1)
                    .map_or(false, TokenKind::is_type_specifier) =>
            {
                self.advance();
                let mut words = Vec::new();
                while self.peek_kind().is_type_specifier() {
                    words.push(self.advance().lexeme.clone());
                }
                self.consume_symbol(TokenKind::RightParen, "expected ')' after cast type")?;
                let operand = self.unary()?;
                Ok(self.node(
                    NodeKind::CStyleCastExpr,
                    "",
                    words.join(" "),
                    vec![operand],
                    start,
                ))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        let mut expr = self.primary()?;
        while matches!(self.peek_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            self.advance();
            let type_text = expr.type_text().to_string();
            expr = self.node(NodeKind::UnaryOperator, "", type_text, vec![expr], start);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        match self.peek_kind().clone() {
            TokenKind::IntLiteral { unsigned, .. } => {
                let lexeme = self.advance().lexeme.clone();
                let type_text = if unsigned { "unsigned int" } else { "int" };
                Ok(self.node(NodeKind::IntegerLiteral, lexeme, type_text, Vec::new(), start))
            }
            TokenKind::FloatLiteral { single, .. } => {
                let lexeme = self.advance().lexeme.clone();
                let type_text = if single { "float" } else { "double" };
                Ok(self.node(NodeKind::FloatingLiteral, lexeme, type_text, Vec::new(), start))
            }
            TokenKind::True | TokenKind::False => {
                let lexeme = self.advance().lexeme.clone();
                Ok(self.node(NodeKind::BoolLiteral, lexeme, "bool", Vec::new(), start))
            }
            TokenKind::Identifier(name) => {
                if self.peek_kind_at(1) == Some(&TokenKind::LeftParen) {
                    return self.call(name);
                }
                let Some(type_text) = self.declared_type(&name).map(str::to_string) else {
                    return Err(ParseError::new(
                        format!("use of undeclared identifier '{}'", name),
                        self.peek(),
                    ));
                };
                self.advance();
                Ok(self.node(NodeKind::DeclRefExpr, name, type_text, Vec::new(), start))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume_symbol(TokenKind::RightParen, "expected ')' after expression")?;
                let type_text = inner.type_text().to_string();
                Ok(self.node(NodeKind::ParenExpr, "", type_text, vec![inner], start))
            }
            _ => Err(ParseError::new("expected expression", self.peek())),
        }
    }

    /// Calls are parsed so that lowering can reject them by kind.
    fn call(&mut self, name: String) -> Result<Node, ParseError> {
        let start = self.current;
        self.advance();
        self.advance();
        let mut args = Vec::new();
        if !self.check_kind(&TokenKind::RightParen) {
            loop {
                args.push(self.assignment()?);
                if !self.matches_symbol(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume_symbol(TokenKind::RightParen, "expected ')' after arguments")?;
        Ok(self.node(NodeKind::CallExpr, name, "int", args, start))
    }
}
