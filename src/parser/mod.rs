pub mod ast;
mod expr;

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::lexer::token::{Token, TokenKind};
use crate::lowering::syntax::{NodeKind, SyntaxToken};
use ast::Node;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, token: &Token) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
        }
    }
}

/// Parse a token stream into a `TranslationUnit` node.
pub fn parse(tokens: Vec<Token>) -> Result<Node, ParseError> {
    Parser::new(tokens).parse_translation_unit()
}

pub struct Parser {
    tokens: Vec<Token>,
    stream: Rc<[SyntaxToken]>,
    current: usize,
    /// Types of the parameters and locals declared so far in the current
    /// function. Flat: there is no block scoping.
    declared: HashMap<String, String>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| &token.kind) != Some(&TokenKind::Eof) {
            let (line, column, end) = tokens
                .last()
                .map(|token| (token.line, token.column + 1, token.end))
                .unwrap_or((1, 1, 0));
            tokens.push(Token::new(TokenKind::Eof, String::new(), line, column, end, end));
        }
        let stream = tokens
            .iter()
            .filter(|token| token.kind != TokenKind::Eof)
            .map(|token| SyntaxToken::new(token.lexeme.clone(), token.start, token.end))
            .collect();
        Self {
            tokens,
            stream,
            current: 0,
            declared: HashMap::new(),
        }
    }

    pub fn parse_translation_unit(&mut self) -> Result<Node, ParseError> {
        let mut functions = Vec::new();
        while !self.is_at_end() {
            functions.push(self.function_declaration()?);
        }
        Ok(self.node(NodeKind::TranslationUnit, "", "", functions, 0))
    }

    fn function_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        let return_type = self.type_specifier("expected a return type")?;
        let name = self.consume_identifier("expected function name")?;
        self.consume_symbol(
            TokenKind::LeftParen,
            "expected '(' after function name; only function declarations are supported",
        )?;

        self.declared.clear();
        let mut children = Vec::new();
        if self.check_kind(&TokenKind::Void)
            && self.peek_kind_at(1) == Some(&TokenKind::RightParen)
        {
            self.advance();
        } else if !self.check_kind(&TokenKind::RightParen) {
            loop {
                let param_start = self.current;
                let ty = self.type_specifier("expected parameter type")?;
                let param = self.consume_identifier("expected parameter name")?;
                self.declared.insert(param.clone(), ty.clone());
                children.push(self.node(NodeKind::ParmDecl, param, ty, Vec::new(), param_start));
                if !self.matches_symbol(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume_symbol(TokenKind::RightParen, "expected ')' after parameter list")?;

        if !self.matches_symbol(TokenKind::Semicolon) {
            if !self.check_kind(&TokenKind::LeftBrace) {
                return Err(ParseError::new(
                    "expected '{' or ';' after function declarator",
                    self.peek(),
                ));
            }
            children.push(self.compound_statement()?);
        }

        Ok(self.node(NodeKind::FunctionDecl, name, return_type, children, start))
    }

    fn statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        match self.peek_kind().clone() {
            TokenKind::LeftBrace => self.compound_statement(),
            kind if kind.is_type_specifier() => self.declaration(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Do => Err(ParseError::new(
                "do-while loops are not supported",
                self.peek(),
            )),
            TokenKind::Return => {
                self.advance();
                let mut children = Vec::new();
                if !self.check_kind(&TokenKind::Semicolon) {
                    children.push(self.expression()?);
                }
                self.consume_symbol(TokenKind::Semicolon, "expected ';' after return")?;
                Ok(self.node(NodeKind::ReturnStmt, "", "", children, start))
            }
            TokenKind::Break => {
                self.advance();
                self.consume_symbol(TokenKind::Semicolon, "expected ';' after break")?;
                Ok(self.node(NodeKind::BreakStmt, "", "", Vec::new(), start))
            }
            TokenKind::Continue => {
                self.advance();
                self.consume_symbol(TokenKind::Semicolon, "expected ';' after continue")?;
                Ok(self.node(NodeKind::ContinueStmt, "", "", Vec::new(), start))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(self.node(NodeKind::NullStmt, "", "", Vec::new(), start))
            }
            _ => {
                let expr = self.expression()?;
                self.consume_symbol(TokenKind::Semicolon, "expected ';' after expression")?;
                Ok(expr)
            }
        }
    }

    fn compound_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        self.consume_symbol(TokenKind::LeftBrace, "expected '{'")?;
        let mut body = Vec::new();
        while !self.check_kind(&TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }
        self.consume_symbol(TokenKind::RightBrace, "expected '}' to close block")?;
        Ok(self.node(NodeKind::CompoundStmt, "", "", body, start))
    }

    /// `type name [= init] {, name [= init]} ;`
    fn declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        let ty = self.type_specifier("expected type")?;
        let mut decls = Vec::new();
        loop {
            let decl_start = self.current;
            let name = self.consume_identifier("expected variable name")?;
            self.declared.insert(name.clone(), ty.clone());
            let mut init = Vec::new();
            if self.matches_symbol(TokenKind::Equal) {
                init.push(self.assignment()?);
            }
            decls.push(self.node(NodeKind::VarDecl, name, ty.clone(), init, decl_start));
            if !self.matches_symbol(TokenKind::Comma) {
                break;
            }
        }
        self.consume_symbol(TokenKind::Semicolon, "expected ';' after declaration")?;
        Ok(self.node(NodeKind::DeclStmt, "", "", decls, start))
    }

    fn if_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        self.advance();
        self.consume_symbol(TokenKind::LeftParen, "expected '(' after 'if'")?;
        let cond = self.expression()?;
        self.consume_symbol(TokenKind::RightParen, "expected ')' after if condition")?;
        let mut children = vec![cond, self.statement()?];
        if self.matches_symbol(TokenKind::Else) {
            children.push(self.statement()?);
        }
        Ok(self.node(NodeKind::IfStmt, "", "", children, start))
    }

    fn while_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        self.advance();
        self.consume_symbol(TokenKind::LeftParen, "expected '(' after 'while'")?;
        let cond = self.expression()?;
        self.consume_symbol(TokenKind::RightParen, "expected ')' after while condition")?;
        let body = self.statement()?;
        Ok(self.node(NodeKind::WhileStmt, "", "", vec![cond, body], start))
    }

    /// Absent header parts are left out of the children entirely.
    fn for_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current;
        self.advance();
        self.consume_symbol(TokenKind::LeftParen, "expected '(' after 'for'")?;
        let mut children = Vec::new();

        if self.peek_kind().is_type_specifier() {
            children.push(self.declaration()?);
        } else if !self.matches_symbol(TokenKind::Semicolon) {
            children.push(self.expression()?);
            self.consume_symbol(TokenKind::Semicolon, "expected ';' after for initializer")?;
        }

        if !self.check_kind(&TokenKind::Semicolon) {
            children.push(self.expression()?);
        }
        self.consume_symbol(TokenKind::Semicolon, "expected ';' after for condition")?;

        if !self.check_kind(&TokenKind::RightParen) {
            children.push(self.expression()?);
        }
        self.consume_symbol(TokenKind::RightParen, "expected ')' after for header")?;

        children.push(self.statement()?);
        Ok(self.node(NodeKind::ForStmt, "", "", children, start))
    }

    /// One or more type-specifier keywords, joined by single spaces.
    fn type_specifier(&mut self, message: &str) -> Result<String, ParseError> {
        let mut words = Vec::new();
        while self.peek_kind().is_type_specifier() {
            words.push(self.advance().lexeme.clone());
        }
        if words.is_empty() {
            return Err(ParseError::new(message, self.peek()));
        }
        Ok(words.join(" "))
    }

    /// Finish a node that started at token index `start` and ends before
    /// the current token.
    pub(crate) fn node(
        &self,
        kind: NodeKind,
        spelling: impl Into<String>,
        type_text: impl Into<String>,
        children: Vec<Node>,
        start: usize,
    ) -> Node {
        let end = self.current.min(self.stream.len());
        Node::in_stream(
            kind,
            spelling,
            type_text,
            children,
            Rc::clone(&self.stream),
            start.min(end)..end,
        )
    }

    pub(crate) fn declared_type(&self, name: &str) -> Option<&str> {
        self.declared.get(name).map(String::as_str)
    }

    pub(crate) fn matches_symbol(&mut self, kind: TokenKind) -> bool {
        if self.check_kind(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn consume_symbol(&mut self, kind: TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check_kind(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(message, self.peek()))
        }
    }

    pub(crate) fn consume_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let value = name.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(ParseError::new(message, self.peek())),
        }
    }

    pub(crate) fn check_kind(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + offset).map(|token| &token.kind)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
