pub mod token;

use thiserror::Error;

use token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("lex error at line {line}, column {column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

struct Lexer {
    chars: Vec<char>,
    current: usize,
    start: usize,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            start: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
            tokens: Vec::new(),
        }
    }

    fn lex(mut self) -> Result<Vec<Token>, LexError> {
        while !self.is_at_end() {
            self.start_token();
            self.scan_token()?;
        }

        self.start_token();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
            self.current,
            self.current,
        ));

        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), LexError> {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            '[' => self.add_token(TokenKind::LeftBracket),
            ']' => self.add_token(TokenKind::RightBracket),
            ',' => self.add_token(TokenKind::Comma),
            ';' => self.add_token(TokenKind::Semicolon),
            '~' => self.add_token(TokenKind::Tilde),
            '^' => self.add_token(TokenKind::Caret),
            '+' => {
                let kind = if self.matches('+') {
                    TokenKind::PlusPlus
                } else if self.matches('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                };
                self.add_token(kind);
            }
            '-' => {
                let kind = if self.matches('-') {
                    TokenKind::MinusMinus
                } else if self.matches('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::Minus
                };
                self.add_token(kind);
            }
            '*' => self.one_or_assign(TokenKind::Star, TokenKind::StarEqual),
            '%' => self.one_or_assign(TokenKind::Percent, TokenKind::PercentEqual),
            '!' => self.one_or_assign(TokenKind::Bang, TokenKind::BangEqual),
            '=' => self.one_or_assign(TokenKind::Equal, TokenKind::EqualEqual),
            '&' => {
                let kind = if self.matches('&') {
                    TokenKind::AmpAmp
                } else {
                    TokenKind::Amp
                };
                self.add_token(kind);
            }
            '|' => {
                let kind = if self.matches('|') {
                    TokenKind::PipePipe
                } else {
                    TokenKind::Pipe
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('<') {
                    TokenKind::LessLess
                } else if self.matches('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('>') {
                    TokenKind::GreaterGreater
                } else if self.matches('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    self.skip_line();
                } else if self.matches('*') {
                    self.skip_block_comment()?;
                } else if self.matches('=') {
                    self.add_token(TokenKind::SlashEqual);
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            // preprocessor directives are not interpreted
            '#' => self.skip_line(),
            ' ' | '\r' | '\t' | '\n' => {}
            '.' if self.peek().is_ascii_digit() => self.number()?,
            d if d.is_ascii_digit() => self.number()?,
            a if is_ident_start(a) => self.identifier(),
            _ => {
                return Err(LexError::new(
                    format!("unexpected character '{}'", c),
                    self.token_line,
                    self.token_column,
                ))
            }
        }

        Ok(())
    }

    fn one_or_assign(&mut self, single: TokenKind, with_equal: TokenKind) {
        let kind = if self.matches('=') { with_equal } else { single };
        self.add_token(kind);
    }

    fn number(&mut self) -> Result<(), LexError> {
        let first = self.chars[self.start];
        if first == '0' && matches!(self.peek(), 'x' | 'X') {
            self.advance();
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }
            let digits: String = self.chars[self.start + 2..self.current].iter().collect();
            return self.integer(&digits, 16);
        }

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let mut is_float = first == '.';
        if self.peek() == '.' {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        if matches!(self.peek(), 'e' | 'E') {
            let has_sign = matches!(self.peek_next(), '+' | '-');
            let digit_at = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_ascii_digit() {
                is_float = true;
                for _ in 0..digit_at {
                    self.advance();
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        if is_float {
            let digits = self.current_lexeme();
            let value = digits
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    LexError::new(
                        format!("invalid float literal '{}'", digits),
                        self.token_line,
                        self.token_column,
                    )
                })?;
            let single = self.matches('f') || self.matches('F');
            if !single {
                let _ = self.matches('l') || self.matches('L');
            }
            self.reject_suffix()?;
            self.add_token(TokenKind::FloatLiteral { value, single });
            return Ok(());
        }

        let digits = self.current_lexeme();
        if digits.len() > 1 && digits.starts_with('0') {
            self.integer(&digits[1..], 8)
        } else {
            self.integer(&digits, 10)
        }
    }

    fn integer(&mut self, digits: &str, radix: u32) -> Result<(), LexError> {
        let value = i64::from_str_radix(digits, radix).map_err(|_| {
            LexError::new(
                format!("invalid integer literal '{}'", self.current_lexeme()),
                self.token_line,
                self.token_column,
            )
        })?;
        let mut unsigned = false;
        loop {
            if self.matches('u') || self.matches('U') {
                unsigned = true;
            } else if !(self.matches('l') || self.matches('L')) {
                break;
            }
        }
        self.reject_suffix()?;
        self.add_token(TokenKind::IntLiteral { value, unsigned });
        Ok(())
    }

    fn reject_suffix(&self) -> Result<(), LexError> {
        if is_ident_continue(self.peek()) {
            return Err(LexError::new(
                format!(
                    "invalid suffix on numeric literal '{}{}'",
                    self.current_lexeme(),
                    self.peek()
                ),
                self.token_line,
                self.token_column,
            ));
        }
        Ok(())
    }

    fn identifier(&mut self) {
        while is_ident_continue(self.peek()) {
            self.advance();
        }

        let lexeme = self.current_lexeme();
        let kind = match lexeme.as_str() {
            "int" => TokenKind::Int,
            "unsigned" => TokenKind::Unsigned,
            "signed" => TokenKind::Signed,
            "short" => TokenKind::Short,
            "long" => TokenKind::Long,
            "float" => TokenKind::Float,
            "double" => TokenKind::Double,
            "bool" | "_Bool" => TokenKind::Bool,
            "void" => TokenKind::Void,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "do" => TokenKind::Do,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Identifier(lexeme),
        };

        self.add_token(kind);
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError::new(
            "unterminated block comment",
            self.token_line,
            self.token_column,
        ))
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.current_lexeme();
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.token_line,
            self.token_column,
            self.start,
            self.current,
        ));
    }

    fn start_token(&mut self) {
        self.start = self.current;
        self.token_line = self.line;
        self.token_column = self.column;
    }

    fn current_lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars
            .get(self.current + offset)
            .copied()
            .unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
