#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LessLess,
    GreaterGreater,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    PlusPlus,
    MinusMinus,
    Identifier(String),
    IntLiteral { value: i64, unsigned: bool },
    FloatLiteral { value: f64, single: bool },
    Int,
    Unsigned,
    Signed,
    Short,
    Long,
    Float,
    Double,
    Bool,
    Void,
    If,
    Else,
    While,
    For,
    Do,
    Return,
    Break,
    Continue,
    True,
    False,
    Eof,
}

impl TokenKind {
    /// Keywords that may start a type specifier.
    pub fn is_type_specifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Unsigned
                | TokenKind::Signed
                | TokenKind::Short
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Bool
                | TokenKind::Void
        )
    }
}

/// A lexed token. `start`/`end` are half-open character offsets into the
/// source; the parser copies them into syntax-node extents.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
            start,
            end,
        }
    }
}
