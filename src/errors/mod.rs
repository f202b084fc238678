pub mod pretty;

use std::fmt;

use thiserror::Error;

use crate::emit::EmitError;
use crate::lexer::LexError;
use crate::lowering::LowerError;
use crate::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Internal,
    InvalidIr,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Internal => "E_INTERNAL",
            ErrorCode::InvalidIr => "E_INVALID_IR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fail-fast error raised by the type checker. Only the first
/// violation in a function is ever reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub node_hint: Option<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>, node_hint: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            node_hint,
        }
    }

    pub fn invalid_ir(message: impl Into<String>, node_hint: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidIr, message, Some(node_hint.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message, None)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_hint {
            Some(hint) => write!(f, "{}: {} @ {}", self.code, self.message, hint),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

impl From<EmitError> for Diagnostic {
    fn from(err: EmitError) -> Self {
        Diagnostic::internal(err.to_string())
    }
}

/// Any failure while translating a source unit.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("in function '{function}': {source}")]
    Lower {
        function: String,
        #[source]
        source: LowerError,
    },
    #[error("in function '{function}': {source}")]
    Type {
        function: String,
        #[source]
        source: Diagnostic,
    },
    #[error("in function '{function}': {source}")]
    Emit {
        function: String,
        #[source]
        source: EmitError,
    },
}

impl TranslateError {
    /// Name of the function whose translation failed, if the failure was per-function.
    pub fn function(&self) -> Option<&str> {
        match self {
            TranslateError::Lex(_) | TranslateError::Parse(_) => None,
            TranslateError::Lower { function, .. }
            | TranslateError::Type { function, .. }
            | TranslateError::Emit { function, .. } => Some(function),
        }
    }
}
