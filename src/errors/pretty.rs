use super::{Diagnostic, ErrorCode, TranslateError};
use crate::lexer::LexError;
use crate::parser::ParseError;

pub fn underline(line: &str, column: usize) -> String {
    let mut marker = String::new();
    for _ in 1..column {
        marker.push(' ');
    }
    marker.push('^');
    format!("{}\n{}", line, marker)
}

fn source_excerpt(source: &str, line: usize, column: usize) -> Option<String> {
    let text = source.lines().nth(line.checked_sub(1)?)?;
    Some(underline(text, column))
}

fn located(
    kind: &str,
    message: &str,
    label: &str,
    source: &str,
    line: usize,
    column: usize,
) -> String {
    let mut out = format!("{}: {}\n--> {}:{}:{}", kind, message, label, line, column);
    if let Some(excerpt) = source_excerpt(source, line, column) {
        out.push('\n');
        out.push_str(&excerpt);
    }
    out
}

pub fn format_lex_error(label: &str, source: &str, err: &LexError) -> String {
    located("lex error", &err.message, label, source, err.line, err.column)
}

pub fn format_parse_error(label: &str, source: &str, err: &ParseError) -> String {
    located(
        "parse error",
        &err.message,
        label,
        source,
        err.line,
        err.column,
    )
}

pub fn format_diagnostic(label: &str, function: &str, diag: &Diagnostic) -> String {
    let kind = match diag.code {
        ErrorCode::InvalidIr => "type error",
        ErrorCode::Internal => "internal error",
    };
    let mut out = format!(
        "{} [{}]: {}\n--> {} (function '{}')",
        kind, diag.code, diag.message, label, function
    );
    if let Some(hint) = &diag.node_hint {
        out.push_str("\nnode: ");
        out.push_str(hint);
    }
    out
}

/// Render any translation failure for a terminal.
pub fn format_translate_error(label: &str, source: &str, err: &TranslateError) -> String {
    match err {
        TranslateError::Lex(err) => format_lex_error(label, source, err),
        TranslateError::Parse(err) => format_parse_error(label, source, err),
        TranslateError::Type {
            function,
            source: diag,
        } => format_diagnostic(label, function, diag),
        TranslateError::Lower {
            function,
            source: cause,
        } => format!(
            "lowering error: {}\n--> {} (function '{}')",
            cause, label, function
        ),
        TranslateError::Emit {
            function,
            source: cause,
        } => format_diagnostic(label, function, &Diagnostic::from(cause.clone())),
    }
}
