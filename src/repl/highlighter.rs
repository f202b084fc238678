pub fn normalize_line(input: &str) -> String {
    input.trim_end().to_string()
}

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_KEYWORD: &str = "\x1b[94m";
const ANSI_TYPE: &str = "\x1b[96m";
const ANSI_NUMBER: &str = "\x1b[93m";
const ANSI_COMMENT: &str = "\x1b[90m";

const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "do", "return", "break", "continue", "true", "false",
];

const TYPE_KEYWORDS: &[&str] = &[
    "int", "unsigned", "signed", "short", "long", "float", "double", "bool", "_Bool", "void",
];

/// Whether the buffered C input is still open: unbalanced brackets, an
/// unterminated block comment, or a trailing binary operator.
pub fn needs_more_input(source: &str) -> bool {
    let mut paren_depth: i32 = 0;
    let mut brace_depth: i32 = 0;
    let mut bracket_depth: i32 = 0;
    let mut in_block_comment = false;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                let _ = chars.next();
                in_block_comment = false;
            }
            continue;
        }

        let line_comment = ch == '#' || (ch == '/' && chars.peek() == Some(&'/'));
        if line_comment {
            while let Some(next) = chars.peek() {
                if *next == '\n' {
                    break;
                }
                let _ = chars.next();
            }
            continue;
        }

        if ch == '/' && chars.peek() == Some(&'*') {
            let _ = chars.next();
            in_block_comment = true;
            continue;
        }

        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            '[' => bracket_depth += 1,
            ']' => bracket_depth -= 1,
            _ => {}
        }
    }

    if in_block_comment {
        return true;
    }
    if paren_depth > 0 || brace_depth > 0 || bracket_depth > 0 {
        return true;
    }

    let trimmed = source.trim_end();
    if trimmed.is_empty() {
        return false;
    }
    ["+", "-", "*", "/", "%", "=", "&&", "||", "<", ">", ","]
        .iter()
        .any(|suffix| trimmed.ends_with(suffix))
        && !trimmed.ends_with("++")
        && !trimmed.ends_with("--")
}

pub fn colorize(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let chars = input.chars().collect::<Vec<_>>();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if ch == '#' || (ch == '/' && next == Some('/')) {
            out.push_str(ANSI_COMMENT);
            while i < chars.len() && chars[i] != '\n' {
                out.push(chars[i]);
                i += 1;
            }
            out.push_str(ANSI_RESET);
            continue;
        }

        if ch == '/' && next == Some('*') {
            out.push_str(ANSI_COMMENT);
            out.push_str("/*");
            i += 2;
            while i < chars.len() {
                out.push(chars[i]);
                if chars[i] == '/' && chars[i - 1] == '*' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            out.push_str(ANSI_RESET);
            continue;
        }

        if ch.is_ascii_digit() {
            out.push_str(ANSI_NUMBER);
            out.push(ch);
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                out.push(chars[i]);
                i += 1;
            }
            out.push_str(ANSI_RESET);
            continue;
        }

        if ch == '_' || ch.is_ascii_alphabetic() {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i] == '_' || chars[i].is_ascii_alphanumeric()) {
                i += 1;
            }
            let word = chars[start..i].iter().collect::<String>();
            let color = if KEYWORDS.contains(&word.as_str()) {
                Some(ANSI_KEYWORD)
            } else if TYPE_KEYWORDS.contains(&word.as_str()) {
                Some(ANSI_TYPE)
            } else {
                None
            };
            match color {
                Some(color) => {
                    out.push_str(color);
                    out.push_str(&word);
                    out.push_str(ANSI_RESET);
                }
                None => out.push_str(&word),
            }
            continue;
        }

        out.push(ch);
        i += 1;
    }

    out
}

pub fn complete(prefix: &str, symbols: &[String]) -> Vec<String> {
    let mut candidates = KEYWORDS
        .iter()
        .chain(TYPE_KEYWORDS)
        .map(|keyword| keyword.to_string())
        .collect::<Vec<_>>();
    candidates.extend(symbols.iter().cloned());
    candidates.sort();
    candidates.dedup();
    candidates
        .into_iter()
        .filter(|candidate| candidate.starts_with(prefix))
        .collect()
}
