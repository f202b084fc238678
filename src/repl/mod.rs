pub mod highlighter;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Editor, Helper};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::errors::pretty::format_translate_error;
use crate::ir::printer::render_function;
use crate::pipeline::{TranslateOptions, Translator};

const MAX_HISTORY_ENTRIES: usize = 500;
const SOURCE_LABEL: &str = "<repl>";

#[derive(Debug, PartialEq, Eq)]
enum CommandAction {
    NotHandled,
    Handled,
    Exit,
}

#[derive(Clone)]
struct ReplEditorHelper {
    symbols: Arc<Mutex<Vec<String>>>,
}

impl ReplEditorHelper {
    fn new() -> Self {
        Self {
            symbols: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn set_symbols(&self, symbols: Vec<String>) {
        if let Ok(mut guard) = self.symbols.lock() {
            *guard = symbols;
        }
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Helper for ReplEditorHelper {}

impl Hinter for ReplEditorHelper {
    type Hint = String;
}

impl Validator for ReplEditorHelper {
    fn validate(
        &self,
        context: &mut ValidationContext<'_>,
    ) -> Result<ValidationResult, ReadlineError> {
        if highlighter::needs_more_input(context.input()) {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Highlighter for ReplEditorHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> std::borrow::Cow<'l, str> {
        std::borrow::Cow::Owned(highlighter::colorize(line))
    }
}

impl Completer for ReplEditorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let line = &line[..pos.min(line.len())];
        let mut start = line.len();
        for (idx, ch) in line.char_indices().rev() {
            if ch == '_' || ch.is_ascii_alphanumeric() {
                start = idx;
            } else {
                break;
            }
        }

        let prefix = &line[start..];
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }

        let pairs = highlighter::complete(prefix, &self.symbols())
            .into_iter()
            .map(|value| Pair {
                display: value.clone(),
                replacement: value,
            })
            .collect::<Vec<_>>();
        Ok((start, pairs))
    }
}

/// Translation state shared by the terminal and plain-stdin loops.
struct Session {
    options: TranslateOptions,
    show_ir: bool,
    history: Vec<String>,
    buffer: String,
    /// Names of functions translated so far, offered as completions.
    symbols: Vec<String>,
}

impl Session {
    fn new(options: TranslateOptions, history: Vec<String>) -> Self {
        Self {
            options,
            show_ir: false,
            history,
            buffer: String::new(),
            symbols: Vec::new(),
        }
    }

    fn prompt(&self) -> &'static str {
        if self.buffer.is_empty() {
            "c> "
        } else {
            "..> "
        }
    }

    /// Feed one raw line. Returns `Exit` when the session should end and
    /// `Handled` once a complete unit has been translated or buffered.
    fn feed(&mut self, raw_line: &str) -> CommandAction {
        if self.buffer.is_empty() {
            match self.handle_meta_command(raw_line.trim()) {
                CommandAction::NotHandled => {}
                action => return action,
            }
        }

        let normalized = highlighter::normalize_line(raw_line);
        if self.buffer.is_empty() && normalized.trim().is_empty() {
            return CommandAction::Handled;
        }
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(&normalized);
        if highlighter::needs_more_input(&self.buffer) {
            return CommandAction::Handled;
        }

        let input = std::mem::take(&mut self.buffer);
        self.history.push(input.clone());
        trim_history(&mut self.history);
        match self.translate(&input) {
            Ok(output) => println!("{}", output),
            Err(rendered) => eprintln!("{}", rendered),
        }
        CommandAction::Handled
    }

    /// Translate a complete unit, returning Carbon text or a rendered error.
    fn translate(&mut self, input: &str) -> Result<String, String> {
        let translator = Translator::new(self.options);
        let translation = translator
            .translate_source(input)
            .map_err(|err| format_translate_error(SOURCE_LABEL, input, &err))?;

        let mut sections = Vec::new();
        for function in &translation.functions {
            if !self.symbols.contains(&function.name) {
                self.symbols.push(function.name.clone());
            }
            if self.show_ir {
                sections.push(render_function(&function.ir));
            }
            sections.push(function.text.clone());
        }
        if sections.is_empty() {
            sections.push("(no function definitions)".to_string());
        }
        Ok(sections.join("\n\n"))
    }

    fn handle_meta_command(&mut self, command: &str) -> CommandAction {
        if command.is_empty() {
            return CommandAction::NotHandled;
        }
        if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
            return CommandAction::Exit;
        }
        if !command.starts_with(':') {
            return CommandAction::NotHandled;
        }

        let mut parts = command.split_whitespace();
        let directive = parts.next().unwrap_or_default();
        match directive {
            ":quit" | ":exit" => return CommandAction::Exit,
            ":help" => {
                println!(":help                   Show this message");
                println!(":ir on|off              Print the IR tree before the Carbon output");
                println!(":check on|off           Toggle the type checker");
                println!(":history [n]            Show recent history (default 20)");
                println!(":quit                   Exit REPL");
            }
            ":ir" => match parts.next() {
                Some("on") => {
                    self.show_ir = true;
                    println!("ir: on");
                }
                Some("off") => {
                    self.show_ir = false;
                    println!("ir: off");
                }
                _ => eprintln!("usage: :ir on|off"),
            },
            ":check" => match parts.next() {
                Some("on") => {
                    self.options.typecheck = true;
                    println!("check: on");
                }
                Some("off") => {
                    self.options.typecheck = false;
                    println!("check: off");
                }
                _ => eprintln!("usage: :check on|off"),
            },
            ":history" => {
                let count = parts
                    .next()
                    .and_then(|value| value.parse::<usize>().ok())
                    .unwrap_or(20);
                let start = self.history.len().saturating_sub(count);
                for (idx, entry) in self.history.iter().enumerate().skip(start) {
                    println!("{:>4} {}", idx + 1, highlighter::colorize(entry));
                }
            }
            other => {
                eprintln!("unknown command '{}'; use :help", other);
            }
        }

        CommandAction::Handled
    }
}

pub fn run(options: TranslateOptions) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(options, load_history());

    println!("carbonize REPL: enter C function definitions to see their Carbon translation");
    println!("Commands: :help, :ir on|off, :check on|off, :history [n], :quit");

    if io::stdin().is_terminal() {
        let helper = ReplEditorHelper::new();
        let mut editor = Editor::<ReplEditorHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(helper.clone()));
        for entry in &session.history {
            let _ = editor.add_history_entry(entry.as_str());
        }

        loop {
            let line = match editor.readline(session.prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(Box::<dyn Error>::from(err)),
            };
            let _ = editor.add_history_entry(line.as_str());
            if session.feed(&line) == CommandAction::Exit {
                break;
            }
            helper.set_symbols(session.symbols.clone());
        }
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut line = String::new();
        loop {
            print!("{}", session.prompt());
            io::stdout().flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if session.feed(line.trim_end_matches(['\n', '\r'])) == CommandAction::Exit {
                break;
            }
        }
    }

    if let Err(err) = save_history(&session.history) {
        eprintln!("failed to save repl history: {}", err);
    }

    Ok(())
}

fn load_history() -> Vec<String> {
    let Ok(contents) = fs::read_to_string(repl_history_path()) else {
        return Vec::new();
    };
    contents
        .split("\n\n")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn save_history(history: &[String]) -> io::Result<()> {
    let mut trimmed = history.to_vec();
    trim_history(&mut trimmed);
    let mut encoded = trimmed.join("\n\n");
    if !encoded.is_empty() {
        encoded.push('\n');
    }
    fs::write(repl_history_path(), encoded)
}

fn trim_history(history: &mut Vec<String>) {
    if history.len() > MAX_HISTORY_ENTRIES {
        let drop_count = history.len() - MAX_HISTORY_ENTRIES;
        history.drain(0..drop_count);
    }
}

fn repl_history_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".carbonize_history");
    }
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".carbonize_history");
    }
    PathBuf::from(".carbonize_history")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_input_is_buffered_until_balanced() {
        let mut session = Session::new(TranslateOptions::default(), Vec::new());
        assert_eq!(session.feed("int main() {"), CommandAction::Handled);
        assert_eq!(session.prompt(), "..> ");
        assert_eq!(session.feed("  return 0;"), CommandAction::Handled);
        assert_eq!(session.feed("}"), CommandAction::Handled);
        assert_eq!(session.prompt(), "c> ");
        assert_eq!(session.symbols, vec!["main".to_string()]);
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn meta_commands_toggle_state() {
        let mut session = Session::new(TranslateOptions::default(), Vec::new());
        assert_eq!(session.feed(":check off"), CommandAction::Handled);
        assert!(!session.options.typecheck);
        assert_eq!(session.feed(":ir on"), CommandAction::Handled);
        assert!(session.show_ir);
        assert_eq!(session.feed(":quit"), CommandAction::Exit);
    }

    #[test]
    fn translation_includes_ir_when_requested() {
        let mut session = Session::new(TranslateOptions::default(), Vec::new());
        session.show_ir = true;
        let output = session
            .translate("int one() { return 1; }")
            .expect("translates");
        assert!(output.starts_with("Function one() -> I32"));
        assert!(output.ends_with("fn one() -> i32 {\n  return 1;\n}"));
    }

    #[test]
    fn history_is_bounded() {
        let mut history = (0..MAX_HISTORY_ENTRIES + 3)
            .map(|idx| idx.to_string())
            .collect::<Vec<_>>();
        trim_history(&mut history);
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history[0], "3");
    }
}
