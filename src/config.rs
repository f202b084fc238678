//! Startup configuration: command-line flags with environment fallbacks.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;

use crate::lowering::{ArithmeticTyping, LowerOptions};
use crate::pipeline::TranslateOptions;

pub const OUT_ENV: &str = "CARBONIZE_OUT";
pub const LOG_ENV: &str = "CARBONIZE_LOG";
pub const DEFAULT_OUT: &str = "output.carbon";

pub const USAGE: &str = "\
usage: carbonize <input.c> [options]
       carbonize repl [options]
       carbonize help

options:
  --out=<path>             write Carbon output to <path> (env CARBONIZE_OUT, default output.carbon)
  --stdout                 print Carbon output instead of writing a file
  --no-typecheck           emit without running the type checker
  --dump-ir                print each function's IR to stderr
  --keep-going             translate remaining functions after a failure
  --arith=fixed|operands   result type of arithmetic (default fixed: always i32)
  --log=<level>            error, warn, info, debug or trace (env CARBONIZE_LOG, default warn)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown flag '{0}'; run `carbonize help` for usage")]
    UnknownFlag(String),
    #[error("invalid value '{value}' for {flag}: expected {expected}")]
    InvalidValue {
        flag: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("missing input file; usage: carbonize <input.c> [options]")]
    MissingInput,
    #[error("multiple input files provided ('{0}' and '{1}')")]
    MultipleInputs(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Translate(Config),
    Repl(Config),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: Option<PathBuf>,
    pub output: Output,
    pub typecheck: bool,
    pub dump_ir: bool,
    pub keep_going: bool,
    pub arithmetic: ArithmeticTyping,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: Output::File(PathBuf::from(DEFAULT_OUT)),
            typecheck: true,
            dump_ir: false,
            keep_going: false,
            arithmetic: ArithmeticTyping::default(),
            log_level: Level::WARN,
        }
    }
}

impl Config {
    /// Resolve the command line. `env` looks up environment variables;
    /// flags always win over the environment.
    pub fn from_args<F>(args: Vec<String>, env: F) -> Result<Command, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = env(OUT_ENV).filter(|value| !value.is_empty()) {
            config.output = Output::File(PathBuf::from(path));
        }
        if let Some(level) = env(LOG_ENV).filter(|value| !value.is_empty()) {
            config.log_level = parse_level(&level)?;
        }

        let mut args = args.into_iter().peekable();
        let repl = match args.peek().map(String::as_str) {
            Some("help") | Some("--help") | Some("-h") => return Ok(Command::Help),
            Some("repl") => {
                args.next();
                true
            }
            _ => false,
        };

        for arg in args {
            if let Some(value) = arg.strip_prefix("--out=") {
                config.output = Output::File(PathBuf::from(value));
                continue;
            }
            if arg == "--stdout" {
                config.output = Output::Stdout;
                continue;
            }
            if arg == "--no-typecheck" {
                config.typecheck = false;
                continue;
            }
            if arg == "--dump-ir" {
                config.dump_ir = true;
                continue;
            }
            if arg == "--keep-going" {
                config.keep_going = true;
                continue;
            }
            if let Some(value) = arg.strip_prefix("--arith=") {
                config.arithmetic =
                    ArithmeticTyping::from_name(value).ok_or_else(|| ConfigError::InvalidValue {
                        flag: "--arith",
                        value: value.to_string(),
                        expected: "fixed or operands",
                    })?;
                continue;
            }
            if let Some(value) = arg.strip_prefix("--log=") {
                config.log_level = parse_level(value)?;
                continue;
            }
            if arg.starts_with("--") || repl {
                return Err(ConfigError::UnknownFlag(arg));
            }
            match &config.input {
                None => config.input = Some(PathBuf::from(arg)),
                Some(first) => {
                    return Err(ConfigError::MultipleInputs(
                        first.display().to_string(),
                        arg,
                    ))
                }
            }
        }

        if repl {
            return Ok(Command::Repl(config));
        }
        if config.input.is_none() {
            return Err(ConfigError::MissingInput);
        }
        Ok(Command::Translate(config))
    }

    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            typecheck: self.typecheck,
            keep_going: self.keep_going,
            lower: LowerOptions {
                arithmetic: self.arithmetic,
            },
        }
    }
}

fn parse_level(value: &str) -> Result<Level, ConfigError> {
    Level::from_str(value).map_err(|_| ConfigError::InvalidValue {
        flag: "--log",
        value: value.to_string(),
        expected: "error, warn, info, debug or trace",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_for_a_bare_input() {
        let Command::Translate(config) = Config::from_args(args(&["main.c"]), no_env).unwrap()
        else {
            panic!("expected translate command");
        };
        assert_eq!(config.input, Some(PathBuf::from("main.c")));
        assert_eq!(config.output, Output::File(PathBuf::from("output.carbon")));
        assert!(config.typecheck);
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.translate_options(), TranslateOptions::default());
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            OUT_ENV => Some("env.carbon".to_string()),
            LOG_ENV => Some("debug".to_string()),
            _ => None,
        };
        let Command::Translate(config) =
            Config::from_args(args(&["main.c", "--out=flag.carbon"]), env).unwrap()
        else {
            panic!("expected translate command");
        };
        assert_eq!(config.output, Output::File(PathBuf::from("flag.carbon")));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn invalid_values_name_the_flag() {
        let err = Config::from_args(args(&["main.c", "--arith=wide"]), no_env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value 'wide' for --arith: expected fixed or operands"
        );
        assert_eq!(
            Config::from_args(args(&[]), no_env),
            Err(ConfigError::MissingInput)
        );
        assert!(matches!(
            Config::from_args(args(&["main.c", "--bogus"]), no_env),
            Err(ConfigError::UnknownFlag(_))
        ));
    }

    #[test]
    fn subcommands() {
        assert_eq!(
            Config::from_args(args(&["help"]), no_env),
            Ok(Command::Help)
        );
        let Command::Repl(config) =
            Config::from_args(args(&["repl", "--arith=operands", "--no-typecheck"]), no_env)
                .unwrap()
        else {
            panic!("expected repl command");
        };
        assert_eq!(config.arithmetic, ArithmeticTyping::FromOperands);
        assert!(!config.typecheck);
    }
}
