pub mod config;
pub mod emit;
pub mod errors;
pub mod ir;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod pipeline;
pub mod repl;
pub mod typechecker;

pub use errors::{Diagnostic, TranslateError};
pub use pipeline::{TranslateOptions, Translation, Translator};
