//! Source-to-Carbon translation pipeline.
//!
//! Each function definition goes through lowering, the optional type
//! check and emission on its own; nothing is shared between functions.

use tracing::{debug, warn};

use crate::emit::{Emitter, RuleSet};
use crate::errors::TranslateError;
use crate::ir::Function;
use crate::lexer::lex;
use crate::lowering::{is_definition, LowerOptions, Lowerer, NodeKind, SyntaxNode};
use crate::parser::parse;
use crate::typechecker::check_function;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Run the type checker before emitting.
    pub typecheck: bool,
    /// Record failing functions and continue with the rest of the unit.
    pub keep_going: bool,
    pub lower: LowerOptions,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            typecheck: true,
            keep_going: false,
            lower: LowerOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedFunction {
    pub name: String,
    pub ir: Function,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Translation {
    /// Translated definitions in source order.
    pub functions: Vec<TranslatedFunction>,
    /// Failures skipped in keep-going mode.
    pub failures: Vec<TranslateError>,
}

impl Translation {
    /// Emitted functions separated by a blank line.
    pub fn output(&self) -> String {
        self.functions
            .iter()
            .map(|function| function.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    options: TranslateOptions,
    lowerer: Lowerer,
    emitter: Emitter,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self::with_emitter(options, Emitter::carbon())
    }

    /// Translator whose emission rules are `rules` overlaid on the Carbon defaults.
    pub fn with_rules(options: TranslateOptions, rules: &RuleSet) -> Self {
        Self::with_emitter(
            options,
            Emitter::new(crate::emit::carbon::rules().overlay(rules)),
        )
    }

    pub fn with_emitter(options: TranslateOptions, emitter: Emitter) -> Self {
        Self {
            options,
            lowerer: Lowerer::new(options.lower),
            emitter,
        }
    }

    pub fn options(&self) -> TranslateOptions {
        self.options
    }

    pub fn translate_source(&self, source: &str) -> Result<Translation, TranslateError> {
        let tokens = lex(source)?;
        let unit = parse(tokens)?;
        self.translate_unit(&unit)
    }

    /// Translate every function definition under `unit`, in order.
    /// Bodyless declarations are skipped.
    pub fn translate_unit<N: SyntaxNode>(&self, unit: &N) -> Result<Translation, TranslateError> {
        let mut translation = Translation::default();
        for node in unit.children() {
            if node.kind() != NodeKind::FunctionDecl {
                continue;
            }
            if !is_definition(node) {
                debug!(function = node.spelling(), "skipping declaration without body");
                continue;
            }
            match self.translate_function(node) {
                Ok(function) => translation.functions.push(function),
                Err(err) if self.options.keep_going => {
                    warn!(function = node.spelling(), error = %err, "skipping function");
                    translation.failures.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(translation)
    }

    pub fn translate_function<N: SyntaxNode>(
        &self,
        node: &N,
    ) -> Result<TranslatedFunction, TranslateError> {
        let ir = self
            .lowerer
            .lower_function(node)
            .map_err(|source| TranslateError::Lower {
                function: node.spelling().to_string(),
                source,
            })?;
        let text = self.translate_ir(&ir)?;
        Ok(TranslatedFunction {
            name: ir.name.clone(),
            ir,
            text,
        })
    }

    /// Check (when enabled) and emit an already lowered function.
    pub fn translate_ir(&self, function: &Function) -> Result<String, TranslateError> {
        if self.options.typecheck {
            check_function(function).map_err(|source| TranslateError::Type {
                function: function.name.clone(),
                source,
            })?;
        }
        self.emitter
            .emit_function(function)
            .map_err(|source| TranslateError::Emit {
                function: function.name.clone(),
                source,
            })
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(TranslateOptions::default())
    }
}
