//! # transbasic
//!
//! transbasic is a single-pass translator front end for a BASIC-like
//! procedural language, written in Rust.
//! It tokenizes, parses and type-checks a program in one pass and reports
//! every recognised construct to a pluggable code generator.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{fs, path::Path};

use crate::{
    codegen::{Generator, cpp::CppGenerator},
    error::{Diagnostic, ParseError},
    frontend::{config::ParserConfig, parser::core::Parser},
};

/// Defines the values the parser hands to code generators.
///
/// This module declares the typed expression tree together with the
/// operators, `CASE` items, parameters and loop kinds that appear in
/// emission events. No whole-program tree is built; each value lives only
/// until the generator has seen it.
///
/// # Responsibilities
/// - Defines expression nodes with their resolved type and cast annotation.
/// - Defines the structured values passed to generator hooks.
pub mod ast;
/// Provides unified error types for lexing, parsing and analysis.
///
/// This module defines every error that can stop a translation. Each error
/// carries the position where it was detected, and the rendered
/// [`Diagnostic`] adds the source name.
///
/// # Responsibilities
/// - Defines error enums for lexical, syntactic, name and type failures.
/// - Attaches line and column information for reporting.
/// - Integrates with the standard error handling traits.
pub mod error;
/// Turns source text into generator events.
///
/// This module ties together the lexer, the type registry, the scope stack,
/// the expression builder and the parser that drives them.
///
/// # Responsibilities
/// - Recognises declarations, statements and expressions.
/// - Resolves names and types while parsing.
/// - Emits events in source order.
pub mod frontend;
/// Code generation backends.
///
/// Defines the [`Generator`](codegen::Generator) contract and ships an
/// event recorder and a C++ backend.
pub mod codegen;

/// Translates `source` with the default configuration, reporting every
/// construct to `generator`.
///
/// Translation stops at the first error. Events emitted before that point
/// have already reached the generator.
///
/// # Errors
/// Returns the first lexical, syntactic, name or type error, attributed to
/// `source_name`.
///
/// # Examples
/// ```
/// use transbasic::{codegen::events::EventLog, translate};
///
/// let mut log = EventLog::new();
/// assert!(translate("ok.bas", "DIM x AS integer\nx = 5\n", &mut log).is_ok());
///
/// // `y` is never declared.
/// let err = translate("bad.bas", "DIM x AS integer\nx = y\n", &mut log).unwrap_err();
/// assert_eq!(err.to_string(), "bad.bas:2:5: error: unknown identifier 'y'");
/// ```
pub fn translate<G: Generator>(source_name: &str,
                               source: &str,
                               generator: &mut G)
                               -> Result<(), Diagnostic> {
    translate_with_config(source_name, source, ParserConfig::default(), generator)
}

/// Translates `source` with an explicit parser configuration.
///
/// # Errors
/// See [`translate`].
pub fn translate_with_config<G: Generator>(source_name: &str,
                                           source: &str,
                                           config: ParserConfig,
                                           generator: &mut G)
                                           -> Result<(), Diagnostic> {
    Parser::new(source_name, source, generator, config).and_then(Parser::parse_program)
                                                       .map_err(|e| Diagnostic::new(source_name, e))
}

/// Translates `source` to a C++17 translation unit.
///
/// # Errors
/// See [`translate`].
///
/// # Examples
/// ```
/// let cpp = transbasic::translate_to_cpp("hello.bas", "PRINT \"hello\"\n").unwrap();
/// assert!(cpp.contains("int main()"));
/// ```
pub fn translate_to_cpp(source_name: &str, source: &str) -> Result<String, Diagnostic> {
    let mut generator = CppGenerator::new();
    translate(source_name, source, &mut generator)?;
    Ok(generator.into_output())
}

/// Reads a source file.
///
/// # Errors
/// Returns an unreadable-source diagnostic naming the path when the file
/// cannot be read as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, Diagnostic> {
    let name = path.display().to_string();
    fs::read_to_string(path).map_err(|e| {
                                Diagnostic::new(name.clone(),
                                                ParseError::UnreadableSource { path:   name.clone(),
                                                                               reason: e.to_string(), }.into())
                            })
}
