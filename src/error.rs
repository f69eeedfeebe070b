/// Lexing and syntax errors.
///
/// Covers unreadable sources, input that forms no token, oversized integer
/// literals, and tokens that appear where the grammar requires something
/// else.
pub mod parse_error;
/// Name and type errors.
///
/// Raised while the parser resolves identifiers against the scope stack and
/// checks expression types against the type registry.
pub mod semantic_error;

use std::fmt;

pub use parse_error::ParseError;
pub use semantic_error::SemanticError;

use crate::frontend::lexer::Position;

/// Any error that stops a translation session.
#[derive(Debug)]
pub enum CompileError {
    /// Lexical or syntactic.
    Parse(ParseError),
    /// Name or type.
    Semantic(SemanticError),
}

impl CompileError {
    /// Where the error was detected, if it is tied to a source location.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Parse(e) => e.position(),
            Self::Semantic(e) => Some(e.position()),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<SemanticError> for CompileError {
    fn from(e: SemanticError) -> Self {
        Self::Semantic(e)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => fmt::Display::fmt(e, f),
            Self::Semantic(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Semantic(e) => Some(e),
        }
    }
}

/// A fatal error attributed to a named source.
///
/// Renders as `<source>:<line>:<column>: error: <message>`. Errors with no
/// source location, such as an unreadable file, report `0:0`.
///
/// ```
/// use transbasic::{
///     error::{CompileError, Diagnostic, SemanticError},
///     frontend::lexer::Position,
/// };
///
/// let error = SemanticError::UnknownIdentifier { name: "y".into(),
///                                                pos:  Position { line: 3, column: 7 } };
/// let diagnostic = Diagnostic::new("demo.bas", CompileError::from(error));
/// assert_eq!(diagnostic.to_string(), "demo.bas:3:7: error: unknown identifier 'y'");
/// ```
#[derive(Debug)]
pub struct Diagnostic {
    /// Name of the source the error belongs to.
    pub source_name: String,
    /// The error itself.
    pub error:       CompileError,
}

impl Diagnostic {
    #[must_use]
    pub fn new(source_name: impl Into<String>, error: CompileError) -> Self {
        Self { source_name: source_name.into(),
               error }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos = self.error.position().unwrap_or_default();
        write!(f,
               "{}:{}:{}: error: {}",
               self.source_name, pos.line, pos.column, self.error)
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
