/// Parser state and token handling.
///
/// Contains the `Parser` struct, the one-token lookahead, expectation helpers
/// and the program entry point.
pub mod core;

/// The shared statement list.
///
/// Parses statements until one of the caller's terminator tokens, and
/// dispatches each statement to its production.
pub mod block;

/// Simple statements.
///
/// Declarations, assignments, call statements, `PRINT`, `EXIT`, `CONTINUE`
/// and `RETURN`.
pub mod statement;

/// Control flow constructs.
///
/// `IF`, `SELECT CASE`, `FOR`, `WHILE` and `DO`.
pub mod control;

/// `SUB` and `FUNCTION` definitions and call checking.
pub mod routine;

/// Binary operator parsing by precedence climbing.
pub mod binary;

/// Prefix operators and primary expressions.
///
/// Literals, parenthesized expressions, variable references and function
/// calls.
pub mod unary;

/// Utility functions for the parser.
///
/// Type annotations, type suffixes, comma separated lists and statement
/// boundaries.
pub mod utils;
