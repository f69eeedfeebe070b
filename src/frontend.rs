/// The lexer module tokenizes source code for the parser.
///
/// Reads the raw source text and produces a pull-based stream of tokens,
/// each tagged with the 1-based line and column where it starts. Keywords are
/// recognised without regard to case.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Decodes integer, floating point and string literals.
/// - Reports input that forms no token.
pub mod lexer;
/// The type registry holds every datatype known to a session.
///
/// Each type has a promotion rank. The registry answers validity queries for
/// declarations and resolves the result type of arithmetic, comparison and
/// assignment.
pub mod types;
/// The scope stack is the symbol table.
///
/// A stack of frames, one per open block, with redeclaration detection on
/// insert and innermost-first lookup.
pub mod scope;
/// Builders for typed expression nodes.
///
/// Every node is created with its resolved datatype; numeric promotion adds
/// cast annotations to the lower-ranked operand.
pub mod expression;
/// Parser settings: the binary operator precedence table and the policy for
/// misplaced `EXIT` statements.
pub mod config;
/// The parser drives the whole translation.
///
/// It pulls tokens from the lexer, recognises statements and expressions,
/// mutates the scope stack and type registry, and calls the generator hooks
/// in source order. No program tree is retained; emission happens while
/// parsing.
///
/// # Responsibilities
/// - Implements the statement grammar shared by every block construct.
/// - Climbs the configured operator precedence levels.
/// - Checks names, types and call signatures at the earliest point.
pub mod parser;
