use crate::{
    ast::{ExitKind, LoopKind, RoutineKind},
    codegen::Generator,
    error::{CompileError, ParseError},
    frontend::{
        config::ParserConfig,
        lexer::{Lexer, Position, Spanned, Token},
        scope::ScopeStack,
        types::TypeRegistry,
    },
};

pub type ParseResult<T> = Result<T, CompileError>;

/// How many constructs of each kind enclose the current statement within the
/// current routine (or the file body).
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct Nesting {
    pub(super) for_loops:   usize,
    pub(super) while_loops: usize,
    pub(super) do_loops:    usize,
    pub(super) selects:     usize,
}

impl Nesting {
    pub(super) const fn loops(&mut self, kind: LoopKind) -> &mut usize {
        match kind {
            LoopKind::For => &mut self.for_loops,
            LoopKind::While => &mut self.while_loops,
            LoopKind::Do => &mut self.do_loops,
        }
    }

    pub(super) const fn encloses(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::For => self.for_loops > 0,
            LoopKind::While => self.while_loops > 0,
            LoopKind::Do => self.do_loops > 0,
        }
    }
}

/// The routine whose body is being parsed.
#[derive(Debug)]
pub(super) struct RoutineContext {
    pub(super) name:        String,
    pub(super) kind:        RoutineKind,
    pub(super) return_type: String,
}

/// Single-pass parser and analyzer for one source.
///
/// Owns the scope stack and type registry of the session and borrows the
/// generator it reports to.
///
/// ```
/// use transbasic::{
///     codegen::events::EventLog,
///     frontend::{config::ParserConfig, parser::core::Parser},
/// };
///
/// let mut log = EventLog::new();
/// let mut parser =
///     Parser::new("inline", "DIM r AS real = 1.5\n", &mut log, ParserConfig::default()).unwrap();
/// parser.types_mut().alias("real", "double");
/// parser.parse_program().unwrap();
/// assert_eq!(log.count("declaration"), 1);
/// ```
pub struct Parser<'a, G: Generator> {
    pub(super) lexer:     Lexer<'a>,
    pub(super) current:   Spanned,
    pub(super) scopes:    ScopeStack,
    pub(super) types:     TypeRegistry,
    pub(super) generator: &'a mut G,
    pub(super) config:    ParserConfig,
    pub(super) nesting:   Nesting,
    pub(super) routines:  Vec<RoutineContext>,
    /// Type of the place the expression being parsed will be stored into.
    pub(super) target:    Option<String>,
}

impl<'a, G: Generator> Parser<'a, G> {
    /// Creates a parser with the built-in types and reads the first token.
    ///
    /// # Errors
    /// Fails when the source does not start with a valid token.
    pub fn new(source_name: &str,
               source: &'a str,
               generator: &'a mut G,
               config: ParserConfig)
               -> ParseResult<Self> {
        let mut lexer = Lexer::new(source_name, source);
        let current = lexer.next_token()?;
        Ok(Self { lexer,
                  current,
                  scopes: ScopeStack::new(source_name),
                  types: TypeRegistry::with_builtins(),
                  generator,
                  config,
                  nesting: Nesting::default(),
                  routines: Vec::new(),
                  target: None })
    }

    /// The session's type registry, for registering aliases before parsing.
    pub const fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Parses the whole source, emitting as it goes.
    ///
    /// Grammar: `program := block(<no terminators>) EOF`
    ///
    /// # Errors
    /// Returns the first lexical, syntactic, name or type error. Emission
    /// stops at that point.
    pub fn parse_program(mut self) -> ParseResult<()> {
        tracing::debug!(source = self.lexer.source_name(), "translation started");
        self.generator.module_header();
        self.parse_block(&[])?;
        if self.current.token != Token::EndOfInput {
            return Err(self.unexpected("end of input"));
        }
        self.generator.module_footer();
        tracing::debug!(source = self.lexer.source_name(),
                        depth = self.scopes.depth(),
                        "translation finished");
        Ok(())
    }

    /// Moves to the next token and returns the one that was current.
    pub(super) fn advance(&mut self) -> ParseResult<Spanned> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.current.token == *token
    }

    pub(super) fn check_any(&self, tokens: &[Token]) -> bool {
        tokens.contains(&self.current.token)
    }

    /// Consumes the current token if it is `token`.
    pub(super) fn accept(&mut self, token: &Token) -> ParseResult<bool> {
        if self.check(token) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Consumes `token` or fails naming it as expected.
    pub(super) fn expect(&mut self, token: &Token) -> ParseResult<Position> {
        if self.check(token) {
            return Ok(self.advance()?.pos);
        }
        Err(self.unexpected(&token.describe()))
    }

    /// Consumes an identifier and returns its text and position.
    pub(super) fn expect_identifier(&mut self, expected: &str) -> ParseResult<(String, Position)> {
        if let Token::Identifier(name) = &self.current.token {
            let name = name.clone();
            let pos = self.advance()?.pos;
            return Ok((name, pos));
        }
        Err(self.unexpected(expected))
    }

    pub(super) const fn pos(&self) -> Position {
        self.current.pos
    }

    pub(super) fn unexpected(&self, expected: &str) -> CompileError {
        ParseError::UnexpectedToken { found:    self.current.token.describe(),
                                      expected: expected.to_string(),
                                      pos:      self.current.pos, }.into()
    }

    pub(super) fn current_routine(&self) -> Option<&RoutineContext> {
        self.routines.last()
    }

    /// Returns `true` when an `EXIT` of `kind` has a construct to leave.
    pub(super) fn exit_applies(&self, kind: ExitKind) -> bool {
        match kind {
            ExitKind::Loop(kind) => self.nesting.encloses(kind),
            ExitKind::Select => self.nesting.selects > 0,
            ExitKind::Function => self.current_routine()
                                      .is_some_and(|r| r.kind == RoutineKind::Function),
            ExitKind::Sub => self.current_routine()
                                 .is_some_and(|r| r.kind == RoutineKind::Sub),
        }
    }
}
