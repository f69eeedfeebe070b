use std::fmt;

use logos::Logos;
use ordered_float::OrderedFloat;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// Keywords match without regard to case; identifiers keep their spelling.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Floating point literal such as `3.25` or `1.5e3`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    Float(OrderedFloat<f64>),
    /// Integer literal such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal; a doubled quote stands for one quote character.
    #[regex(r#""([^"\n]|"")*""#, parse_string)]
    Str(String),
    /// Variable, routine or type name.
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `DIM`
    #[token("dim", ignore(case))]
    Dim,
    /// `AS`
    #[token("as", ignore(case))]
    As,
    /// `PRINT`
    #[token("print", ignore(case))]
    Print,
    /// `IF`
    #[token("if", ignore(case))]
    If,
    /// `THEN`
    #[token("then", ignore(case))]
    Then,
    /// `ELSE`
    #[token("else", ignore(case))]
    Else,
    /// `ELSEIF`
    #[token("elseif", ignore(case))]
    ElseIf,
    /// `END`
    #[token("end", ignore(case))]
    End,
    /// `SELECT`
    #[token("select", ignore(case))]
    Select,
    /// `CASE`
    #[token("case", ignore(case))]
    Case,
    /// `TO`
    #[token("to", ignore(case))]
    To,
    /// `IS`
    #[token("is", ignore(case))]
    Is,
    /// `FOR`
    #[token("for", ignore(case))]
    For,
    /// `STEP`
    #[token("step", ignore(case))]
    Step,
    /// `NEXT`
    #[token("next", ignore(case))]
    Next,
    /// `CONTINUE`
    #[token("continue", ignore(case))]
    Continue,
    /// `WHILE`
    #[token("while", ignore(case))]
    While,
    /// `WEND`
    #[token("wend", ignore(case))]
    Wend,
    /// `DO`
    #[token("do", ignore(case))]
    Do,
    /// `LOOP`
    #[token("loop", ignore(case))]
    Loop,
    /// `UNTIL`
    #[token("until", ignore(case))]
    Until,
    /// `EXIT`
    #[token("exit", ignore(case))]
    Exit,
    /// `RETURN`
    #[token("return", ignore(case))]
    Return,
    /// `SUB`
    #[token("sub", ignore(case))]
    Sub,
    /// `FUNCTION`
    #[token("function", ignore(case))]
    Function,
    /// `AND`
    #[token("and", ignore(case))]
    And,
    /// `OR`
    #[token("or", ignore(case))]
    Or,
    /// `NOT`
    #[token("not", ignore(case))]
    Not,
    /// `MOD`
    #[token("mod", ignore(case))]
    Mod,
    /// `TRUE`
    #[token("true", ignore(case))]
    True,
    /// `FALSE`
    #[token("false", ignore(case))]
    False,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `=`
    #[token("=")]
    Equals,
    /// `<>`
    #[token("<>")]
    NotEquals,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `%`, the integer suffix.
    #[token("%")]
    Percent,
    /// `&`, the long suffix.
    #[token("&")]
    Ampersand,
    /// `!`, the single suffix.
    #[token("!")]
    Exclamation,
    /// `#`, the double suffix.
    #[token("#")]
    Hash,
    /// `$`, the string suffix.
    #[token("$")]
    Dollar,

    /// `' comment to end of line`
    #[regex(r"'[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Statement separator.
    #[token("\n", newline)]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,

    /// Produced by [`Lexer::next_token`] once the input is exhausted.
    EndOfInput,
}

impl Token {
    /// Human readable description used in diagnostics.
    ///
    /// ```
    /// use transbasic::frontend::lexer::Token;
    ///
    /// assert_eq!(Token::Wend.describe(), "'WEND'");
    /// assert_eq!(Token::Identifier("total".into()).describe(), "identifier 'total'");
    /// assert_eq!(Token::EndOfInput.describe(), "end of input");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Float(v) => format!("number {v}"),
            Self::Integer(v) => format!("number {v}"),
            Self::Str(s) => format!("string \"{s}\""),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::NewLine => "end of line".to_string(),
            Self::EndOfInput => "end of input".to_string(),
            other => format!("'{}'", other.spelling()),
        }
    }

    /// Fixed spelling of keywords and punctuation; empty for payload tokens.
    #[must_use]
    pub const fn spelling(&self) -> &'static str {
        match self {
            Self::Dim => "DIM",
            Self::As => "AS",
            Self::Print => "PRINT",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::ElseIf => "ELSEIF",
            Self::End => "END",
            Self::Select => "SELECT",
            Self::Case => "CASE",
            Self::To => "TO",
            Self::Is => "IS",
            Self::For => "FOR",
            Self::Step => "STEP",
            Self::Next => "NEXT",
            Self::Continue => "CONTINUE",
            Self::While => "WHILE",
            Self::Wend => "WEND",
            Self::Do => "DO",
            Self::Loop => "LOOP",
            Self::Until => "UNTIL",
            Self::Exit => "EXIT",
            Self::Return => "RETURN",
            Self::Sub => "SUB",
            Self::Function => "FUNCTION",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Mod => "MOD",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Percent => "%",
            Self::Ampersand => "&",
            Self::Exclamation => "!",
            Self::Hash => "#",
            Self::Dollar => "$",
            Self::NewLine => "\\n",
            Self::Float(_)
            | Self::Integer(_)
            | Self::Str(_)
            | Self::Identifier(_)
            | Self::Comment
            | Self::Ignored
            | Self::EndOfInput => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Additional information carried by the lexer during tokenization.
#[derive(Debug, Clone, Copy)]
pub struct LexerExtras {
    /// The current 1-based line number.
    pub line:       usize,
    /// Byte offset at which the current line starts.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// A 1-based line and column in the source. Columns count characters, not
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line, starting at 1.
    pub line:   usize,
    /// Column, starting at 1.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Where it starts.
    pub pos:   Position,
}

/// Pull-based token stream over one source buffer.
pub struct Lexer<'src> {
    inner:       logos::Lexer<'src, Token>,
    source_name: String,
    last:        Position,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`; `source_name` is used in diagnostics.
    #[must_use]
    pub fn new(source_name: impl Into<String>, source: &'src str) -> Self {
        Self { inner:       Token::lexer_with_extras(source, LexerExtras::default()),
               source_name: source_name.into(),
               last:        Position { line: 1, column: 1 }, }
    }

    /// Produces the next token, or [`Token::EndOfInput`] once the buffer is
    /// exhausted (repeatedly).
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidToken`] for input that forms no token and
    /// [`ParseError::IntegerOutOfRange`] for integer literals that do not fit
    /// in 64 bits.
    ///
    /// ```
    /// use transbasic::frontend::lexer::{Lexer, Token};
    ///
    /// let mut lexer = Lexer::new("inline", "Dim x AS integer");
    /// assert_eq!(lexer.next_token().unwrap().token, Token::Dim);
    /// assert_eq!(lexer.next_token().unwrap().token, Token::Identifier("x".into()));
    /// assert_eq!(lexer.next_token().unwrap().token, Token::As);
    /// let ty = lexer.next_token().unwrap();
    /// assert_eq!(ty.token, Token::Identifier("integer".into()));
    /// assert_eq!((ty.pos.line, ty.pos.column), (1, 10));
    /// assert_eq!(lexer.next_token().unwrap().token, Token::EndOfInput);
    /// ```
    pub fn next_token(&mut self) -> Result<Spanned, ParseError> {
        match self.inner.next() {
            Some(Ok(token)) => {
                let pos = self.token_position(&token);
                self.last = pos;
                tracing::trace!(%pos, token = %token, "lexed");
                Ok(Spanned { token, pos })
            },
            Some(Err(())) => {
                let pos = self.start_position();
                let text = self.inner.slice().to_string();
                if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseError::IntegerOutOfRange { text, pos });
                }
                Err(ParseError::InvalidToken { text, pos })
            },
            None => {
                let pos = self.start_position();
                self.last = pos;
                Ok(Spanned { token: Token::EndOfInput,
                             pos })
            },
        }
    }

    /// Name of the source being read.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Position of the most recently produced token.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.last
    }

    /// Source text of the most recently produced token.
    #[must_use]
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    fn start_position(&self) -> Position {
        let start = self.inner.span().start;
        let extras = self.inner.extras;
        Position { line:   extras.line,
                   column: column(self.inner.source(), extras.line_start, start), }
    }

    // The newline callback has already moved the line counters past the
    // separator, so its position is taken from the end of the previous line.
    fn token_position(&self, token: &Token) -> Position {
        if *token == Token::NewLine {
            let span = self.inner.span();
            let source = self.inner.source();
            let line_start = source[..span.start].rfind('\n').map_or(0, |i| i + 1);
            return Position { line:   self.inner.extras.line - 1,
                              column: column(source, line_start, span.start), };
        }
        self.start_position()
    }
}

fn column(source: &str, line_start: usize, offset: usize) -> usize {
    source.get(line_start..offset).map_or(0, |text| text.chars().count()) + 1
}

fn newline(lex: &mut logos::Lexer<Token>) -> Token {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    Token::NewLine
}

fn parse_float(lex: &logos::Lexer<Token>) -> Option<OrderedFloat<f64>> {
    lex.slice().parse().ok().map(OrderedFloat)
}

fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].replace("\"\"", "\"")
}
