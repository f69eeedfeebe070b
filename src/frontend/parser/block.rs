use crate::{
    codegen::Generator,
    frontend::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

/// Tokens that close the branches of a block `IF`.
pub const IF_BLOCK: &[Token] = &[Token::End, Token::ElseIf, Token::Else];
/// Tokens that close the body of one `CASE` clause.
pub const CASE_BLOCK: &[Token] = &[Token::Case, Token::End];
/// Token that closes a `FOR` body.
pub const FOR_BLOCK: &[Token] = &[Token::Next];
/// Token that closes a `WHILE` body.
pub const WHILE_BLOCK: &[Token] = &[Token::Wend];
/// Token that closes a `DO` body.
pub const DO_BLOCK: &[Token] = &[Token::Loop];
/// Token that closes a `SUB` or `FUNCTION` body.
pub const ROUTINE_BLOCK: &[Token] = &[Token::End];

impl<G: Generator> Parser<'_, G> {
    /// Parses statements until one of `terminators` or the end of input.
    ///
    /// The terminator is left unconsumed for the caller, which decides
    /// whether it is legal there. Every statement must be followed by a line
    /// break, the end of input or a terminator.
    ///
    /// Grammar: `block := (NEWLINE* statement (NEWLINE | EOF | terminator))*`
    pub(crate) fn parse_block(&mut self, terminators: &[Token]) -> ParseResult<()> {
        loop {
            self.skip_newlines()?;
            if self.check(&Token::EndOfInput) || self.check_any(terminators) {
                return Ok(());
            }

            if !self.parse_statement()? {
                return Err(self.unexpected("a statement"));
            }

            match self.current.token {
                Token::NewLine => {
                    self.advance()?;
                },
                Token::EndOfInput => return Ok(()),
                _ if self.check_any(terminators) => return Ok(()),
                _ => return Err(self.unexpected("end of line")),
            }
        }
    }

    /// Tries each statement production in a fixed order.
    ///
    /// Every production is a no-op returning `false` when the current token
    /// does not start it.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<bool> {
        Ok(self.parse_dim()?
           || self.parse_identifier_statement()?
           || self.parse_print()?
           || self.parse_exit()?
           || self.parse_continue()?
           || self.parse_return()?
           || self.parse_if()?
           || self.parse_select()?
           || self.parse_for()?
           || self.parse_while()?
           || self.parse_do()?
           || self.parse_routine()?)
    }
}
