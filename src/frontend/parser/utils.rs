use crate::{
    codegen::Generator,
    error::SemanticError,
    frontend::{
        lexer::Token,
        parser::core::{ParseResult, Parser},
        types,
    },
};

/// Maps a declaration suffix to the type it stands for.
///
/// ```
/// use transbasic::frontend::{lexer::Token, parser::utils::suffix_type};
///
/// assert_eq!(suffix_type(&Token::Percent), Some("integer"));
/// assert_eq!(suffix_type(&Token::Dollar), Some("string"));
/// assert_eq!(suffix_type(&Token::Plus), None);
/// ```
#[must_use]
pub const fn suffix_type(token: &Token) -> Option<&'static str> {
    match token {
        Token::Percent => Some(types::INTEGER),
        Token::Ampersand => Some(types::LONG),
        Token::Exclamation => Some(types::SINGLE),
        Token::Hash => Some(types::DOUBLE),
        Token::Dollar => Some(types::STRING),
        _ => None,
    }
}

impl<G: Generator> Parser<'_, G> {
    pub(crate) fn skip_newlines(&mut self) -> ParseResult<()> {
        while self.check(&Token::NewLine) {
            self.advance()?;
        }
        Ok(())
    }

    /// Returns `true` where an optional trailing operand is absent: at a line
    /// break, the end of input, or the `ELSE` of a single-line `IF`.
    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(self.current.token, Token::NewLine | Token::EndOfInput | Token::Else)
    }

    /// Parses a datatype name and returns its canonical (lowercase) form.
    ///
    /// # Errors
    /// [`SemanticError::UnknownType`] when the registry does not know it.
    pub(crate) fn parse_type_name(&mut self) -> ParseResult<String> {
        let (name, pos) = self.expect_identifier("a datatype name")?;
        match self.types.lookup(&name) {
            Some(ty) => Ok(ty.name.clone()),
            None => Err(SemanticError::UnknownType { name, pos }.into()),
        }
    }

    /// Parses an optional type suffix or `AS type`.
    ///
    /// Grammar: `annotation := suffix | "AS" type | <nothing>`
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult<Option<String>> {
        if let Some(datatype) = suffix_type(&self.current.token) {
            self.advance()?;
            return Ok(Some(datatype.to_string()));
        }
        if self.accept(&Token::As)? {
            return Ok(Some(self.parse_type_name()?));
        }
        Ok(None)
    }

    /// Parses `item ("," item)*`.
    pub(crate) fn parse_comma_list<T>(&mut self,
                                      mut item: impl FnMut(&mut Self) -> ParseResult<T>)
                                      -> ParseResult<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.accept(&Token::Comma)? {
            items.push(item(self)?);
        }
        Ok(items)
    }
}
