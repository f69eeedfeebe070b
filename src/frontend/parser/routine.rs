use std::collections::HashSet;

use crate::{
    ast::{ExprNode, Parameter, ParameterList, RoutineKind},
    codegen::Generator,
    error::SemanticError,
    frontend::{
        lexer::{Position, Token},
        parser::{
            block::ROUTINE_BLOCK,
            core::{ParseResult, Parser, RoutineContext},
        },
        scope::{Insertion, Symbol},
    },
};

impl<G: Generator> Parser<'_, G> {
    /// Parses a `SUB` or `FUNCTION` definition.
    ///
    /// Grammar:
    /// ```text
    /// routine := "SUB" identifier [parameters] NEWLINE block "END" "SUB"
    ///          | "FUNCTION" identifier [parameters] "AS" type NEWLINE block "END" "FUNCTION"
    /// ```
    /// The routine is registered in the enclosing scope before its body is
    /// parsed, so the body may call it recursively. The body sees its
    /// parameters as locals, and loop and select nesting start over.
    pub(crate) fn parse_routine(&mut self) -> ParseResult<bool> {
        let (kind, closing, label) = match self.current.token {
            Token::Sub => (RoutineKind::Sub, Token::Sub, "sub"),
            Token::Function => (RoutineKind::Function, Token::Function, "function"),
            _ => return Ok(false),
        };
        self.advance()?;
        let (name, pos) = self.expect_identifier("a routine name")?;
        let parameters = self.parse_parameter_list()?;
        let return_type = match kind {
            RoutineKind::Function => {
                self.expect(&Token::As)?;
                self.parse_type_name()?
            },
            RoutineKind::Sub => String::new(),
        };

        let symbol = Symbol::callable(&name, &return_type, parameters.clone());
        if let Insertion::Exists(_) = self.scopes.insert(symbol) {
            return Err(SemanticError::Redeclaration { name, pos }.into());
        }

        let signature = Parameter::new(&name, &return_type);
        self.generator.function(&signature, &parameters);
        self.generator.begin_code_block();

        let saved = std::mem::take(&mut self.nesting);
        self.routines.push(RoutineContext { name,
                                            kind,
                                            return_type });
        self.scopes.enter(label);
        for parameter in &parameters {
            let local = Symbol::variable(&parameter.identifier, &parameter.datatype);
            if let Insertion::Exists(_) = self.scopes.insert(local) {
                return Err(SemanticError::Redeclaration { name: parameter.identifier.clone(),
                                                          pos }.into());
            }
        }
        self.parse_block(ROUTINE_BLOCK)?;
        self.scopes.exit();
        self.routines.pop();
        self.nesting = saved;

        self.expect(&Token::End)?;
        self.expect(&closing)?;
        self.generator.end_code_block();
        self.generator.end_function();
        Ok(true)
    }

    /// Parses an optional parenthesized parameter list.
    ///
    /// Grammar: `parameters := "(" [identifier annotation ("," identifier annotation)*] ")"`
    ///
    /// Every parameter needs a type, either as a suffix or with `AS`.
    fn parse_parameter_list(&mut self) -> ParseResult<ParameterList> {
        if !self.accept(&Token::LParen)? {
            return Ok(Vec::new());
        }
        if self.accept(&Token::RParen)? {
            return Ok(Vec::new());
        }
        let mut seen = HashSet::new();
        let parameters = self.parse_comma_list(|parser| {
                                 let (name, pos) = parser.expect_identifier("a parameter name")?;
                                 let Some(datatype) = parser.parse_type_annotation()? else {
                                     return Err(parser.unexpected("AS"));
                                 };
                                 if !seen.insert(name.clone()) {
                                     return Err(SemanticError::Redeclaration { name, pos }.into());
                                 }
                                 Ok(Parameter::new(name, datatype))
                             })?;
        self.expect(&Token::RParen)?;
        Ok(parameters)
    }

    /// Parses `"(" [expression ("," expression)*] ")"`.
    ///
    /// Each argument is parsed as a value stored into the parameter at its
    /// position.
    pub(crate) fn parse_arguments(&mut self,
                                  parameters: &[Parameter])
                                  -> ParseResult<Vec<ExprNode>> {
        self.expect(&Token::LParen)?;
        if self.accept(&Token::RParen)? {
            return Ok(Vec::new());
        }
        let mut arguments = Vec::new();
        loop {
            let target = parameters.get(arguments.len())
                                   .map(|p| p.datatype.as_str())
                                   .unwrap_or_default();
            arguments.push(self.parse_expression_for(target)?);
            if !self.accept(&Token::Comma)? {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(arguments)
    }

    /// Parses an argument list if one follows; a bare routine name calls it
    /// without arguments.
    pub(crate) fn parse_optional_arguments(&mut self,
                                           parameters: &[Parameter])
                                           -> ParseResult<Vec<ExprNode>> {
        if self.check(&Token::LParen) {
            return self.parse_arguments(parameters);
        }
        Ok(Vec::new())
    }

    /// Checks a call against the callee's parameters: the count must match
    /// and each argument's type must equal its parameter's type.
    pub(crate) fn check_call(&self,
                             name: &str,
                             parameters: &[Parameter],
                             arguments: &[ExprNode],
                             pos: Position)
                             -> ParseResult<()> {
        if parameters.len() != arguments.len() {
            return Err(SemanticError::ArityMismatch { name: name.to_string(),
                                                      expected: parameters.len(),
                                                      found: arguments.len(),
                                                      pos }.into());
        }
        for (index, (parameter, argument)) in parameters.iter().zip(arguments).enumerate() {
            if !parameter.datatype.eq_ignore_ascii_case(&argument.datatype) {
                return Err(SemanticError::ArgumentTypeMismatch { name: name.to_string(),
                                                                 position: index + 1,
                                                                 expected:
                                                                     parameter.datatype.clone(),
                                                                 found: argument.datatype.clone(),
                                                                 pos }.into());
            }
        }
        Ok(())
    }
}
