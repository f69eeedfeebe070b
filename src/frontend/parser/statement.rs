use crate::{
    ast::{ExitKind, ExprNode, LoopKind, Parameter, RoutineKind},
    codegen::Generator,
    error::SemanticError,
    frontend::{
        lexer::{Position, Token},
        parser::core::{ParseResult, Parser},
        scope::{Insertion, Symbol},
        types::Assignability,
    },
};

impl<G: Generator> Parser<'_, G> {
    /// Parses a declaration statement.
    ///
    /// Grammar: `dim := "DIM" item ("," item)*`
    /// `item := identifier annotation ["=" expression]`
    ///
    /// Each item declares one symbol in the innermost scope and emits one
    /// declaration event. The initializer is parsed before the symbol
    /// exists, so it cannot refer to the variable being declared.
    pub(crate) fn parse_dim(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::Dim)? {
            return Ok(false);
        }
        self.parse_comma_list(Self::parse_declaration_item)?;
        Ok(true)
    }

    fn parse_declaration_item(&mut self) -> ParseResult<()> {
        let (name, pos) = self.expect_identifier("a variable name")?;
        let declared = self.parse_type_annotation()?.unwrap_or_default();
        let initializer = if self.accept(&Token::Equals)? {
            let value_pos = self.pos();
            Some((self.parse_expression_for(&declared)?, value_pos))
        } else {
            None
        };

        if let Insertion::Exists(_) = self.scopes.insert(Symbol::variable(&name, &declared)) {
            return Err(SemanticError::Redeclaration { name, pos }.into());
        }

        let mut variable = Parameter::new(name, declared);
        if let Some((value, value_pos)) = &initializer {
            variable.datatype = self.check_assignment(&variable.identifier, value, *value_pos)?;
        }
        self.generator
            .declaration(&variable, initializer.as_ref().map(|(value, _)| value));
        self.generator.end_of_statement();
        Ok(())
    }

    /// Applies the assignment rule to storing `value` into `target` and
    /// returns the target's type afterwards.
    ///
    /// An unresolved target takes the value's type permanently.
    pub(crate) fn check_assignment(&mut self,
                                   target: &str,
                                   value: &ExprNode,
                                   pos: Position)
                                   -> ParseResult<String> {
        let verdict = match self.scopes.lookup(target) {
            Some(symbol) => self.types.assignability(&symbol.datatype, &value.datatype),
            None => {
                return Err(SemanticError::UnknownIdentifier { name: target.to_string(),
                                                              pos }.into());
            },
        };
        let Some(symbol) = self.scopes.lookup_mut(target) else {
            return Err(SemanticError::UnknownIdentifier { name: target.to_string(),
                                                          pos }.into());
        };
        match verdict {
            Assignability::Accept => Ok(symbol.datatype.clone()),
            Assignability::Infer => {
                symbol.datatype.clone_from(&value.datatype);
                tracing::debug!(identifier = target, datatype = %value.datatype, "inferred type");
                Ok(symbol.datatype.clone())
            },
            Assignability::Reject => Err(SemanticError::TypeMismatch { expected: symbol.datatype
                                                                                   .clone(),
                                                                       found: value.datatype
                                                                                   .clone(),
                                                                       pos }.into()),
        }
    }

    /// Parses a statement that starts with an identifier: an assignment or a
    /// call.
    ///
    /// Grammar: `identifier_statement := identifier ("=" expression | [arguments])`
    pub(crate) fn parse_identifier_statement(&mut self) -> ParseResult<bool> {
        let Token::Identifier(name) = &self.current.token else {
            return Ok(false);
        };
        let name = name.clone();
        let pos = self.advance()?.pos;

        let (datatype, parameters) = match self.scopes.lookup(&name) {
            Some(symbol) => (symbol.datatype.clone(), symbol.parameters.clone()),
            None => return Err(SemanticError::UnknownIdentifier { name, pos }.into()),
        };

        if self.check(&Token::Equals) {
            if parameters.is_some() {
                return Err(SemanticError::NotAVariable { name, pos }.into());
            }
            self.advance()?;
            let value_pos = self.pos();
            let value = self.parse_expression_for(&datatype)?;
            self.check_assignment(&name, &value, value_pos)?;
            self.generator.assignment(&name);
            self.generator.expression(&value);
            self.generator.end_of_statement();
            return Ok(true);
        }

        let Some(parameters) = parameters else {
            return Err(SemanticError::NotCallable { name, pos }.into());
        };
        let arguments = self.parse_optional_arguments(&parameters)?;
        self.check_call(&name, &parameters, &arguments, pos)?;
        self.generator.call(&name, &arguments);
        self.generator.end_of_statement();
        Ok(true)
    }

    /// Parses an output statement.
    ///
    /// Grammar: `print := "PRINT" [expression (("," | ";") expression)* [";" | ","]]`
    pub(crate) fn parse_print(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::Print)? {
            return Ok(false);
        }
        let mut items = Vec::new();
        if !self.at_statement_end() {
            items.push(self.parse_expression()?);
            while self.accept(&Token::Comma)? || self.accept(&Token::Semicolon)? {
                if self.at_statement_end() {
                    break;
                }
                items.push(self.parse_expression()?);
            }
        }
        self.generator.print(&items);
        self.generator.end_of_statement();
        Ok(true)
    }

    /// Parses `EXIT FOR|WHILE|DO|SELECT|FUNCTION|SUB`.
    pub(crate) fn parse_exit(&mut self) -> ParseResult<bool> {
        if !self.check(&Token::Exit) {
            return Ok(false);
        }
        let pos = self.advance()?.pos;
        let kind = match self.current.token {
            Token::For => ExitKind::Loop(LoopKind::For),
            Token::While => ExitKind::Loop(LoopKind::While),
            Token::Do => ExitKind::Loop(LoopKind::Do),
            Token::Select => ExitKind::Select,
            Token::Function => ExitKind::Function,
            Token::Sub => ExitKind::Sub,
            _ => return Err(self.unexpected("FOR, WHILE, DO, SELECT, FUNCTION or SUB")),
        };
        self.advance()?;

        if self.exit_applies(kind) {
            self.generator.exit(kind);
            self.generator.end_of_statement();
        } else {
            self.misplaced(SemanticError::misplaced_exit(kind, pos))?;
        }
        Ok(true)
    }

    /// Parses `CONTINUE FOR|WHILE|DO`.
    pub(crate) fn parse_continue(&mut self) -> ParseResult<bool> {
        if !self.check(&Token::Continue) {
            return Ok(false);
        }
        let pos = self.advance()?.pos;
        let kind = match self.current.token {
            Token::For => LoopKind::For,
            Token::While => LoopKind::While,
            Token::Do => LoopKind::Do,
            _ => return Err(self.unexpected("FOR, WHILE or DO")),
        };
        self.advance()?;

        if self.nesting.encloses(kind) {
            self.generator.continue_loop(kind);
            self.generator.end_of_statement();
        } else {
            let statement = format!("CONTINUE {}", ExitKind::Loop(kind));
            self.misplaced(SemanticError::MisplacedExit { statement, pos })?;
        }
        Ok(true)
    }

    /// Parses `RETURN [expression]`.
    ///
    /// A `FUNCTION` must return a value its return type accepts; a `SUB`
    /// must not return one.
    pub(crate) fn parse_return(&mut self) -> ParseResult<bool> {
        if !self.check(&Token::Return) {
            return Ok(false);
        }
        let pos = self.advance()?.pos;
        let value_pos = self.pos();
        let return_type = self.current_routine()
                              .map(|r| r.return_type.clone())
                              .unwrap_or_default();
        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression_for(&return_type)?)
        };

        let Some(routine) = self.current_routine() else {
            return self.misplaced(SemanticError::MisplacedExit { statement: "RETURN".to_string(),
                                                                 pos })
                       .map(|()| true);
        };

        match (routine.kind, &value) {
            (RoutineKind::Function, Some(value)) => {
                if self.types.assignability(&routine.return_type, &value.datatype)
                   != Assignability::Accept
                {
                    return Err(SemanticError::TypeMismatch { expected: routine.return_type
                                                                              .clone(),
                                                             found:    value.datatype.clone(),
                                                             pos:      value_pos, }.into());
                }
            },
            (RoutineKind::Sub, None) => {},
            (kind, _) => {
                return Err(SemanticError::ReturnValueMismatch { name: routine.name.clone(),
                                                                expects: kind
                                                                         == RoutineKind::Function,
                                                                pos }.into());
            },
        }

        self.generator.return_value(value.as_ref());
        self.generator.end_of_statement();
        Ok(true)
    }

    /// Reports a misplaced `EXIT`, `CONTINUE` or `RETURN`, or drops it when
    /// the parser is lenient.
    fn misplaced(&self, error: SemanticError) -> ParseResult<()> {
        if self.config.strict_exits {
            return Err(error.into());
        }
        tracing::debug!(%error, "ignored statement");
        Ok(())
    }
}
