use crate::{
    ast::{
        BranchForm, CaseExpression, ConditionKind, ExprNode, LoopCondition, LoopKind, Parameter,
    },
    codegen::Generator,
    error::{ParseError, SemanticError},
    frontend::{
        expression,
        lexer::Token,
        parser::{
            block::{CASE_BLOCK, DO_BLOCK, FOR_BLOCK, IF_BLOCK, WHILE_BLOCK},
            core::{ParseResult, Parser},
        },
        scope::{Insertion, Symbol},
    },
};

impl<G: Generator> Parser<'_, G> {
    /// Parses a condition for `IF`, `ELSEIF`, `WHILE` or `DO`.
    pub(crate) fn parse_condition(&mut self) -> ParseResult<ExprNode> {
        let pos = self.pos();
        let condition = self.parse_expression()?;
        expression::check_condition(&condition, &self.types, pos)?;
        Ok(condition)
    }

    /// Parses an `IF` statement in either form.
    ///
    /// Grammar:
    /// ```text
    /// if := "IF" condition "THEN" NEWLINE block
    ///       ("ELSEIF" condition "THEN" block)*
    ///       ["ELSE" block]
    ///       "END" "IF"
    ///     | "IF" condition "THEN" statement ["ELSE" statement]
    /// ```
    /// A line break after `THEN` selects the block form. Every block branch
    /// gets its own scope; single-line branches open none.
    pub(crate) fn parse_if(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::If)? {
            return Ok(false);
        }
        let condition = self.parse_condition()?;
        self.expect(&Token::Then)?;
        let form = if self.check(&Token::NewLine) {
            BranchForm::Block
        } else {
            BranchForm::SingleLine
        };

        self.generator.if_begin(&condition, form);
        self.generator.begin_code_block();
        self.parse_branch(form, "if")?;

        while form == BranchForm::Block && self.accept(&Token::ElseIf)? {
            let condition = self.parse_condition()?;
            self.expect(&Token::Then)?;
            self.generator.else_if(&condition);
            self.parse_branch(form, "elseif")?;
        }
        if self.accept(&Token::Else)? {
            self.generator.else_branch();
            self.parse_branch(form, "else")?;
        }
        if form == BranchForm::Block {
            self.expect(&Token::End)?;
            self.expect(&Token::If)?;
        }

        self.generator.end_code_block();
        Ok(true)
    }

    fn parse_branch(&mut self, form: BranchForm, label: &str) -> ParseResult<()> {
        match form {
            BranchForm::Block => {
                self.scopes.enter(label);
                self.parse_block(IF_BLOCK)?;
                self.scopes.exit();
            },
            BranchForm::SingleLine => {
                if !self.parse_statement()? {
                    return Err(self.unexpected("a statement"));
                }
            },
        }
        Ok(())
    }

    /// Parses a `SELECT CASE` statement.
    ///
    /// Grammar:
    /// ```text
    /// select := "SELECT" "CASE" expression NEWLINE
    ///           ("CASE" case_item ("," case_item)* block)*
    ///           ["CASE" "ELSE" block]
    ///           "END" "SELECT"
    /// case_item := expression ["TO" expression] | "IS" comparison expression
    /// ```
    /// Every item must be comparable with the subject. Each clause body has
    /// its own scope.
    pub(crate) fn parse_select(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::Select)? {
            return Ok(false);
        }
        self.expect(&Token::Case)?;
        let subject = self.parse_expression()?;
        if !self.at_statement_end() || self.check(&Token::Else) {
            return Err(self.unexpected("end of line"));
        }

        self.generator.select(&subject);
        self.nesting.selects += 1;
        let mut has_else = false;
        loop {
            self.skip_newlines()?;
            if self.check(&Token::End) {
                break;
            }
            let pos = self.expect(&Token::Case)?;
            if has_else {
                return Err(ParseError::UnexpectedToken { found:    Token::Case.describe(),
                                                         expected: "END SELECT after CASE ELSE"
                                                                   .to_string(),
                                                         pos }.into());
            }
            if self.accept(&Token::Else)? {
                has_else = true;
                self.generator.case_else();
            } else {
                let items = self.parse_comma_list(|parser| parser.parse_case_item(&subject))?;
                self.generator.case(&items);
            }

            self.generator.begin_code_block();
            self.scopes.enter("case");
            self.parse_block(CASE_BLOCK)?;
            self.scopes.exit();
            self.generator.end_code_block();
        }
        self.expect(&Token::End)?;
        self.expect(&Token::Select)?;
        self.nesting.selects -= 1;
        self.generator.end_select();
        Ok(true)
    }

    fn parse_case_item(&mut self, subject: &ExprNode) -> ParseResult<CaseExpression> {
        if self.accept(&Token::Is)? {
            let comparator = match self.config.precedence.find(&self.current.token) {
                Some((_, op)) if op.is_comparison() => op,
                _ => return Err(self.unexpected("a comparison operator")),
            };
            self.advance()?;
            let value = self.parse_comparable(subject)?;
            return Ok(CaseExpression::Is { comparator, value });
        }

        let value = self.parse_comparable(subject)?;
        if self.accept(&Token::To)? {
            let high = self.parse_comparable(subject)?;
            return Ok(CaseExpression::Range { low: value, high });
        }
        Ok(CaseExpression::Value(value))
    }

    fn parse_comparable(&mut self, subject: &ExprNode) -> ParseResult<ExprNode> {
        let pos = self.pos();
        let value = self.parse_expression()?;
        if !self.types.comparable(&subject.datatype, &value.datatype) {
            return Err(SemanticError::IncomparableOperands { left: subject.datatype.clone(),
                                                             right: value.datatype,
                                                             pos }.into());
        }
        Ok(value)
    }

    /// Parses a counted loop.
    ///
    /// Grammar: `for := "FOR" identifier "=" expression "TO" expression ["STEP" expression]
    /// NEWLINE block "NEXT" [identifier]`
    ///
    /// A counter that is not declared yet is declared in the loop's scope
    /// with the type of the start value. A declared counter without a type
    /// takes the start value's type, as with its first assignment.
    pub(crate) fn parse_for(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::For)? {
            return Ok(false);
        }
        let (name, pos) = self.expect_identifier("a loop counter")?;
        self.expect(&Token::Equals)?;
        let start = self.parse_numeric()?;
        self.expect(&Token::To)?;
        let end = self.parse_numeric()?;
        let step = if self.accept(&Token::Step)? {
            Some(self.parse_numeric()?)
        } else {
            None
        };

        let existing = self.scopes
                           .lookup(&name)
                           .map(|symbol| (symbol.is_callable(), symbol.datatype.clone()));
        let existing = match existing {
            Some((true, _)) => return Err(SemanticError::NotAVariable { name, pos }.into()),
            Some((false, datatype)) if datatype.is_empty() => {
                Some(self.check_assignment(&name, &start, pos)?)
            },
            Some((false, datatype)) => Some(datatype),
            None => None,
        };
        self.scopes.enter("for");
        let (counter, declares_counter) = match existing {
            Some(datatype) => {
                if !self.types.is_numeric(&datatype) {
                    return Err(SemanticError::TypeMismatch { expected: "a numeric type".into(),
                                                             found: datatype,
                                                             pos }.into());
                }
                (Parameter::new(name, datatype), false)
            },
            None => {
                if let Insertion::Exists(_) =
                    self.scopes.insert(Symbol::variable(&name, &start.datatype))
                {
                    return Err(SemanticError::Redeclaration { name, pos }.into());
                }
                (Parameter::new(name, start.datatype.clone()), true)
            },
        };

        self.generator
            .for_loop(&counter, declares_counter, &start, &end, step.as_ref());
        self.generator.begin_code_block();
        self.parse_loop_body(LoopKind::For, FOR_BLOCK)?;
        self.expect(&Token::Next)?;
        if let Token::Identifier(found) = &self.current.token {
            if *found != counter.identifier {
                return Err(ParseError::MismatchedNext { expected: counter.identifier,
                                                        found:    found.clone(),
                                                        pos:      self.pos(), }.into());
            }
            self.advance()?;
        }
        self.scopes.exit();
        self.generator.end_code_block();
        Ok(true)
    }

    fn parse_numeric(&mut self) -> ParseResult<ExprNode> {
        let pos = self.pos();
        let value = self.parse_expression()?;
        if !self.types.is_numeric(&value.datatype) {
            return Err(SemanticError::TypeMismatch { expected: "a numeric type".into(),
                                                     found: value.datatype,
                                                     pos }.into());
        }
        Ok(value)
    }

    /// Parses a loop body with the loop counted as open. Nested scope
    /// handling is left to the caller.
    fn parse_loop_body(&mut self, kind: LoopKind, terminators: &[Token]) -> ParseResult<()> {
        *self.nesting.loops(kind) += 1;
        self.parse_block(terminators)?;
        *self.nesting.loops(kind) -= 1;
        Ok(())
    }

    /// Parses a pre-tested loop.
    ///
    /// Grammar: `while := "WHILE" condition NEWLINE block "WEND"`
    pub(crate) fn parse_while(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::While)? {
            return Ok(false);
        }
        let condition = self.parse_condition()?;
        self.generator.while_loop(&condition);
        self.generator.begin_code_block();
        self.scopes.enter("while");
        self.parse_loop_body(LoopKind::While, WHILE_BLOCK)?;
        self.scopes.exit();
        self.expect(&Token::Wend)?;
        self.generator.end_code_block();
        Ok(true)
    }

    /// Parses a `DO` loop.
    ///
    /// Grammar: `do := "DO" [loop_condition] NEWLINE block "LOOP" [loop_condition]`
    /// `loop_condition := ("WHILE" | "UNTIL") condition`
    ///
    /// The condition may be attached to either end but not to both.
    pub(crate) fn parse_do(&mut self) -> ParseResult<bool> {
        if !self.accept(&Token::Do)? {
            return Ok(false);
        }
        let leading = self.parse_loop_condition()?;
        self.generator.do_loop(leading.as_ref());
        self.generator.begin_code_block();
        self.scopes.enter("do");
        self.parse_loop_body(LoopKind::Do, DO_BLOCK)?;
        self.scopes.exit();
        self.expect(&Token::Loop)?;
        if leading.is_some() && (self.check(&Token::While) || self.check(&Token::Until)) {
            return Err(self.unexpected("end of line"));
        }
        let trailing = self.parse_loop_condition()?;
        self.generator.end_code_block();
        self.generator.loop_end(trailing.as_ref());
        Ok(true)
    }

    fn parse_loop_condition(&mut self) -> ParseResult<Option<LoopCondition>> {
        let kind = match self.current.token {
            Token::While => ConditionKind::While,
            Token::Until => ConditionKind::Until,
            _ => return Ok(None),
        };
        self.advance()?;
        let expression = self.parse_condition()?;
        Ok(Some(LoopCondition { kind, expression }))
    }
}
