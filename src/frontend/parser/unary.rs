use crate::{
    ast::{ExprKind, ExprNode, UnaryOperator},
    codegen::Generator,
    error::SemanticError,
    frontend::{
        expression,
        lexer::Token,
        parser::core::{ParseResult, Parser},
    },
};

impl<G: Generator> Parser<'_, G> {
    /// Parses prefix operators.
    ///
    /// `-` applies to the unary expression that follows. `NOT` applies to a
    /// whole comparison, so `NOT a = b` negates `a = b`.
    ///
    /// Grammar: `unary := "-" unary | "NOT" level(comparison) | primary`
    pub(crate) fn parse_unary(&mut self) -> ParseResult<ExprNode> {
        match self.current.token {
            Token::Minus => {
                let pos = self.advance()?.pos;
                let operand = self.parse_unary()?;
                Ok(expression::unary(UnaryOperator::Negate, operand, &self.types, pos)?)
            },
            Token::Not => {
                let pos = self.advance()?.pos;
                let operand = match self.comparison_level() {
                    Some(level) => self.parse_level(level)?,
                    None => self.parse_unary()?,
                };
                Ok(expression::unary(UnaryOperator::Not, operand, &self.types, pos)?)
            },
            _ => self.parse_primary(),
        }
    }

    /// Parses literals, parenthesized expressions, variable references and
    /// function calls.
    ///
    /// Grammar:
    /// `primary := literal | "(" expression ")" | identifier [arguments]`
    pub(crate) fn parse_primary(&mut self) -> ParseResult<ExprNode> {
        let node = match &self.current.token {
            Token::Integer(v) => expression::integer(*v),
            Token::Float(v) => expression::float(v.into_inner()),
            Token::Str(s) => expression::string(s),
            Token::True => expression::boolean(true),
            Token::False => expression::boolean(false),
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                return Ok(inner);
            },
            Token::Identifier(name) => {
                let name = name.clone();
                return self.parse_reference(name);
            },
            _ => return Err(self.unexpected("an expression")),
        };
        self.advance()?;
        Ok(self.widen_literal(node))
    }

    /// Gives a numeric literal the type of the current store target when
    /// that type has the higher rank.
    fn widen_literal(&self, mut node: ExprNode) -> ExprNode {
        if !matches!(node.kind, ExprKind::Integer(_) | ExprKind::Float(_)) {
            return node;
        }
        if let Some(target) = &self.target
           && self.types.is_numeric(target)
           && self.types.rank(target) > self.types.rank(&node.datatype)
        {
            node.datatype.clone_from(target);
        }
        node
    }

    /// Resolves an identifier in expression position.
    ///
    /// A variable must already have a type. A routine must have a return
    /// type and its arguments must match its parameters.
    fn parse_reference(&mut self, name: String) -> ParseResult<ExprNode> {
        let pos = self.advance()?.pos;
        let (datatype, parameters) = match self.scopes.lookup(&name) {
            Some(symbol) => (symbol.datatype.clone(), symbol.parameters.clone()),
            None => return Err(SemanticError::UnknownIdentifier { name, pos }.into()),
        };

        let Some(parameters) = parameters else {
            if datatype.is_empty() {
                return Err(SemanticError::UnresolvedType { name, pos }.into());
            }
            return Ok(ExprNode::new(ExprKind::Identifier(name), datatype));
        };

        if datatype.is_empty() {
            return Err(SemanticError::NoReturnValue { name, pos }.into());
        }
        let arguments = self.parse_optional_arguments(&parameters)?;
        self.check_call(&name, &parameters, &arguments, pos)?;
        Ok(ExprNode::new(ExprKind::Call { name, arguments }, datatype))
    }
}
