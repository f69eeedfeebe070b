use crate::{
    ast::ExprNode,
    codegen::Generator,
    frontend::{
        config::Resolution,
        expression,
        parser::core::{ParseResult, Parser},
    },
};

impl<G: Generator> Parser<'_, G> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It starts at the
    /// loosest level of the configured precedence table.
    ///
    /// Grammar: `expression := level(0)`
    pub(crate) fn parse_expression(&mut self) -> ParseResult<ExprNode> {
        self.parse_level(0)
    }

    /// Parses an expression whose value is stored into a place of type
    /// `target`: a variable, a return value or a parameter.
    ///
    /// Numeric literals inside it widen to `target` when it outranks them.
    pub(crate) fn parse_expression_for(&mut self, target: &str) -> ParseResult<ExprNode> {
        let outer = self.target.replace(target.to_string());
        let value = self.parse_expression();
        self.target = outer;
        value
    }

    /// Parses one precedence level.
    ///
    /// Recurses to the next tighter level for each operand, so operators of
    /// the same level associate to the left. Past the tightest level the
    /// parse continues with prefix operators and primaries.
    ///
    /// Grammar: `level(n) := level(n + 1) (op(n) level(n + 1))*`
    ///
    /// Every node is typed as soon as it is built, using the level's
    /// [`Resolution`].
    pub(crate) fn parse_level(&mut self, level: usize) -> ParseResult<ExprNode> {
        let Some(resolution) = self.config.precedence.level(level).map(|l| l.resolution) else {
            return self.parse_unary();
        };

        let mut left = self.parse_level(level + 1)?;
        while let Some(op) = self.config
                                 .precedence
                                 .level(level)
                                 .and_then(|l| l.operator_for(&self.current.token))
        {
            let pos = self.advance()?.pos;
            let right = self.parse_level(level + 1)?;
            left = expression::binary(op, left, right, resolution, &self.types, pos)?;
        }
        Ok(left)
    }

    /// Index of the loosest comparison level, which bounds the operand of
    /// `NOT`.
    pub(crate) fn comparison_level(&self) -> Option<usize> {
        self.config
            .precedence
            .levels()
            .iter()
            .position(|level| level.resolution == Resolution::Comparison)
    }
}
