use crate::{ast::BinaryOperator, frontend::lexer::Token};

/// How the result type of an operator level is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Numeric promotion with cast insertion.
    Arithmetic,
    /// Boolean result, no casts.
    Comparison,
    /// Boolean operands, boolean result.
    Logical,
}

/// Operators sharing one precedence level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceLevel {
    /// Token that spells each operator of the level.
    pub operators:  Vec<(Token, BinaryOperator)>,
    /// Type rule applied to nodes built at this level.
    pub resolution: Resolution,
}

impl PrecedenceLevel {
    #[must_use]
    pub fn new(resolution: Resolution, operators: &[(Token, BinaryOperator)]) -> Self {
        Self { operators: operators.to_vec(),
               resolution }
    }

    /// The operator `token` denotes at this level, if any.
    #[must_use]
    pub fn operator_for(&self, token: &Token) -> Option<BinaryOperator> {
        self.operators
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, op)| *op)
    }
}

/// Binary operator levels ordered from loosest to tightest binding.
///
/// ```
/// use transbasic::{
///     ast::BinaryOperator,
///     frontend::{config::PrecedenceTable, lexer::Token},
/// };
///
/// let table = PrecedenceTable::default();
/// let (level, op) = table.find(&Token::Star).unwrap();
/// assert_eq!(op, BinaryOperator::Mul);
/// assert_eq!(level, table.levels().len() - 1);
/// assert!(table.find(&Token::Comma).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    levels: Vec<PrecedenceLevel>,
}

impl PrecedenceTable {
    #[must_use]
    pub const fn new(levels: Vec<PrecedenceLevel>) -> Self {
        Self { levels }
    }

    #[must_use]
    pub fn levels(&self) -> &[PrecedenceLevel] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, index: usize) -> Option<&PrecedenceLevel> {
        self.levels.get(index)
    }

    /// Returns a copy with `level` inserted at `index`, shifting tighter
    /// levels down.
    #[must_use]
    pub fn with_level(mut self, index: usize, level: PrecedenceLevel) -> Self {
        let index = index.min(self.levels.len());
        self.levels.insert(index, level);
        self
    }

    /// Finds the level and operator `token` stands for.
    #[must_use]
    pub fn find(&self, token: &Token) -> Option<(usize, BinaryOperator)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(i, level)| level.operator_for(token).map(|op| (i, op)))
    }
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        Self::new(vec![PrecedenceLevel::new(Resolution::Logical,
                                            &[(Token::Or, BinaryOperator::Or)]),
                       PrecedenceLevel::new(Resolution::Logical,
                                            &[(Token::And, BinaryOperator::And)]),
                       PrecedenceLevel::new(Resolution::Comparison,
                                            &[(Token::Equals, BinaryOperator::Equal),
                                              (Token::NotEquals, BinaryOperator::NotEqual),
                                              (Token::Less, BinaryOperator::Less),
                                              (Token::Greater, BinaryOperator::Greater),
                                              (Token::LessEqual, BinaryOperator::LessEqual),
                                              (Token::GreaterEqual,
                                               BinaryOperator::GreaterEqual)]),
                       PrecedenceLevel::new(Resolution::Arithmetic,
                                            &[(Token::Plus, BinaryOperator::Add),
                                              (Token::Minus, BinaryOperator::Sub)]),
                       PrecedenceLevel::new(Resolution::Arithmetic,
                                            &[(Token::Star, BinaryOperator::Mul),
                                              (Token::Slash, BinaryOperator::Div),
                                              (Token::Mod, BinaryOperator::Mod)]),])
    }
}

/// Settings fixed for the lifetime of one parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Binary operator levels.
    pub precedence:   PrecedenceTable,
    /// Report `EXIT`, `CONTINUE` and `RETURN` outside a matching construct.
    /// When `false` they are accepted and emit nothing.
    pub strict_exits: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { precedence:   PrecedenceTable::default(),
               strict_exits: true, }
    }
}
