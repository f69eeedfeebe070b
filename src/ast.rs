use std::fmt;

use ordered_float::OrderedFloat;

/// A binary operator recognised by the expression grammar.
///
/// Which operators exist at which precedence level is decided by the
/// [`PrecedenceTable`](crate::frontend::config::PrecedenceTable), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `MOD`
    Mod,
    /// `=` in expression position.
    Equal,
    /// `<>`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl BinaryOperator {
    /// Returns the operator as it is written in source code.
    ///
    /// ```
    /// use transbasic::ast::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::NotEqual.symbol(), "<>");
    /// assert_eq!(BinaryOperator::Mod.symbol(), "MOD");
    /// ```
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "MOD",
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns `true` for the six relational operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::Greater
                 | Self::LessEqual
                 | Self::GreaterEqual)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Numeric negation, `-x`.
    Negate,
    /// Logical negation, `NOT x`.
    Not,
}

/// The shape of an expression node.
///
/// Composite variants own their children through `Box`, so every tree is
/// acyclic and each node has exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Float(OrderedFloat<f64>),
    /// String literal with escapes already resolved.
    Str(String),
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// Reference to a declared variable.
    Identifier(String),
    /// Prefix operation.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<ExprNode>,
    },
    /// Infix operation.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<ExprNode>,
        /// Right operand.
        right: Box<ExprNode>,
    },
    /// Call of a function with a return type.
    Call {
        /// Name of the callee.
        name:      String,
        /// Arguments in source order.
        arguments: Vec<ExprNode>,
    },
}

/// A typed expression tree node.
///
/// `datatype` is the type the node evaluates to. `cast`, when present, asks
/// the generator to convert the value to that type before its parent uses
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprNode {
    /// What kind of expression this is.
    pub kind:     ExprKind,
    /// Resolved data type of the value.
    pub datatype: String,
    /// Cast annotation inserted by numeric promotion.
    pub cast:     Option<String>,
}

impl ExprNode {
    /// Creates an uncast node of the given type.
    #[must_use]
    pub fn new(kind: ExprKind, datatype: impl Into<String>) -> Self {
        Self { kind,
               datatype: datatype.into(),
               cast: None }
    }

    /// The type a parent observes: the cast target if any, else `datatype`.
    #[must_use]
    pub fn effective_type(&self) -> &str {
        self.cast.as_deref().unwrap_or(&self.datatype)
    }

    /// Left child of a binary node.
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        match &self.kind {
            ExprKind::Binary { left, .. } => Some(left),
            _ => None,
        }
    }

    /// Right child of a binary node.
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        match &self.kind {
            ExprKind::Binary { right, .. } => Some(right),
            _ => None,
        }
    }
}

/// Renders the node in source syntax. Binary nodes are parenthesized and a
/// cast annotation shows as `(value AS type)`.
///
/// ```
/// use transbasic::ast::{ExprKind, ExprNode};
///
/// let mut leaf = ExprNode::new(ExprKind::Identifier("a".into()), "integer");
/// assert_eq!(leaf.to_string(), "a");
/// leaf.cast = Some("single".into());
/// assert_eq!(leaf.to_string(), "(a AS single)");
/// ```
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(target) = &self.cast {
            f.write_str("(")?;
            write_kind(f, &self.kind)?;
            return write!(f, " AS {target})");
        }
        write_kind(f, &self.kind)
    }
}

fn write_kind(f: &mut fmt::Formatter<'_>, kind: &ExprKind) -> fmt::Result {
    match kind {
        ExprKind::Integer(v) => write!(f, "{v}"),
        ExprKind::Float(v) => write!(f, "{v:?}"),
        ExprKind::Str(s) => write!(f, "\"{}\"", s.replace('"', "\"\"")),
        ExprKind::Boolean(true) => f.write_str("TRUE"),
        ExprKind::Boolean(false) => f.write_str("FALSE"),
        ExprKind::Identifier(name) => f.write_str(name),
        ExprKind::Unary { op: UnaryOperator::Negate,
                          operand, } => write!(f, "-{operand}"),
        ExprKind::Unary { op: UnaryOperator::Not,
                          operand, } => write!(f, "NOT {operand}"),
        ExprKind::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        ExprKind::Call { name, arguments } => {
            write!(f, "{name}(")?;
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{argument}")?;
            }
            f.write_str(")")
        },
    }
}

/// One item of a `CASE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseExpression {
    /// `CASE value`
    Value(ExprNode),
    /// `CASE low TO high`
    Range {
        /// Inclusive lower bound.
        low:  ExprNode,
        /// Inclusive upper bound.
        high: ExprNode,
    },
    /// `CASE IS <comparator> value`
    Is {
        /// Relational operator applied as `subject <comparator> value`.
        comparator: BinaryOperator,
        /// Right-hand side of the comparison.
        value:      ExprNode,
    },
}

impl fmt::Display for CaseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Range { low, high } => write!(f, "{low} TO {high}"),
            Self::Is { comparator, value } => write!(f, "IS {comparator} {value}"),
        }
    }
}

/// An `(identifier, datatype)` pair.
///
/// Used for declarations, routine parameters and routine signatures, where
/// the datatype is the return type (empty for a `SUB`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Declared name.
    pub identifier: String,
    /// Type name, empty while unresolved.
    pub datatype:   String,
}

impl Parameter {
    #[must_use]
    pub fn new(identifier: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self { identifier: identifier.into(),
               datatype:   datatype.into(), }
    }
}

/// Ordered routine parameters.
pub type ParameterList = Vec<Parameter>;

/// The three loop constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// `FOR ... NEXT`
    For,
    /// `WHILE ... WEND`
    While,
    /// `DO ... LOOP`
    Do,
}

/// What an `EXIT` statement leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitKind {
    /// `EXIT FOR`, `EXIT WHILE`, `EXIT DO`
    Loop(LoopKind),
    /// `EXIT SELECT`
    Select,
    /// `EXIT FUNCTION`
    Function,
    /// `EXIT SUB`
    Sub,
}

impl fmt::Display for ExitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Loop(LoopKind::For) => "FOR",
                        Self::Loop(LoopKind::While) => "WHILE",
                        Self::Loop(LoopKind::Do) => "DO",
                        Self::Select => "SELECT",
                        Self::Function => "FUNCTION",
                        Self::Sub => "SUB",
                    })
    }
}

/// Whether a `DO`/`LOOP` condition continues while true or until true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// `WHILE cond`
    While,
    /// `UNTIL cond`
    Until,
}

/// A condition attached to either end of a `DO ... LOOP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopCondition {
    /// `WHILE` or `UNTIL`.
    pub kind:       ConditionKind,
    /// The tested expression.
    pub expression: ExprNode,
}

/// `SUB` or `FUNCTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineKind {
    /// Returns no value.
    Sub,
    /// Returns a value of its declared type.
    Function,
}

/// Whether the branches of an `IF` are statement blocks or single
/// statements on the `IF` line.
///
/// Block branches each get a scope. A single-line branch shares the scope
/// around the `IF`, so a `DIM` in it stays visible after the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchForm {
    Block,
    SingleLine,
}
