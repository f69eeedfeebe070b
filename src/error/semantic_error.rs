use crate::{ast::ExitKind, frontend::lexer::Position};

#[derive(Debug)]
/// Represents the name and type errors found while analysing a program.
pub enum SemanticError {
    /// An identifier that no active scope declares.
    UnknownIdentifier {
        /// The identifier.
        name: String,
        /// Where it was used.
        pos:  Position,
    },
    /// An identifier declared twice in the same scope.
    Redeclaration {
        /// The identifier.
        name: String,
        /// Where the second declaration starts.
        pos:  Position,
    },
    /// A datatype the type registry does not know.
    UnknownType {
        /// The datatype name as written.
        name: String,
        /// Where it was written.
        pos:  Position,
    },
    /// A value whose type cannot be stored where the context requires.
    TypeMismatch {
        /// The type required by the context.
        expected: String,
        /// The type of the value supplied.
        found:    String,
        /// Where the value was supplied.
        pos:      Position,
    },
    /// Two operands of a comparison, or a `CASE` item and its subject, that
    /// are neither both numeric nor of the same type.
    IncomparableOperands {
        /// Type of the left operand or the `SELECT` subject.
        left:  String,
        /// Type of the right operand or the `CASE` item.
        right: String,
        /// Where the comparison is.
        pos:   Position,
    },
    /// A non-numeric operand to an arithmetic operator.
    NonNumericOperand {
        /// The operator's spelling.
        op:       String,
        /// The offending operand type.
        datatype: String,
        /// Where the operator is.
        pos:      Position,
    },
    /// A non-boolean operand to a logical operator.
    NonBooleanOperand {
        /// The operator's spelling.
        op:       String,
        /// The offending operand type.
        datatype: String,
        /// Where the operator is.
        pos:      Position,
    },
    /// A call with the wrong number of arguments.
    ArityMismatch {
        /// The callee.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
        /// Where the call is.
        pos:      Position,
    },
    /// A call argument whose type differs from the parameter's.
    ArgumentTypeMismatch {
        /// The callee.
        name:     String,
        /// 1-based argument position.
        position: usize,
        /// Declared parameter type.
        expected: String,
        /// Type of the argument supplied.
        found:    String,
        /// Where the call is.
        pos:      Position,
    },
    /// A `SUB`, or any routine without a return type, used as a value.
    NoReturnValue {
        /// The routine.
        name: String,
        /// Where it was used.
        pos:  Position,
    },
    /// A variable used where a routine is required, or the reverse.
    NotCallable {
        /// The identifier.
        name: String,
        /// Where it was used.
        pos:  Position,
    },
    /// A routine used where a variable is required.
    NotAVariable {
        /// The identifier.
        name: String,
        /// Where it was used.
        pos:  Position,
    },
    /// A variable read before any assignment fixed its type.
    UnresolvedType {
        /// The identifier.
        name: String,
        /// Where it was read.
        pos:  Position,
    },
    /// `EXIT`, `CONTINUE` or `RETURN` outside a construct it applies to.
    MisplacedExit {
        /// The statement as written, e.g. `EXIT WHILE`.
        statement: String,
        /// Where the statement starts.
        pos:       Position,
    },
    /// `RETURN` with a value inside a `SUB`, or without one inside a
    /// `FUNCTION`.
    ReturnValueMismatch {
        /// The routine being returned from.
        name:    String,
        /// Whether the routine expects a value.
        expects: bool,
        /// Where the statement starts.
        pos:     Position,
    },
}

impl SemanticError {
    /// Builds the error for a misplaced `EXIT`.
    #[must_use]
    pub fn misplaced_exit(kind: ExitKind, pos: Position) -> Self {
        Self::MisplacedExit { statement: format!("EXIT {kind}"),
                              pos }
    }

    /// Where the error was detected.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownIdentifier { pos, .. }
            | Self::Redeclaration { pos, .. }
            | Self::UnknownType { pos, .. }
            | Self::TypeMismatch { pos, .. }
            | Self::IncomparableOperands { pos, .. }
            | Self::NonNumericOperand { pos, .. }
            | Self::NonBooleanOperand { pos, .. }
            | Self::ArityMismatch { pos, .. }
            | Self::ArgumentTypeMismatch { pos, .. }
            | Self::NoReturnValue { pos, .. }
            | Self::NotCallable { pos, .. }
            | Self::NotAVariable { pos, .. }
            | Self::UnresolvedType { pos, .. }
            | Self::MisplacedExit { pos, .. }
            | Self::ReturnValueMismatch { pos, .. } => *pos,
        }
    }
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, .. } => write!(f, "unknown identifier '{name}'"),
            Self::Redeclaration { name, .. } => {
                write!(f, "'{name}' is already declared in this scope")
            },
            Self::UnknownType { name, .. } => write!(f, "unknown datatype '{name}'"),
            Self::TypeMismatch { expected, found, .. } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            },
            Self::IncomparableOperands { left, right, .. } => {
                write!(f, "cannot compare {left} with {right}")
            },
            Self::NonNumericOperand { op, datatype, .. } => write!(f,
                                                                    "operator '{op}' requires numeric operands, found {datatype}"),
            Self::NonBooleanOperand { op, datatype, .. } => write!(f,
                                                                    "operator '{op}' requires boolean operands, found {datatype}"),
            Self::ArityMismatch { name,
                                  expected,
                                  found,
                                  .. } => write!(f,
                                                 "'{name}' expects {expected} argument(s) but {found} were supplied"),
            Self::ArgumentTypeMismatch { name,
                                         position,
                                         expected,
                                         found,
                                         .. } => write!(f,
                                                        "argument {position} of '{name}' must be {expected}, found {found}"),
            Self::NoReturnValue { name, .. } => {
                write!(f, "'{name}' has no return type and cannot be used in an expression")
            },
            Self::NotCallable { name, .. } => write!(f, "'{name}' is not a SUB or FUNCTION"),
            Self::NotAVariable { name, .. } => {
                write!(f, "'{name}' is a SUB or FUNCTION, not a variable")
            },
            Self::UnresolvedType { name, .. } => {
                write!(f, "'{name}' is used before any assignment gives it a type")
            },
            Self::MisplacedExit { statement, .. } => {
                write!(f, "{statement} is not inside a matching construct")
            },
            Self::ReturnValueMismatch { name, expects, .. } => {
                if *expects {
                    write!(f, "FUNCTION '{name}' must return a value")
                } else {
                    write!(f, "SUB '{name}' cannot return a value")
                }
            },
        }
    }
}

impl std::error::Error for SemanticError {}
