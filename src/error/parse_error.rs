use crate::frontend::lexer::Position;

#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The source file could not be read.
    UnreadableSource {
        /// Path that was requested.
        path:   String,
        /// Reason reported by the operating system.
        reason: String,
    },
    /// Input that does not form any token.
    InvalidToken {
        /// The offending text.
        text: String,
        /// Where it starts.
        pos:  Position,
    },
    /// An integer literal too large for 64 bits.
    IntegerOutOfRange {
        /// The literal as written.
        text: String,
        /// Where it starts.
        pos:  Position,
    },
    /// Found a token other than the one the grammar requires.
    UnexpectedToken {
        /// Description of the token encountered.
        found:    String,
        /// Description of what was required.
        expected: String,
        /// Where the token starts.
        pos:      Position,
    },
    /// `NEXT` names a variable other than the loop counter.
    MismatchedNext {
        /// The counter of the innermost `FOR`.
        expected: String,
        /// The name after `NEXT`.
        found:    String,
        /// Where the name starts.
        pos:      Position,
    },
}

impl ParseError {
    /// Where the error was detected, if it is tied to a source location.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::UnreadableSource { .. } => None,
            Self::InvalidToken { pos, .. }
            | Self::IntegerOutOfRange { pos, .. }
            | Self::UnexpectedToken { pos, .. }
            | Self::MismatchedNext { pos, .. } => Some(*pos),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnreadableSource { path, reason } => {
                write!(f, "cannot read source file '{path}': {reason}")
            },
            Self::InvalidToken { text, .. } => write!(f, "invalid token '{text}'"),
            Self::IntegerOutOfRange { text, .. } => {
                write!(f, "integer literal {text} does not fit in 64 bits")
            },
            Self::UnexpectedToken { found, expected, .. } => {
                write!(f, "unexpected {found}, expected {expected}")
            },
            Self::MismatchedNext { expected, found, .. } => write!(f,
                                                                   "NEXT {found} does not match the loop counter '{expected}'"),
        }
    }
}

impl std::error::Error for ParseError {}
