use thiserror::Error;

/// Why a single equation could not be turned into an [`super::Equation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no equality sign in equation")]
    MissingEquals,

    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected '{found}' at offset {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}
