use thiserror::Error;

/// Filter expression parse failure with the byte offset where it occurred.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at position {position}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("empty filter expression")]
    EmptyExpression,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unrecognized character '{0}'")]
    UnexpectedChar(char),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("expected {0}")]
    Expected(&'static str),

    #[error("unexpected trailing input")]
    TrailingInput,
}
