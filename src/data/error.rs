use thiserror::Error;

/// Failure while reading or writing the whitespace separated text format.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),
    #[error("unexpected end of input")]
    Eof,
    #[error("trailing tokens after the value")]
    TrailingTokens,
    #[error("invalid integer: {0}")]
    Integer(#[from] std::num::ParseIntError),
    #[error("invalid number: {0}")]
    Number(#[from] std::num::ParseFloatError),
    #[error("invalid boolean: {0}")]
    Boolean(String),
    #[error("{0} is not supported by the text format")]
    Unsupported(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(message: T) -> Self {
        Self::Message(message.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: std::fmt::Display>(message: T) -> Self {
        Self::Message(message.to_string())
    }
}
