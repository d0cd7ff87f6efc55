use thiserror::Error;

/// Reasons a piece of external input was discarded. The session is never touched when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("not a number: {0:?}")]
    NotNumeric(String),
    #[error("unsupported matrix size {0}; expected 2, 4, 8 or 16")]
    UnsupportedMatrixSize(i64),
    #[error("timer must be zero or more seconds, got {0}")]
    NegativeTimer(i64),
    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("hack session has shut down")]
    Closed,
    #[error("hack session did not respond")]
    NoResponse,
}
