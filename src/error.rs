//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("comms error: {0}")]
    Comms(String),

    #[error("manual error: {0}")]
    Manual(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the in-memory record stores.
///
/// These are user-facing: the message is returned verbatim in the HTTP
/// error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: u32 },

    #[error("requested {requested} slot(s) but only {remaining} remaining")]
    CapacityExceeded { requested: u32, remaining: u32 },

    #[error("{kind} #{id} is not bookable while {status}")]
    Unavailable { kind: &'static str, id: u32, status: String },
}

impl RecordError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
