//! Error types shared across the assistant crates

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty or whitespace-only message; rejected before classification
    #[error("Message is empty")]
    EmptyInput,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session capacity reached ({0} sessions)")]
    CapacityExceeded(usize),
}

impl Error {
    /// Short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EmptyInput => "empty_input",
            Error::SessionNotFound(_) => "session_not_found",
            Error::CapacityExceeded(_) => "capacity_exceeded",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
