#![forbid(unsafe_code)]

use thiserror::Error;

/// Session setup errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
