use std::sync::Arc;

use crate::types::ValueKind;

/// Error payload carried by a failure row. Shared so that every accessor call
/// surfaces the very same value.
pub type InjectedError = Arc<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("unsupported column type: {0}")]
    UnsupportedType(String),
    #[error("{0}")]
    Range(String),
    #[error("{0}")]
    Argument(String),
    #[error("index out of range: {0}")]
    Index(String),
    #[error("data is null, cannot read it as {expected}")]
    NullValue { expected: &'static str },
    #[error("cannot read {found} value as {expected}")]
    Cast {
        expected: &'static str,
        found: ValueKind,
    },
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    Injected(InjectedError),
    #[error("invalid generation profile: {0}")]
    Profile(String),
}

impl Error {
    /// Returns the injected payload if this error was raised by a failure row.
    pub fn injected(&self) -> Option<&InjectedError> {
        match self {
            Error::Injected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Profile(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Profile(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
