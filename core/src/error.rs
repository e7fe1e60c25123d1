use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

/// Coarse classification of an [`Error`], reported to clients next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    MalformedRequest,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::MalformedRequest(_) => ErrorKind::MalformedRequest,
            Error::Database(_) | Error::Io(_) | Error::Serialization(_) | Error::Persistence(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
