//! Error type shared by every core operation.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between user input and the save file.
///
/// None of these are fatal: the frontend reports them and keeps running.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid name {input:?}: {reason}")]
    InvalidName { input: String, reason: String },

    #[error("invalid note: {0}")]
    InvalidNote(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("incorrect password or damaged save file")]
    AuthenticationFailed,

    #[error("save data is corrupt: {0}")]
    CorruptData(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cipher failure: {0}")]
    CryptoProvider(String),
}

impl Error {
    pub(crate) fn invalid_amount(input: &str, reason: impl ToString) -> Self {
        Error::InvalidAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_name(input: &str, reason: impl ToString) -> Self {
        Error::InvalidName {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means "the save file is not there yet".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
