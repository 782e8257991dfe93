//! Error types used across zfs-resource.
use thiserror::Error;

/// High-level error categories for path classification and request validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid path")]
    InvalidPath,
    #[error("overlapping paths")]
    Conflict,
    #[error("protected path")]
    Protected,
    #[error("unsupported operation")]
    Unsupported,
}

/// Structured error with a kind and human message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {msg}")]
pub struct Error {
    pub kind: ErrorKind,
    pub msg: String,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }
}

/// Convenient alias for results returning a `types::Error`.
pub type Result<T> = std::result::Result<T, Error>;
