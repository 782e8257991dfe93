use thiserror::Error;

use crate::adapters::{EngineError, EngineErrorCode};

/// Errors surfaced synchronously by the facade. Destroy never returns an
/// engine failure through this type; those land in the per-path result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("protected path: {0}")]
    Protected(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("engine error: {0}")]
    Engine(String),
}

impl ApiError {
    /// Malformed, overlapping or protected input. Raised before any mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::Protected(_)
        )
    }

    pub fn error_id(&self) -> ErrorId {
        match self {
            ApiError::Validation(_) => ErrorId::E_VALIDATION,
            ApiError::Conflict(_) => ErrorId::E_CONFLICT,
            ApiError::Protected(_) => ErrorId::E_PROTECTED,
            ApiError::NotFound(_) => ErrorId::E_NOT_FOUND,
            ApiError::Engine(_) => ErrorId::E_ENGINE,
        }
    }

    /// The human message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(m)
            | ApiError::Conflict(m)
            | ApiError::Protected(m)
            | ApiError::NotFound(m)
            | ApiError::Engine(m) => m,
        }
    }
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        use crate::types::errors::ErrorKind::{Conflict, InvalidPath, Protected, Unsupported};
        match e.kind {
            InvalidPath | Unsupported => ApiError::Validation(e.msg),
            Conflict => ApiError::Conflict(e.msg),
            Protected => ApiError::Protected(e.msg),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e.code {
            EngineErrorCode::NotFound => ApiError::NotFound(e.msg),
            EngineErrorCode::Busy | EngineErrorCode::Other => ApiError::Engine(e.msg),
        }
    }
}

// Stable identifiers attached to emitted facts.
#[allow(non_camel_case_types, reason = "Error IDs are emitted verbatim")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_VALIDATION,
    E_CONFLICT,
    E_PROTECTED,
    E_NOT_FOUND,
    E_BUSY,
    E_ENGINE,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_VALIDATION => "E_VALIDATION",
        ErrorId::E_CONFLICT => "E_CONFLICT",
        ErrorId::E_PROTECTED => "E_PROTECTED",
        ErrorId::E_NOT_FOUND => "E_NOT_FOUND",
        ErrorId::E_BUSY => "E_BUSY",
        ErrorId::E_ENGINE => "E_ENGINE",
    }
}

#[must_use]
pub const fn exit_code_for(id: ErrorId) -> i32 {
    match id {
        ErrorId::E_VALIDATION => 10,
        ErrorId::E_CONFLICT => 11,
        ErrorId::E_PROTECTED => 12,
        ErrorId::E_NOT_FOUND => 20,
        ErrorId::E_BUSY => 30,
        ErrorId::E_ENGINE => 40,
    }
}

/// Map an engine failure code to its stable `ErrorId`.
#[must_use]
pub const fn id_for_engine(code: EngineErrorCode) -> ErrorId {
    match code {
        EngineErrorCode::NotFound => ErrorId::E_NOT_FOUND,
        EngineErrorCode::Busy => ErrorId::E_BUSY,
        EngineErrorCode::Other => ErrorId::E_ENGINE,
    }
}
