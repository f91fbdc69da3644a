//! Domain error model.

use thiserror::Error;

/// Result type used across the service layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Error kinds surfaced at the operation boundary.
///
/// Every operation resolves to exactly one of these. Layer-local errors
/// (token, password, storage, policy) convert into this type with `From`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-enum input. Never reaches storage.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials.
    ///
    /// Deliberately carries no detail so callers cannot tell an unknown
    /// username from a wrong password.
    #[error("unauthorized")]
    Unauthenticated,

    /// A valid identity attempted an operation its role does not allow.
    #[error("forbidden: role '{role}' may not perform '{operation}'")]
    Forbidden { operation: String, role: String },

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Storage or primitive failure not attributable to caller input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::Conflict(_) => "conflict",
            DomainError::Unauthenticated => "unauthorized",
            DomainError::Forbidden { .. } => "forbidden",
            DomainError::NotFound(_) => "not_found",
            DomainError::Internal(_) => "internal_error",
        }
    }
}
