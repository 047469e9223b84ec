//! Domain-level error type shared by every layer above the store.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Request payload failed validation. The message is `field|reason`.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated. `code` is the machine-readable error code.
    #[error("Conflict: {message}")]
    Conflict { code: &'static str, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Machine-readable error code surfaced as `errorCode` in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict { code, .. } => code,
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
        }
    }

    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        CoreError::Validation(format!("{field}|{reason}"))
    }
}
