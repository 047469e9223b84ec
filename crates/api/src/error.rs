use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use restaurant_core::error::CoreError;
use restaurant_db::StoreError;
use serde_json::json;

use crate::auth::{AuthError, AuthFailure};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ success: false, ... }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `restaurant_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An account store failure other than a uniqueness conflict.
    #[error(transparent)]
    Store(StoreError),

    /// An expected authentication outcome returned by login, token check or
    /// password change. Rendered as 400 with `reason` + `errorCode`.
    #[error("Authentication failed: {0}")]
    Auth(AuthFailure),

    /// The guard pipeline could not authenticate the caller. Rendered as 401.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(AuthFailure),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Denied(failure) => AppError::Auth(failure),
            AuthError::Store(store) => AppError::from(store),
            AuthError::Password(e) => AppError::InternalError(format!("Password hashing error: {e}")),
            AuthError::Signing(e) => AppError::InternalError(format!("Token generation error: {e}")),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => AppError::Core(CoreError::Conflict {
                code: "USER_ALREADY_EXISTS",
                message: "A user with this email already exists".to_string(),
            }),
            other => AppError::Store(other),
        }
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::Auth(failure)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(failure) => {
                return auth_failure_response(StatusCode::BAD_REQUEST, *failure);
            }
            AppError::Unauthenticated(failure) => {
                return auth_failure_response(StatusCode::UNAUTHORIZED, *failure);
            }

            // --- CoreError variants ---
            AppError::Core(core) => {
                let status = match core {
                    CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::Conflict { .. } => StatusCode::CONFLICT,
                    CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                };
                let message = match core {
                    CoreError::NotFound { .. } => core.to_string(),
                    CoreError::Validation(msg)
                    | CoreError::Unauthorized(msg)
                    | CoreError::Forbidden(msg) => msg.clone(),
                    CoreError::Conflict { message, .. } => message.clone(),
                };
                (status, core.code(), message)
            }

            AppError::Store(err) => {
                tracing::error!(error = %err, "Account store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "message": message,
            "errorCode": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn auth_failure_response(status: StatusCode, failure: AuthFailure) -> Response {
    let body = json!({
        "success": false,
        "reason": failure.to_string(),
        "errorCode": failure.code(),
    });
    (status, axum::Json(body)).into_response()
}
