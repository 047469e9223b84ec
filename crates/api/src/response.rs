//! Shared response envelope types for API handlers.
//!
//! Successful responses use `{ "success": true, ... }`; failures are rendered
//! by [`crate::error::AppError`] with `success: false` and an `errorCode`.

use serde::Serialize;

/// Standard `{ "success": true, "message": ..., "data": ... }` envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok("User created successfully", account.id)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

/// `{ "success": true, "token": ... }` returned by login and token check.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}
