//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use restaurant_api::auth::{AuthError, AuthFailure};
use restaurant_api::error::AppError;
use restaurant_core::error::CoreError;
use restaurant_db::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "User",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], "NOT_FOUND");
    assert_eq!(json["message"], "User with id 42 not found");
}

#[tokio::test]
async fn validation_error_keeps_field_reason_message() {
    let err = AppError::Core(CoreError::invalid_field("email", "must be a valid email"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "email|must be a valid email");
}

#[tokio::test]
async fn auth_failure_returns_400_with_reason() {
    let (status, json) = error_to_response(AppError::Auth(AuthFailure::WrongUserPassword)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], "WRONG_USER_PASSWORD");
    assert_eq!(json["reason"], "Wrong password");
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn unauthenticated_returns_401_with_reason() {
    let (status, json) =
        error_to_response(AppError::Unauthenticated(AuthFailure::JwtInvalid)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["errorCode"], "JWT_INVALID");
}

#[tokio::test]
async fn forbidden_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Insufficient permissions".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["errorCode"], "FORBIDDEN");
}

#[tokio::test]
async fn duplicate_email_becomes_conflict() {
    let err = AppError::from(StoreError::DuplicateEmail("a@b.com".into()));
    assert!(matches!(
        err,
        AppError::Core(CoreError::Conflict { code: "USER_ALREADY_EXISTS", .. })
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errorCode"], "USER_ALREADY_EXISTS");
    assert_eq!(json["message"], "A user with this email already exists");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["errorCode"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn corrupt_row_is_sanitized() {
    let err = AppError::from(StoreError::CorruptRow {
        id: 3,
        reason: "unknown role 'ROOT'".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "An internal error occurred");
}

#[tokio::test]
async fn denied_auth_error_converts_to_400() {
    let err: AppError = AuthError::Denied(AuthFailure::UnknownUser).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorCode"], "UNKNOWN_USER");
    assert_eq!(json["reason"], "User not found");
}
