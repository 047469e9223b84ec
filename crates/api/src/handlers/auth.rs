//! Handlers for the `/authentication` resource (login, check-token).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::validate_password;
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::response::TokenResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /authentication/login`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 255))]
    pub email: String,
    #[validate(length(max = 255), custom(function = "validate_password"))]
    pub password: String,
    #[serde(default)]
    pub keep_logged_in: bool,
}

/// Request body for `POST /authentication/check-token`.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckTokenRequest {
    #[validate(length(min = 1, max = 1000))]
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /authentication/login
///
/// Exchange email + password for a session token. Unknown or deactivated
/// emails and wrong passwords are 400 with `UNKNOWN_USER` /
/// `WRONG_USER_PASSWORD`.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth
        .login(&input.email, &input.password, input.keep_logged_in)
        .await?;
    Ok(Json(TokenResponse::new(token)))
}

/// POST /authentication/check-token
///
/// Validate a token and return a refreshed one issued with `keepLoggedIn`.
pub async fn check_token(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CheckTokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.auth.check_token(&input.token).await?;
    Ok(Json(TokenResponse::new(token)))
}
