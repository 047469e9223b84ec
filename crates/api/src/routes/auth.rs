//! Route definitions for the `/authentication` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /authentication/login        -> login
/// POST /authentication/check-token  -> check_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authentication/login", post(auth::login))
        .route("/authentication/check-token", post(auth::check_token))
}
