//! Authenticated caller extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use restaurant_core::error::CoreError;
use restaurant_core::roles::Role;
use restaurant_core::types::DbId;

use crate::error::AppError;

/// Caller resolved from the `Authorization: Bearer` token by the guard
/// pipeline ([`super::guards::guard_pipeline`]).
///
/// The pipeline stores it in the request extensions; handlers pick it up as
/// an extractor parameter:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(account_id = user.account_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// The caller's account id (from `claims.accountId`).
    pub account_id: DbId,
    /// The caller's current role, read from the account store.
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })
    }
}
