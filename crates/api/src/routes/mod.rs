pub mod auth;
pub mod health;
pub mod policy;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// Routes are registered with their complete paths (no nesting) so the
/// matched route template is exactly the key used in [`policy::route_policy`].
///
/// ```text
/// GET    /health                       health (anonymous)
///
/// POST   /authentication/login         login (anonymous)
/// POST   /authentication/check-token   refresh token (anonymous)
///
/// POST   /user                         register (anonymous)
/// GET    /user                         list (admin)
/// PATCH  /user                         update own profile (authenticated)
/// GET    /user/{id}                    read profile (self or admin)
/// PATCH  /user/{id}                    update profile (self or admin)
/// DELETE /user/{id}                    soft delete (admin)
/// PATCH  /user/{id}/password           change password (self or admin)
/// PATCH  /user/{id}/role               change role (admin)
/// ```
///
/// Any other method on one of these paths has no policy entry, so the guard
/// pipeline answers 403 `FORBIDDEN` rather than axum's 405.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
}
