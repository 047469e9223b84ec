//! Route definitions for the `/user` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// ```text
/// POST   /user                  -> register
/// GET    /user                  -> list
/// PATCH  /user                  -> update_self
/// GET    /user/{id}             -> get_by_id
/// PATCH  /user/{id}             -> update
/// DELETE /user/{id}             -> delete
/// PATCH  /user/{id}/password    -> change_password
/// PATCH  /user/{id}/role        -> change_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(users::list)
                .post(users::register)
                .patch(users::update_self),
        )
        .route(
            "/user/{id}",
            get(users::get_by_id)
                .patch(users::update)
                .delete(users::delete),
        )
        .route("/user/{id}/password", patch(users::change_password))
        .route("/user/{id}/role", patch(users::change_role))
}
