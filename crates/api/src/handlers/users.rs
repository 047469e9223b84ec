//! Handlers for the `/user` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use restaurant_core::error::CoreError;
use restaurant_core::roles::Role;
use restaurant_core::types::DbId;
use restaurant_db::models::account::{Account, AccountResponse, CreateAccount, UpdateAccount};
use restaurant_db::StatusFilter;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::validate_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /user`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 255))]
    pub name: String,
    #[validate(email, length(min = 3, max = 255))]
    pub email: String,
    #[validate(length(max = 255), custom(function = "validate_password"))]
    pub password: String,
}

/// Request body for `PATCH /user` and `PATCH /user/{id}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 255))]
    pub name: Option<String>,
    #[validate(email, length(min = 3, max = 255))]
    pub email: Option<String>,
}

/// Request body for `PATCH /user/{id}/password`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(max = 255), custom(function = "validate_password"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub old_password: Option<String>,
}

/// Request body for `PATCH /user/{id}/role`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /user
///
/// Self-registration. New accounts always get the `USER` role.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DbId>>)> {
    let password_hash = state.auth.hash_password(&input.password).await?;
    let account = state
        .store
        .create(&CreateAccount {
            name: input.name,
            email: input.email,
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(account_id = account.id, "Account registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", account.id)),
    ))
}

/// GET /user
///
/// All accounts including deactivated ones, newest first. Admin only.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<AccountResponse>>>> {
    let accounts = state.store.list().await?;
    let data: Vec<AccountResponse> = accounts.iter().map(AccountResponse::from).collect();
    Ok(Json(ApiResponse::data(data)))
}

/// GET /user/{id}
///
/// Admins also see deactivated accounts.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    let filter = if user.is_admin() {
        StatusFilter::IncludeInactive
    } else {
        StatusFilter::ActiveOnly
    };
    let account = find_target(&state, id, filter).await?;
    Ok(Json(ApiResponse::data(AccountResponse::from(&account))))
}

/// PATCH /user
///
/// Update the caller's own profile.
pub async fn update_self(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    apply_profile_update(&state, user.account_id, input).await
}

/// PATCH /user/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    apply_profile_update(&state, id, input).await
}

/// PATCH /user/{id}/password
///
/// Non-admin callers must confirm with `oldPassword`. An admin may omit it;
/// if given it is still checked.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    if input.old_password.is_none() && !user.is_admin() {
        return Err(CoreError::invalid_field("oldPassword", "oldPassword is required").into());
    }

    let account = find_target(&state, id, StatusFilter::ActiveOnly).await?;
    let updated = state
        .auth
        .change_password(&account, &input.password, input.old_password.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(
        "User updated successfully",
        AccountResponse::from(&updated),
    )))
}

/// PATCH /user/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    find_target(&state, id, StatusFilter::ActiveOnly).await?;
    let updated = state
        .store
        .update_role(id, input.role)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        account_id = id,
        role = %updated.role,
        changed_by = user.account_id,
        "Account role changed"
    );
    Ok(Json(ApiResponse::ok(
        "User updated successfully",
        AccountResponse::from(&updated),
    )))
}

/// DELETE /user/{id}
///
/// Soft delete: the account is marked `INACTIVE` and can no longer log in.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<DbId>>> {
    find_target(&state, id, StatusFilter::ActiveOnly).await?;
    state
        .store
        .deactivate(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(account_id = id, deleted_by = user.account_id, "Account deactivated");
    Ok(Json(ApiResponse::ok("User deleted successfully", id)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_target(state: &AppState, id: DbId, filter: StatusFilter) -> AppResult<Account> {
    state
        .store
        .find_by_id(id, filter)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn apply_profile_update(
    state: &AppState,
    id: DbId,
    input: UpdateUserRequest,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    find_target(state, id, StatusFilter::ActiveOnly).await?;
    let changes = UpdateAccount {
        name: input.name,
        email: input.email,
    };
    let updated = state
        .store
        .update_profile(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(account_id = id, "Account profile updated");
    Ok(Json(ApiResponse::ok(
        "User updated successfully",
        AccountResponse::from(&updated),
    )))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "User",
        id,
    })
}
