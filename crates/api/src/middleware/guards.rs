//! Route authorization: Bearer, Roles and Self guards.
//!
//! Every routed request passes through [`guard_pipeline`], which looks up the
//! route's [`RoutePolicy`] by `(method, route template)` and runs the three
//! guards in order. A route with no policy entry is rejected.

use std::collections::HashMap;

use axum::extract::{MatchedPath, Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum::RequestExt;
use restaurant_core::error::CoreError;
use restaurant_core::roles::Role;
use restaurant_core::types::DbId;

use super::auth::AuthUser;
use crate::auth::AuthError;
use crate::error::{AppError, AppResult};
use crate::routes::policy::route_policy;
use crate::state::AppState;

/// Binds a path parameter to the caller's own account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfBinding {
    /// Name of the path parameter holding the target account id.
    pub param: &'static str,
    /// Whether ADMIN callers may act on other accounts.
    pub allow_admins: bool,
}

/// Authorization metadata attached to a single route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePolicy {
    pub anonymous: bool,
    /// Roles allowed in addition to ADMIN. Empty means any authenticated caller.
    pub roles: &'static [Role],
    pub self_binding: Option<SelfBinding>,
}

impl RoutePolicy {
    /// No authentication required.
    pub const fn anonymous() -> Self {
        Self {
            anonymous: true,
            roles: &[],
            self_binding: None,
        }
    }

    /// Any authenticated caller.
    pub const fn authenticated() -> Self {
        Self {
            anonymous: false,
            roles: &[],
            self_binding: None,
        }
    }

    /// Authenticated caller holding one of `roles` (ADMIN always passes).
    pub const fn roles(roles: &'static [Role]) -> Self {
        Self {
            anonymous: false,
            roles,
            self_binding: None,
        }
    }

    /// Authenticated caller whose id equals path parameter `param`; admins pass.
    pub const fn owner(param: &'static str) -> Self {
        Self {
            anonymous: false,
            roles: &[],
            self_binding: Some(SelfBinding {
                param,
                allow_admins: true,
            }),
        }
    }

    /// Like [`RoutePolicy::owner`] but admins are held to the same rule.
    pub const fn owner_only(param: &'static str) -> Self {
        Self {
            anonymous: false,
            roles: &[],
            self_binding: Some(SelfBinding {
                param,
                allow_admins: false,
            }),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    match header.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        )),
    }
}

/// Resolve the caller for a non-anonymous route.
///
/// Returns `Ok(None)` for anonymous routes without looking at the header.
pub async fn bearer_guard(
    state: &AppState,
    policy: &RoutePolicy,
    headers: &HeaderMap,
) -> AppResult<Option<AuthUser>> {
    if policy.anonymous {
        return Ok(None);
    }

    let token = bearer_token(headers)?;
    let (account, _claims) = state.auth.authenticate(token).await.map_err(|err| match err {
        AuthError::Denied(failure) => AppError::Unauthenticated(failure),
        other => AppError::from(other),
    })?;

    Ok(Some(AuthUser {
        account_id: account.id,
        role: account.role,
    }))
}

/// Role check. ADMIN satisfies every role requirement.
pub fn roles_guard(caller: Option<&AuthUser>, policy: &RoutePolicy) -> bool {
    if policy.anonymous {
        return true;
    }
    let Some(caller) = caller else {
        return false;
    };
    caller.is_admin() || policy.roles.is_empty() || policy.roles.contains(&caller.role)
}

/// Ownership check against the bound path parameter.
pub fn self_guard(
    caller: Option<&AuthUser>,
    policy: &RoutePolicy,
    params: &HashMap<String, String>,
) -> bool {
    let Some(binding) = policy.self_binding else {
        return true;
    };
    let Some(caller) = caller else {
        return false;
    };

    let target = params
        .get(binding.param)
        .and_then(|raw| raw.parse::<DbId>().ok());
    if target == Some(caller.account_id) {
        return true;
    }
    binding.allow_admins && caller.is_admin()
}

/// Middleware running Bearer, Roles and Self guards for the matched route.
///
/// Install with `route_layer(from_fn_with_state(state, guard_pipeline))` so
/// that [`MatchedPath`] and path parameters are available. On success the
/// resolved [`AuthUser`] is placed in the request extensions.
pub async fn guard_pipeline(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let method = req.method().clone();
    let template = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned());

    let Some(policy) = template
        .as_deref()
        .and_then(|path| route_policy(&method, path))
    else {
        tracing::warn!(%method, route = ?template, "No access policy for route");
        return Err(forbidden());
    };

    let caller = bearer_guard(&state, &policy, req.headers()).await?;

    if !roles_guard(caller.as_ref(), &policy) {
        deny(&method, template.as_deref(), caller.as_ref(), "roles");
        return Err(forbidden());
    }

    if policy.self_binding.is_some() {
        let params = match req.extract_parts::<Path<HashMap<String, String>>>().await {
            Ok(Path(params)) => params,
            Err(rejection) => {
                tracing::warn!(error = %rejection, "Could not read path parameters for self check");
                return Err(forbidden());
            }
        };
        if !self_guard(caller.as_ref(), &policy, &params) {
            deny(&method, template.as_deref(), caller.as_ref(), "self");
            return Err(forbidden());
        }
    }

    if let Some(caller) = caller {
        req.extensions_mut().insert(caller);
    }
    Ok(next.run(req).await)
}

fn forbidden() -> AppError {
    AppError::Core(CoreError::Forbidden("Insufficient permissions".into()))
}

fn deny(method: &Method, route: Option<&str>, caller: Option<&AuthUser>, guard: &str) {
    tracing::warn!(
        %method,
        route = route.unwrap_or("-"),
        account_id = caller.map(|c| c.account_id),
        guard,
        "Request denied"
    );
}
