//! Access policy for every route, keyed by method and route template.

use axum::http::Method;
use restaurant_core::roles::Role;

use crate::middleware::guards::RoutePolicy;

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Look up the policy for `(method, template)`.
///
/// `template` is the axum route template (`/user/{id}`), not the concrete
/// request path. `None` means the route is unknown to the table and must be
/// denied.
pub fn route_policy(method: &Method, template: &str) -> Option<RoutePolicy> {
    let policy = match (method.as_str(), template) {
        ("GET", "/health") => RoutePolicy::anonymous(),

        ("POST", "/authentication/login") => RoutePolicy::anonymous(),
        ("POST", "/authentication/check-token") => RoutePolicy::anonymous(),

        ("POST", "/user") => RoutePolicy::anonymous(),
        ("GET", "/user") => RoutePolicy::roles(ADMIN_ONLY),
        ("PATCH", "/user") => RoutePolicy::authenticated(),
        ("GET", "/user/{id}") => RoutePolicy::owner("id"),
        ("PATCH", "/user/{id}") => RoutePolicy::owner("id"),
        ("DELETE", "/user/{id}") => RoutePolicy::roles(ADMIN_ONLY),
        ("PATCH", "/user/{id}/password") => RoutePolicy::owner("id"),
        ("PATCH", "/user/{id}/role") => RoutePolicy::roles(ADMIN_ONLY),

        _ => return None,
    };
    Some(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_are_anonymous() {
        for (method, path) in [
            (Method::GET, "/health"),
            (Method::POST, "/authentication/login"),
            (Method::POST, "/authentication/check-token"),
            (Method::POST, "/user"),
        ] {
            let policy = route_policy(&method, path).unwrap();
            assert!(policy.anonymous, "{method} {path} should be anonymous");
        }
    }

    #[test]
    fn admin_routes_require_admin_role() {
        for (method, path) in [
            (Method::GET, "/user"),
            (Method::DELETE, "/user/{id}"),
            (Method::PATCH, "/user/{id}/role"),
        ] {
            let policy = route_policy(&method, path).unwrap();
            assert!(!policy.anonymous);
            assert_eq!(policy.roles, ADMIN_ONLY);
        }
    }

    #[test]
    fn profile_routes_are_bound_to_the_id_param() {
        let policy = route_policy(&Method::PATCH, "/user/{id}").unwrap();
        let binding = policy.self_binding.unwrap();
        assert_eq!(binding.param, "id");
        assert!(binding.allow_admins);
    }

    #[test]
    fn unknown_routes_have_no_policy() {
        assert!(route_policy(&Method::PUT, "/user/{id}").is_none());
        assert!(route_policy(&Method::GET, "/user/7").is_none());
        assert!(route_policy(&Method::GET, "/admin").is_none());
    }
}
