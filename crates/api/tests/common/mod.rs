#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use restaurant_api::auth::jwt::{parse_expiry, JwtConfig, DEFAULT_TOKEN_EXPIRY};
use restaurant_api::auth::password::HasherConfig;
use restaurant_api::config::ServerConfig;
use restaurant_api::router::build_app_router;
use restaurant_api::state::AppState;
use restaurant_core::roles::Role;
use restaurant_db::models::account::{Account, CreateAccount};
use restaurant_db::{AccountStore, MemoryAccountStore};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Build a test `ServerConfig` with safe defaults and cheap Argon2 costs.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            default_expiry: parse_expiry(DEFAULT_TOKEN_EXPIRY).unwrap(),
        },
        hasher: HasherConfig {
            enabled: true,
            memory_kib: 1024,
            iterations: 1,
        },
        bootstrap_admin: None,
    }
}

/// Application under test, backed by an in-memory account store.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryAccountStore>,
}

impl TestApp {
    /// The full production router (guards, CORS, request id, timeout, tracing).
    pub fn router(&self) -> Router {
        build_app_router(self.state.clone())
    }

    /// Insert an active account with [`TEST_PASSWORD`].
    pub async fn seed(&self, name: &str, email: &str, role: Role) -> Account {
        let password_hash = self.state.auth.hash_password(TEST_PASSWORD).await.unwrap();
        self.store
            .create(&CreateAccount {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
            .unwrap()
    }

    pub async fn seed_user(&self, name: &str) -> Account {
        self.seed(name, &format!("{name}@test.com"), Role::User).await
    }

    pub async fn seed_admin(&self, name: &str) -> Account {
        self.seed(name, &format!("{name}@test.com"), Role::Admin).await
    }

    /// Sign a token for `account` with the default lifetime.
    pub fn token_for(&self, account: &Account) -> String {
        self.state.auth.issue(account, false, None).unwrap()
    }

    /// Sign a token for `account` with an explicit lifetime.
    pub fn token_with_expiry(&self, account: &Account, expiry: Duration) -> String {
        self.state.auth.issue(account, false, Some(expiry)).unwrap()
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryAccountStore::new());
    let state = AppState::new(store.clone(), config).unwrap();
    TestApp { state, store }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, None, body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
