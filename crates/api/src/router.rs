//! HTTP entry point shared by the binary and the integration tests.
//!
//! [`build_app_router`] wires every route behind the access-policy guard and
//! wraps the result in the service-wide layers. Tests build the app through
//! the same function, so guard and envelope behaviour is exercised exactly
//! as deployed.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::guards::guard_pipeline;
use crate::routes;
use crate::state::AppState;

/// Assemble the account service.
///
/// Request path, outermost first:
///
/// - CORS for the configured front-end origins (preflights end here)
/// - `x-request-id` assigned when missing, echoed on the response
/// - access log span per request
/// - `REQUEST_TIMEOUT_SECS` budget (408 on expiry)
/// - panic recovery
/// - [`guard_pipeline`], as a route layer: unknown paths skip it and 404,
///   known paths are authorized from [`routes::policy`] before any handler
///   or body extraction runs
pub fn build_app_router(state: AppState) -> Router {
    let config = &state.config;
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::api_routes())
        .route_layer(from_fn_with_state(state.clone(), guard_pipeline))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS policy for the browser client: the verbs the route table uses,
/// JSON bodies and bearer tokens, credentials allowed.
///
/// An unparsable origin in `CORS_ORIGINS` aborts startup.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
