//! Console service router: `/health`, the `/api/v1` tree and the shared
//! middleware stack used by `main.rs` and the integration tests.
//!
//! Every request span carries the request id and, for session routes, the
//! editing session id, so one operator's edits can be followed in the logs.

use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Request/response tracing with request and session ids
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        // Health stays at the root for load balancers.
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match session_id_from_path(request.uri().path()) {
        Some(session_id) => tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id,
            %session_id,
        ),
        None => tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id,
        ),
    }
}

/// Session id of an `/api/v1/sessions/{id}/...` path.
fn session_id_from_path(path: &str) -> Option<Uuid> {
    let rest = path.strip_prefix("/api/v1/sessions/")?;
    let segment = rest.split('/').next()?;
    Uuid::parse_str(segment).ok()
}

/// Build the CORS middleware layer from server configuration.
///
/// Origins that do not parse as header values are skipped with a warning.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_read_from_session_routes() {
        let id = Uuid::new_v4();
        assert_eq!(session_id_from_path(&format!("/api/v1/sessions/{id}")), Some(id));
        assert_eq!(
            session_id_from_path(&format!("/api/v1/sessions/{id}/blocks/form-step-1")),
            Some(id)
        );
    }

    #[test]
    fn other_routes_have_no_session_id() {
        assert_eq!(session_id_from_path("/health"), None);
        assert_eq!(session_id_from_path("/api/v1/sessions"), None);
        assert_eq!(session_id_from_path("/api/v1/sessions/load"), None);
        assert_eq!(session_id_from_path("/api/v1/companies/acme/duplication"), None);
    }
}
