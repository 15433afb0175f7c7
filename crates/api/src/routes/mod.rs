pub mod companies;
pub mod health;
pub mod sessions;
pub mod workflows;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /sessions/...                     journey editing sessions
/// /workflows/{id}/duplicate         server-side workflow copy
/// /companies/...                    company listing and duplication
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sessions", sessions::router())
        .nest("/workflows", workflows::router())
        .nest("/companies", companies::router())
}
