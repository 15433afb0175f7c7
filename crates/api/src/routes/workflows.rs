//! ```text
//! POST   /{id}/duplicate            duplicate_workflow
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::workflows;
use crate::state::AppState;

/// Workflow routes — mounted at `/workflows`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/duplicate", post(workflows::duplicate_workflow))
}
