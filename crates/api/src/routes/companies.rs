//! ```text
//! GET    /                          list_companies
//! GET    /{id}/duplication          duplication_context
//! POST   /{id}/duplicate            duplicate_company
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Company routes — mounted at `/companies`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list_companies))
        .route("/{id}/duplication", get(companies::duplication_context))
        .route("/{id}/duplicate", post(companies::duplicate_company))
}
