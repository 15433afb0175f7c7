//! Handlers for persisted workflows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use inspectra_core::journey::validate_journey_name;
use inspectra_core::workflow::DuplicateWorkflowRequest;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /workflows/{id}/duplicate
// ---------------------------------------------------------------------------

/// Server-side copy of a persisted workflow.
pub async fn duplicate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DuplicateWorkflowRequest>,
) -> AppResult<impl IntoResponse> {
    validate_journey_name(&input.name)?;
    let request = DuplicateWorkflowRequest {
        name: input.name.trim().to_string(),
        company_id: input.company_id.filter(|c| !c.trim().is_empty()),
    };

    let record = state.backend.duplicate_workflow(&id, request).await?;
    tracing::info!(source_id = %id, workflow_id = %record.id, "Workflow duplicated");
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}
