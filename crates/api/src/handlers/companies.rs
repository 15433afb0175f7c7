//! Handlers for companies and company duplication.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use inspectra_core::company::CompanyDuplicationContext;
use inspectra_core::types::CompanyId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /companies
// ---------------------------------------------------------------------------

pub async fn list_companies(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let companies = state.backend.list_companies().await?;
    tracing::debug!(count = companies.len(), "Listed companies");
    Ok(Json(DataResponse { data: companies }))
}

// ---------------------------------------------------------------------------
// GET /companies/{id}/duplication
// ---------------------------------------------------------------------------

/// Stage a duplication of the company: settings flattened to editable text,
/// identity fields reset, parent candidates listed.
pub async fn duplication_context(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
) -> AppResult<impl IntoResponse> {
    let source = state.backend.get_company(&id).await?;
    let companies = state.backend.list_companies().await?;
    let context = CompanyDuplicationContext::from_company(&source, &companies)?;
    Ok(Json(DataResponse { data: context }))
}

// ---------------------------------------------------------------------------
// POST /companies/{id}/duplicate
// ---------------------------------------------------------------------------

/// Validate the operator's edits and create the copy.
///
/// The source id and parent candidates are taken from the server, not from
/// the submitted context.
pub async fn duplicate_company(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
    Json(mut context): Json<CompanyDuplicationContext>,
) -> AppResult<impl IntoResponse> {
    let source = state.backend.get_company(&id).await?;
    let companies = state.backend.list_companies().await?;
    context.source_company_id = source.id;
    context.refresh_candidates(&companies);

    let request = context.build_request()?;
    let company = state.backend.duplicate_company(request).await?;
    tracing::info!(source_id = %id, company_id = %company.id, "Company duplicated");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}
