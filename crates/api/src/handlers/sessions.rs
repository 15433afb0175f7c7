//! Handlers for journey editing sessions.
//!
//! Every mutation runs as one atomic session edit and answers with the
//! full session view, so the console can re-render from a single response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inspectra_client::JourneySession;
use inspectra_core::block::BlockType;
use inspectra_core::codec::{self, JourneyExport};
use inspectra_core::error::CoreError;
use inspectra_core::journey::JourneyDocument;
use inspectra_core::shoot_inspect::ShootInspectConfig;
use inspectra_core::types::{CompanyId, Timestamp};

use crate::error::AppResult;
use crate::response::{DataResponse, ExportResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Session state as returned to the console.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub journey: JourneyExport,
}

impl TryFrom<&JourneySession> for SessionView {
    type Error = CoreError;

    fn try_from(session: &JourneySession) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: session.id(),
            is_dirty: session.is_dirty(),
            is_saving: session.is_saving(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
            journey: JourneyExport::try_from(session.document())?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSessionRequest {
    pub workflow_id: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

/// Metadata changes; absent fields are left unchanged. An empty
/// `companyId` clears the company.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetadataRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub company_id: Option<CompanyId>,
}

#[derive(Debug, Deserialize)]
pub struct AddBlockRequest {
    #[serde(rename = "type")]
    pub block_type: BlockType,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct RenameBlockRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw payload text as typed by the operator.
#[derive(Debug, Deserialize)]
pub struct SetConfigRequest {
    pub raw: String,
}

/// Exported JSON text to import.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply one document edit to a session and return the new view.
async fn edit_session<T>(
    state: &AppState,
    id: Uuid,
    action: impl FnOnce(&mut JourneyDocument) -> Result<T, CoreError>,
) -> AppResult<Json<DataResponse<SessionView>>> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.edit(action)?;
    Ok(Json(DataResponse {
        data: SessionView::try_from(&*session)?,
    }))
}

// ---------------------------------------------------------------------------
// POST /sessions
// ---------------------------------------------------------------------------

/// Open a session over a new, empty journey.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let company_id = input.company_id.filter(|c| !c.trim().is_empty());
    let session = JourneySession::new(input.name.unwrap_or_default(), company_id);
    let view = SessionView::try_from(&session)?;
    state.sessions.insert(session).await;

    tracing::info!(session_id = %view.session_id, "Journey session created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// POST /sessions/load
// ---------------------------------------------------------------------------

/// Open a session over a persisted workflow.
pub async fn load_session(
    State(state): State<AppState>,
    Json(input): Json<LoadSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let session = JourneySession::load(
        state.backend.as_ref(),
        &input.workflow_id,
        input.company_id.as_deref(),
    )
    .await?;
    let view = SessionView::try_from(&session)?;
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(DataResponse {
        data: SessionView::try_from(&*session)?,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /sessions/{id}
// ---------------------------------------------------------------------------

/// Discard a session. Unsaved changes are lost.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /sessions/{id}/metadata
// ---------------------------------------------------------------------------

pub async fn update_metadata(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMetadataRequest>,
) -> AppResult<impl IntoResponse> {
    edit_session(&state, id, |doc| {
        if let Some(name) = input.name {
            doc.set_name(name);
        }
        if let Some(description) = input.description {
            doc.set_description(description);
        }
        if let Some(is_active) = input.is_active {
            doc.set_active(is_active);
        }
        if let Some(company_id) = input.company_id {
            doc.set_company(Some(company_id));
        }
        Ok(())
    })
    .await
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// POST /sessions/{id}/blocks
pub async fn add_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddBlockRequest>,
) -> AppResult<impl IntoResponse> {
    let view = edit_session(&state, id, |doc| {
        let block = doc.add_block(input.block_type)?;
        tracing::debug!(session_id = %id, block_id = %block.id, "Block added");
        Ok(())
    })
    .await?;
    Ok((StatusCode::CREATED, view))
}

/// DELETE /sessions/{id}/blocks/{block_id}
pub async fn remove_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
) -> AppResult<impl IntoResponse> {
    edit_session(&state, id, |doc| doc.remove_block(&block_id).map(|_| ())).await
}

/// POST /sessions/{id}/blocks/reorder
pub async fn reorder_blocks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    edit_session(&state, id, |doc| doc.reorder_blocks(input.from, input.to)).await
}

/// PUT /sessions/{id}/blocks/{block_id}
pub async fn rename_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
    Json(input): Json<RenameBlockRequest>,
) -> AppResult<impl IntoResponse> {
    edit_session(&state, id, |doc| {
        doc.rename_block(&block_id, input.name, input.description)
    })
    .await
}

/// PUT /sessions/{id}/blocks/{block_id}/config
pub async fn set_block_config(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
    Json(input): Json<SetConfigRequest>,
) -> AppResult<impl IntoResponse> {
    edit_session(&state, id, |doc| doc.set_block_config(&block_id, &input.raw)).await
}

// ---------------------------------------------------------------------------
// Shoot-inspection sub-editor
// ---------------------------------------------------------------------------

/// PUT /sessions/{id}/blocks/{block_id}/shoot-inspect
pub async fn set_shoot_inspect(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
    Json(input): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let config: ShootInspectConfig = serde_json::from_value(input)
        .map_err(|e| CoreError::parse(format!("{} block", BlockType::ShootInspect), &e))?;
    edit_session(&state, id, |doc| {
        doc.set_shoot_inspect_config(&block_id, config)
    })
    .await
}

/// GET /sessions/{id}/blocks/{block_id}/shoot-inspect/export
pub async fn export_shoot_inspect(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let config = session
        .document()
        .shoot_inspect_config(&block_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Shoot inspection block",
            id: block_id.clone(),
        })?;
    let content = codec::export_shoot_inspect(config)?;
    Ok(Json(DataResponse {
        data: ExportResponse { content },
    }))
}

/// POST /sessions/{id}/blocks/{block_id}/shoot-inspect/import
pub async fn import_shoot_inspect(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(Uuid, String)>,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    let config = codec::import_shoot_inspect(&input.content)?;
    edit_session(&state, id, |doc| {
        doc.set_shoot_inspect_config(&block_id, config)
    })
    .await
}

// ---------------------------------------------------------------------------
// POST /sessions/{id}/save
// ---------------------------------------------------------------------------

/// Persist the journey. The session stays editable while the upstream call
/// is in flight, but a second save answers `409` until the first one
/// finishes; a failed save leaves the document untouched.
pub async fn save_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let prepared = handle.lock().await.prepare_save()?;

    let record = match prepared.submit(state.backend.as_ref()).await {
        Ok(record) => record,
        Err(err) => {
            tracing::error!(session_id = %id, error = %err, "Failed to save journey");
            return Err(err.into());
        }
    };

    let workflow_id = record.id.clone();
    let mut session = handle.lock().await;
    session.commit_save(record, prepared);
    tracing::info!(session_id = %id, workflow_id = %workflow_id, "Journey saved");
    Ok(Json(DataResponse {
        data: SessionView::try_from(&*session)?,
    }))
}

// ---------------------------------------------------------------------------
// Import / export
// ---------------------------------------------------------------------------

/// GET /sessions/{id}/export
pub async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let content = handle.lock().await.export()?;
    Ok(Json(DataResponse {
        data: ExportResponse { content },
    }))
}

/// POST /sessions/{id}/import
pub async fn import_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.import(&input.content)?;
    tracing::info!(
        session_id = %id,
        block_count = session.document().blocks().len(),
        "Journey imported"
    );
    Ok(Json(DataResponse {
        data: SessionView::try_from(&*session)?,
    }))
}

// ---------------------------------------------------------------------------
// POST /sessions/{id}/duplicate
// ---------------------------------------------------------------------------

/// Copy the session's journey into a new, unsaved session.
pub async fn duplicate_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DuplicateSessionRequest>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(id).await?;
    let copy = handle
        .lock()
        .await
        .duplicate(input.name, input.company_id)?;
    let view = SessionView::try_from(&copy)?;
    state.sessions.insert(copy).await;

    tracing::info!(source_session = %id, session_id = %view.session_id, "Journey duplicated");
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}
