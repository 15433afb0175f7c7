use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inspectra_client::{SessionError, WorkflowApiError};
use inspectra_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`WorkflowApiError`] for
/// upstream failures. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `inspectra_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The workflow or company API failed.
    #[error(transparent)]
    Upstream(#[from] WorkflowApiError),

    /// The session is still saving; the client should retry afterwards.
    #[error("A save is already in progress for this session")]
    SaveInProgress,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(core) => Self::Core(core),
            SessionError::Upstream(upstream) => Self::Upstream(upstream),
            SessionError::SaveInProgress => Self::SaveInProgress,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Parse { .. } => (StatusCode::BAD_REQUEST, "INVALID_JSON", core.to_string()),
                CoreError::EmptyArray => {
                    (StatusCode::BAD_REQUEST, "EMPTY_CONFIG_ARRAY", core.to_string())
                }
                CoreError::MissingId => {
                    (StatusCode::BAD_REQUEST, "MISSING_CONFIG_ID", core.to_string())
                }
            },

            // --- Upstream errors ---
            AppError::Upstream(err) if err.is_not_found() => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Upstream API error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The workflow service could not complete the request".to_string(),
                )
            }

            // --- Session state ---
            AppError::SaveInProgress => {
                (StatusCode::CONFLICT, "SAVE_IN_PROGRESS", self.to_string())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
