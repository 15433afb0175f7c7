use inspectra_core::error::CoreError;

/// Errors from the upstream workflow and company APIs.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("Workflow API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The API returned data the engine cannot accept.
    #[error("Invalid upstream data: {0}")]
    InvalidData(#[from] CoreError),
}

impl WorkflowApiError {
    /// Whether the upstream reported the requested entity as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ApiError { status: 404, .. }
        )
    }
}

/// Errors from session operations that combine local edits with I/O.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Upstream(#[from] WorkflowApiError),

    /// Another save of the same session has not finished yet.
    #[error("A save is already in progress for this session")]
    SaveInProgress,
}
