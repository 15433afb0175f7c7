#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid JSON for {context}: {message}")]
    Parse { context: String, message: String },

    #[error("Configuration payload is an empty array")]
    EmptyArray,

    #[error("Configuration payload is missing the required 'id' field")]
    MissingId,
}

impl CoreError {
    /// Build a [`CoreError::Parse`] from a serde_json error.
    pub fn parse(context: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            message: err.to_string(),
        }
    }
}
