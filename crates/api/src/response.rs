//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Exported JSON text, returned inside a [`DataResponse`].
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub content: String,
}
