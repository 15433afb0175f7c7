//! Upstream workflow and company API clients plus the journey editing
//! session built on top of them.
//!
//! - [`WorkflowApi`] / [`CompanyApi`] — the persistence seams.
//! - [`HttpWorkflowApi`] — reqwest implementation against the real API.
//! - [`InMemoryWorkflowApi`] — process-local stand-in used when no
//!   upstream is configured, and in tests.
//! - [`JourneySession`] — one operator's editing state for one journey.

pub mod api;
pub mod error;
pub mod http;
pub mod memory;
pub mod session;

pub use api::{Backend, CompanyApi, WorkflowApi};
pub use error::{SessionError, WorkflowApiError};
pub use http::HttpWorkflowApi;
pub use memory::InMemoryWorkflowApi;
pub use session::{JourneySession, PreparedSave, SaveRequest};
