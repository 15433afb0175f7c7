//! Persistence seams consumed by the console.

use async_trait::async_trait;
use inspectra_core::company::{Company, DuplicateCompanyRequest};
use inspectra_core::types::CompanyId;
use inspectra_core::workflow::{
    CreateWorkflowRequest, DuplicateWorkflowRequest, UpdateWorkflowRequest, WorkflowRecord,
};

use crate::error::WorkflowApiError;

/// Workflow (persisted journey) operations.
///
/// `company_id` scopes reads and updates to one company when given.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError>;

    async fn update_workflow(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError>;

    async fn get_workflow_by_id(
        &self,
        id: &str,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError>;

    /// Server-side copy of a persisted workflow.
    async fn duplicate_workflow(
        &self,
        id: &str,
        request: DuplicateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError>;
}

/// Company operations.
#[async_trait]
pub trait CompanyApi: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<Company>, WorkflowApiError>;

    async fn get_company(&self, id: &CompanyId) -> Result<Company, WorkflowApiError>;

    async fn duplicate_company(
        &self,
        request: DuplicateCompanyRequest,
    ) -> Result<Company, WorkflowApiError>;
}

/// Everything the console needs from upstream.
pub trait Backend: WorkflowApi + CompanyApi {}

impl<T: WorkflowApi + CompanyApi> Backend for T {}
