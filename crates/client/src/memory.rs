//! Process-local workflow and company store.
//!
//! Stands in for the upstream API when none is configured. Thread-safe via
//! interior `RwLock`s; share it behind an `Arc`.

use std::collections::HashMap;

use async_trait::async_trait;
use inspectra_core::company::{Company, DuplicateCompanyRequest};
use inspectra_core::duplication::{duplicate_company_journeys, JourneyDuplication};
use inspectra_core::journey::JourneyDocument;
use inspectra_core::types::{CompanyId, WorkflowId};
use inspectra_core::workflow::{
    CreateWorkflowRequest, DuplicateWorkflowRequest, UpdateWorkflowRequest, WorkflowRecord,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::{CompanyApi, WorkflowApi};
use crate::error::WorkflowApiError;

#[derive(Default)]
pub struct InMemoryWorkflowApi {
    workflows: RwLock<HashMap<WorkflowId, WorkflowRecord>>,
    companies: RwLock<Vec<Company>>,
}

impl InMemoryWorkflowApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `companies`.
    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            workflows: RwLock::new(HashMap::new()),
            companies: RwLock::new(companies),
        }
    }

    /// Number of stored workflows.
    pub async fn workflow_count(&self) -> usize {
        self.workflows.read().await.len()
    }

    fn workflow_not_found(id: &str) -> WorkflowApiError {
        WorkflowApiError::NotFound {
            entity: "Workflow",
            id: id.to_string(),
        }
    }

    fn record_from_document(
        doc: &JourneyDocument,
        id: WorkflowId,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let now = chrono::Utc::now();
        Ok(WorkflowRecord {
            id,
            company_id: doc.company_id.clone(),
            name: doc.name.clone(),
            description: doc.description_opt(),
            is_active: doc.is_active,
            blocks: doc.to_wire_blocks()?,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

/// A record is visible to a company-scoped request only when it belongs to
/// that company.
fn in_scope(record: &WorkflowRecord, company_id: Option<&str>) -> bool {
    company_id.map_or(true, |c| record.company_id.as_deref() == Some(c))
}

#[async_trait]
impl WorkflowApi for InMemoryWorkflowApi {
    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let now = chrono::Utc::now();
        let record = WorkflowRecord {
            id: Uuid::new_v4().to_string(),
            company_id: Some(request.company_id),
            name: request.name,
            description: request.description,
            is_active: request.is_active,
            blocks: request.blocks,
            created_at: Some(now),
            updated_at: Some(now),
        };
        // Reject anything a later load could not rebuild.
        JourneyDocument::from_record(record.clone())?;

        self.workflows
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        tracing::debug!(workflow_id = %record.id, "Created workflow");
        Ok(record)
    }

    async fn update_workflow(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let mut workflows = self.workflows.write().await;
        let current = workflows
            .get(id)
            .filter(|r| in_scope(r, company_id))
            .ok_or_else(|| Self::workflow_not_found(id))?;

        let mut updated = current.clone();
        if let Some(name) = request.name {
            updated.name = name;
        }
        if let Some(description) = request.description {
            updated.description = (!description.trim().is_empty()).then_some(description);
        }
        if let Some(is_active) = request.is_active {
            updated.is_active = is_active;
        }
        if let Some(blocks) = request.blocks {
            updated.blocks = blocks;
        }
        updated.updated_at = Some(chrono::Utc::now());
        JourneyDocument::from_record(updated.clone())?;

        workflows.insert(id.to_string(), updated.clone());
        tracing::debug!(workflow_id = %id, "Updated workflow");
        Ok(updated)
    }

    async fn get_workflow_by_id(
        &self,
        id: &str,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        self.workflows
            .read()
            .await
            .get(id)
            .filter(|r| in_scope(r, company_id))
            .cloned()
            .ok_or_else(|| Self::workflow_not_found(id))
    }

    async fn duplicate_workflow(
        &self,
        id: &str,
        request: DuplicateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let source = self.get_workflow_by_id(id, None).await?;
        let source = JourneyDocument::from_record(source)?;

        let mut duplication = JourneyDuplication::new(&source);
        duplication.name = request.name;
        if request.company_id.is_some() {
            duplication.company_id = request.company_id;
        }
        let copy = duplication.execute()?;

        let record = Self::record_from_document(&copy, Uuid::new_v4().to_string())?;
        self.workflows
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        tracing::info!(source_id = %id, workflow_id = %record.id, "Duplicated workflow");
        Ok(record)
    }
}

#[async_trait]
impl CompanyApi for InMemoryWorkflowApi {
    async fn list_companies(&self) -> Result<Vec<Company>, WorkflowApiError> {
        Ok(self.companies.read().await.clone())
    }

    async fn get_company(&self, id: &CompanyId) -> Result<Company, WorkflowApiError> {
        self.companies
            .read()
            .await
            .iter()
            .find(|c| c.id == *id)
            .cloned()
            .ok_or_else(|| WorkflowApiError::NotFound {
                entity: "Company",
                id: id.clone(),
            })
    }

    async fn duplicate_company(
        &self,
        request: DuplicateCompanyRequest,
    ) -> Result<Company, WorkflowApiError> {
        let source = self.get_company(&request.source_company_id).await?;
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            parent_company_id: request.parent_company_id,
            report_settings: request.report_settings,
            config_modules: request.config_modules,
        };

        if request.inherit.journeys {
            let source_journeys = self
                .workflows
                .read()
                .await
                .values()
                .filter(|r| r.company_id.as_deref() == Some(source.id.as_str()))
                .cloned()
                .map(JourneyDocument::from_record)
                .collect::<Result<Vec<_>, _>>()?;
            let copies = duplicate_company_journeys(&source_journeys, &company.id)?;

            let mut workflows = self.workflows.write().await;
            for copy in &copies {
                let record = Self::record_from_document(copy, Uuid::new_v4().to_string())?;
                workflows.insert(record.id.clone(), record);
            }
            tracing::debug!(
                company_id = %company.id,
                journey_count = copies.len(),
                "Copied company journeys"
            );
        }

        self.companies.write().await.push(company.clone());
        tracing::info!(source_id = %source.id, company_id = %company.id, "Duplicated company");
        Ok(company)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use inspectra_core::block::BlockType;
    use inspectra_core::company::{CompanyDuplicationContext, ReportSettings};

    use super::*;

    fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            parent_company_id: None,
            report_settings: ReportSettings::default(),
            config_modules: serde_json::Value::Null,
        }
    }

    fn journey(company_id: &str) -> JourneyDocument {
        let mut doc = JourneyDocument::new("Std Inspection", Some(company_id.to_string()));
        doc.add_block(BlockType::Form).unwrap();
        doc.add_block(BlockType::AddDamage).unwrap();
        doc
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let api = InMemoryWorkflowApi::new();
        let created = api
            .create_workflow(journey("acme").to_create_request().unwrap())
            .await
            .unwrap();

        let fetched = api.get_workflow_by_id(&created.id, None).await.unwrap();
        assert_eq!(fetched.name, "Std Inspection");
        assert_eq!(fetched.blocks.len(), 2);
    }

    #[tokio::test]
    async fn fetch_scoped_to_other_company_is_not_found() {
        let api = InMemoryWorkflowApi::new();
        let created = api
            .create_workflow(journey("acme").to_create_request().unwrap())
            .await
            .unwrap();

        let result = api.get_workflow_by_id(&created.id, Some("globex")).await;
        assert_matches!(result, Err(WorkflowApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_replaces_blocks() {
        let api = InMemoryWorkflowApi::new();
        let mut doc = journey("acme");
        let created = api
            .create_workflow(doc.to_create_request().unwrap())
            .await
            .unwrap();

        doc.remove_block("add-damage-step-1").unwrap();
        let updated = api
            .update_workflow(&created.id, doc.to_update_request().unwrap(), Some("acme"))
            .await
            .unwrap();
        assert_eq!(updated.blocks.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_workflow_gets_new_id_and_name() {
        let api = InMemoryWorkflowApi::new();
        let created = api
            .create_workflow(journey("acme").to_create_request().unwrap())
            .await
            .unwrap();

        let copy = api
            .duplicate_workflow(
                &created.id,
                DuplicateWorkflowRequest {
                    name: "Copy".to_string(),
                    company_id: None,
                },
            )
            .await
            .unwrap();
        assert_ne!(copy.id, created.id);
        assert_eq!(copy.name, "Copy");
        assert_eq!(copy.company_id.as_deref(), Some("acme"));
        assert_eq!(api.workflow_count().await, 2);
    }

    #[tokio::test]
    async fn duplicate_company_copies_journeys_when_inherited() {
        let api = InMemoryWorkflowApi::with_companies(vec![
            company("acme", "Acme"),
            company("globex", "Globex"),
        ]);
        api.create_workflow(journey("acme").to_create_request().unwrap())
            .await
            .unwrap();

        let source = api.get_company(&"acme".to_string()).await.unwrap();
        let all = api.list_companies().await.unwrap();
        let mut ctx = CompanyDuplicationContext::from_company(&source, &all).unwrap();
        ctx.sender_name = "Acme Two".to_string();

        let copy = api
            .duplicate_company(ctx.build_request().unwrap())
            .await
            .unwrap();
        assert_eq!(copy.name, "Acme (Copy)");
        assert_eq!(api.list_companies().await.unwrap().len(), 3);
        assert_eq!(api.workflow_count().await, 2);
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let api = InMemoryWorkflowApi::new();
        let result = api.get_company(&"nope".to_string()).await;
        assert!(result.unwrap_err().is_not_found());
    }
}
