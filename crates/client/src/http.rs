//! REST client for the upstream workflow and company API.
//!
//! Paths:
//!
//! ```text
//! POST /workflows                     create
//! PUT  /workflows/{id}?companyId=     update
//! GET  /workflows/{id}?companyId=     fetch
//! POST /workflows/{id}/duplicate      server-side copy
//! GET  /companies                     list
//! GET  /companies/{id}                fetch
//! POST /companies/{id}/duplicate      copy a company
//! ```

use async_trait::async_trait;
use inspectra_core::company::{Company, DuplicateCompanyRequest};
use inspectra_core::types::CompanyId;
use inspectra_core::workflow::{
    CreateWorkflowRequest, DuplicateWorkflowRequest, UpdateWorkflowRequest, WorkflowRecord,
};

use crate::api::{CompanyApi, WorkflowApi};
use crate::error::WorkflowApiError;

/// HTTP client for one workflow API deployment.
pub struct HttpWorkflowApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpWorkflowApi {
    /// * `base_url` - API root, e.g. `https://api.example.com/v2`.
    /// * `token` - bearer token sent with every request, if any.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, token)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn scoped(builder: reqwest::RequestBuilder, company_id: Option<&str>) -> reqwest::RequestBuilder {
        match company_id {
            Some(company_id) => builder.query(&[("companyId", company_id)]),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise an
    /// [`WorkflowApiError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, WorkflowApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), %body, "Workflow API request failed");
            return Err(WorkflowApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WorkflowApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WorkflowApi for HttpWorkflowApi {
    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let response = self
            .request(reqwest::Method::POST, "/workflows")
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_workflow(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let builder = self.request(reqwest::Method::PUT, &format!("/workflows/{id}"));
        let response = Self::scoped(builder, company_id)
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get_workflow_by_id(
        &self,
        id: &str,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let builder = self.request(reqwest::Method::GET, &format!("/workflows/{id}"));
        let response = Self::scoped(builder, company_id).send().await?;
        Self::parse_response(response).await
    }

    async fn duplicate_workflow(
        &self,
        id: &str,
        request: DuplicateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        let response = self
            .request(reqwest::Method::POST, &format!("/workflows/{id}/duplicate"))
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl CompanyApi for HttpWorkflowApi {
    async fn list_companies(&self) -> Result<Vec<Company>, WorkflowApiError> {
        let response = self
            .request(reqwest::Method::GET, "/companies")
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get_company(&self, id: &CompanyId) -> Result<Company, WorkflowApiError> {
        let response = self
            .request(reqwest::Method::GET, &format!("/companies/{id}"))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn duplicate_company(
        &self,
        request: DuplicateCompanyRequest,
    ) -> Result<Company, WorkflowApiError> {
        let path = format!("/companies/{}/duplicate", request.source_company_id);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&request)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
