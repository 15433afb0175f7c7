#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use inspectra_api::config::ServerConfig;
use inspectra_api::router::build_app_router;
use inspectra_api::sessions::SessionStore;
use inspectra_api::state::AppState;
use inspectra_client::{Backend, CompanyApi, InMemoryWorkflowApi, WorkflowApi, WorkflowApiError};
use inspectra_core::company::{Company, DuplicateCompanyRequest, ReportSettings};
use inspectra_core::types::CompanyId;
use inspectra_core::workflow::{
    CreateWorkflowRequest, DuplicateWorkflowRequest, UpdateWorkflowRequest, WorkflowRecord,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        workflow_api_url: None,
        workflow_api_token: None,
        session_idle_ttl_secs: 3600,
        session_sweep_interval_secs: 60,
    }
}

/// Companies every test backend starts with.
pub fn seed_companies() -> Vec<Company> {
    let company = |id: &str, name: &str| Company {
        id: id.to_string(),
        name: name.to_string(),
        parent_company_id: None,
        report_settings: ReportSettings::default(),
        config_modules: serde_json::json!({ "chaseUp": { "enabled": true } }),
    };
    vec![company("acme", "Acme"), company("globex", "Globex")]
}

/// Build the full application router over an in-memory backend.
///
/// Uses the same middleware stack as production.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(InMemoryWorkflowApi::with_companies(seed_companies())))
}

/// Build the application router over any backend.
pub fn build_test_app_with<B: Backend + 'static>(backend: Arc<B>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionStore::new()),
        backend,
        backend_kind: "memory",
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Slow backend
// ---------------------------------------------------------------------------

/// In-memory backend whose workflow creates take `delay`, so requests
/// against it can overlap.
pub struct SlowBackend {
    pub inner: InMemoryWorkflowApi,
    pub delay: Duration,
}

impl SlowBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryWorkflowApi::with_companies(seed_companies()),
            delay,
        }
    }
}

#[async_trait]
impl WorkflowApi for SlowBackend {
    async fn create_workflow(
        &self,
        request: CreateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create_workflow(request).await
    }

    async fn update_workflow(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        self.inner.update_workflow(id, request, company_id).await
    }

    async fn get_workflow_by_id(
        &self,
        id: &str,
        company_id: Option<&str>,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        self.inner.get_workflow_by_id(id, company_id).await
    }

    async fn duplicate_workflow(
        &self,
        id: &str,
        request: DuplicateWorkflowRequest,
    ) -> Result<WorkflowRecord, WorkflowApiError> {
        self.inner.duplicate_workflow(id, request).await
    }
}

#[async_trait]
impl CompanyApi for SlowBackend {
    async fn list_companies(&self) -> Result<Vec<Company>, WorkflowApiError> {
        self.inner.list_companies().await
    }

    async fn get_company(&self, id: &CompanyId) -> Result<Company, WorkflowApiError> {
        self.inner.get_company(id).await
    }

    async fn duplicate_company(
        &self,
        request: DuplicateCompanyRequest,
    ) -> Result<Company, WorkflowApiError> {
        self.inner.duplicate_company(request).await
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Open a blank session and return its id.
pub async fn open_session(app: Router, name: &str, company_id: Option<&str>) -> String {
    let response = post_json(
        app,
        "/api/v1/sessions",
        serde_json::json!({ "name": name, "companyId": company_id }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["sessionId"].as_str().unwrap().to_string()
}
