//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use inspectra_api::error::AppError;
use inspectra_client::WorkflowApiError;
use inspectra_core::error::CoreError;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Block",
        id: "form-step-9".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Block with id form-step-9 not found");
}

#[tokio::test]
async fn parse_error_returns_400_invalid_json() {
    let err = AppError::Core(CoreError::Parse {
        context: "form block".to_string(),
        message: "EOF while parsing".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_JSON");
    assert!(json["error"].as_str().unwrap().contains("form block"));
}

#[tokio::test]
async fn resolver_errors_return_400() {
    let (status, json) = error_to_response(AppError::Core(CoreError::EmptyArray)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMPTY_CONFIG_ARRAY");

    let (status, json) = error_to_response(AppError::Core(CoreError::MissingId)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MISSING_CONFIG_ID");
}

#[tokio::test]
async fn upstream_failure_returns_502_and_hides_body() {
    let err = AppError::Upstream(WorkflowApiError::ApiError {
        status: 500,
        body: "stack trace from upstream".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("stack trace"));
}

#[tokio::test]
async fn upstream_not_found_returns_404() {
    let err = AppError::Upstream(WorkflowApiError::ApiError {
        status: 404,
        body: "no such workflow".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn concurrent_save_returns_409() {
    let (status, json) = error_to_response(AppError::SaveInProgress).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "SAVE_IN_PROGRESS");
}
