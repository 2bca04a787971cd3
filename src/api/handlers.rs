//! HTTP request handlers for the meal voucher engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::run_benefit;
use crate::models::Competence;

use super::request::RunRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(run_handler))
        .with_state(state)
}

fn json_error(status: StatusCode, error: ApiError) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(error)).into_response()
}

fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /runs endpoint.
///
/// Runs the benefit computation over the posted source tables and returns
/// the full run result.
async fn run_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                rejection_error(correlation_id, rejection),
            );
        }
    };

    let outcome = Competence::parse(&request.competence)
        .and_then(|competence| run_benefit(&request.sources, competence, state.config()));

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %result.run_id,
                competence = %result.competence,
                rows = result.output.rows.len(),
                total = %result.summary.total_value,
                duration_us = result.duration_us,
                "Run completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Run rejected"
            );
            let api_error: ApiErrorResponse = err.into();
            json_error(api_error.status, api_error.error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenefitConfig;
    use crate::models::{RunResult, SourceKind};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(BenefitConfig::default())
    }

    fn complete_sources() -> Value {
        let mut sources = serde_json::Map::new();
        for kind in SourceKind::ALL {
            sources.insert(
                kind.as_str().to_string(),
                json!({ "columns": ["MATRICULA"], "rows": [] }),
            );
        }
        sources.insert(
            "active_employees".to_string(),
            json!({
                "columns": ["MATRICULA", "Sindicato", "TITULO DO CARGO"],
                "rows": [[1001, "SINDPD SP - SIND TRAB", "ANALISTA"]]
            }),
        );
        sources.insert(
            "union_workdays".to_string(),
            json!({ "columns": ["SINDICATO", "DIAS UTEIS"], "rows": [["SINDPD SP", 22]] }),
        );
        Value::Object(sources)
    }

    async fn post_runs(body: String) -> (StatusCode, Value) {
        let app = create_router(create_test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/runs")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_run_returns_result() {
        let body = json!({ "competence": "2025-05", "sources": complete_sources() });
        let (status, json) = post_runs(body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let result: RunResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.competence.to_string(), "2025-05");
        assert_eq!(result.output.rows.len(), 1);
        assert_eq!(result.output.rows[0].employee_id, "1001");
        assert_eq!(result.output.rows[0].total.to_string(), "825.00");
    }

    #[tokio::test]
    async fn test_missing_source_returns_422() {
        let mut sources = complete_sources();
        sources.as_object_mut().unwrap().remove("vacations");
        let body = json!({ "competence": "2025-05", "sources": sources });

        let (status, json) = post_runs(body.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "MISSING_SOURCE_TABLE");
        assert!(json["message"].as_str().unwrap().contains("vacations"));
    }

    #[tokio::test]
    async fn test_invalid_competence_returns_400() {
        let body = json!({ "competence": "2025-13", "sources": complete_sources() });

        let (status, json) = post_runs(body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_COMPETENCE");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, json) = post_runs("{ not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_competence_is_validation_error() {
        let body = json!({ "sources": complete_sources() });

        let (status, json) = post_runs(body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let app = create_router(create_test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/runs")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
