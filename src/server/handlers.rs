//! HTTP request handlers for API endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::warn;

use super::AppState;
use crate::core::languages::LanguageConfig;
use crate::engine::ExecutorError;
use crate::playground::{EstimateRequest, EstimateResult, RunError, RunRequest, RunResult};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub languages: Vec<LanguageConfig>,
}

/// Error body; `output` carries the text the editor shows in its output pane
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub output: String,
}

impl IntoResponse for RunError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RunError::Executor(ExecutorError::PollTimeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            RunError::Executor(_) => StatusCode::BAD_GATEWAY,
            RunError::SourceTooLarge { .. } | RunError::StdinTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::BAD_REQUEST,
        };
        let message = self.to_string();
        let body = ErrorResponse {
            output: format!("Error: {}", message),
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Languages offered in the editor dropdown
pub async fn list_languages(State(state): State<AppState>) -> impl IntoResponse {
    let table = state.playground.languages();
    Json(LanguagesResponse {
        default: table.default_language().id.clone(),
        languages: table.list().to_vec(),
    })
}

/// Complexity estimate only; nothing is executed
pub async fn estimate_complexity(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResult>, RunError> {
    state.playground.estimate_request(&request).map(Json)
}

/// Run code on Judge0 and attach the complexity estimate
pub async fn run_code(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResult>, RunError> {
    match state.playground.process_run_request(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if e.is_validation() {
                warn!("Rejected run request: {}", e);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playground::tests::{playground_with, FakeExecutor};
    use crate::server::build_router;
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn spawn_server(executor: Arc<FakeExecutor>) -> String {
        let state = AppState::new(playground_with(executor));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let base = spawn_server(Arc::new(FakeExecutor::new())).await;
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), 200);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_languages_endpoint() {
        let base = spawn_server(Arc::new(FakeExecutor::new())).await;
        let json: Value = reqwest::get(format!("{}/api/languages", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(json["default"], "54");
        assert_eq!(json["languages"].as_array().unwrap().len(), 5);
        assert_eq!(json["languages"][0]["mode"], "cpp");
    }

    #[tokio::test]
    async fn test_estimate_endpoint() {
        let base = spawn_server(Arc::new(FakeExecutor::new())).await;
        let code = "int f(int n) { if (n < 2) return n; return f(n - 1) + f(n - 2); }";
        let json: Value = reqwest::Client::new()
            .post(format!("{}/api/estimate", base))
            .json(&json!({ "code": code }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(json["complexity"]["time"], "O(2^n)");
        assert_eq!(json["complexity"]["space"], "O(1)");
        assert_eq!(json["stats"]["lines"], 1);
    }

    #[tokio::test]
    async fn test_run_endpoint() {
        let executor = Arc::new(FakeExecutor::new());
        let base = spawn_server(executor.clone()).await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/run", base))
            .json(&json!({ "code": "print(input())", "language": "71", "stdin": "hi" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["output"], "hi");
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["complexity"]["time"], "O(1)");
        assert_eq!(executor.submissions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_endpoint_rejects_empty_code() {
        let base = spawn_server(Arc::new(FakeExecutor::new())).await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/run", base))
            .json(&json!({ "code": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["error"], "source code is empty");
    }

    #[tokio::test]
    async fn test_run_endpoint_executor_failure() {
        let base = spawn_server(Arc::new(FakeExecutor::failing())).await;
        let response = reqwest::Client::new()
            .post(format!("{}/api/run", base))
            .json(&json!({ "code": "int main() {}" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 502);

        let json: Value = response.json().await.unwrap();
        assert!(json["output"].as_str().unwrap().starts_with("Error: "));
    }
}
