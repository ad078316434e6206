use crate::config::Config;
use crate::directory_client::ArcepClient;
use crate::errors::AppError;
use crate::models::EligibilityRequest;
use crate::tool::{call_fixed_line_eligibilities, tool_definition, ToolDefinition, ToolResult, TOOL_NAME};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the ARCEP directory.
    pub client: ArcepClient,
}

/// Body of `POST /tools/call`.
#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Builds the HTTP surface.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/call", post(call_tool))
        .with_state(state)
        // Tool arguments are two short strings
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
///
/// Returns the service status and version; does not touch the ARCEP API.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "arcep-api-eligibility",
            "version": env!("CARGO_PKG_VERSION"),
            "credential_configured": state.config.arcep_api_key.is_some()
        })),
    )
}

/// GET /tools
pub async fn list_tools() -> Json<Vec<ToolDefinition>> {
    tracing::info!("[LIST TOOLS] Received request to list available tools");
    Json(vec![tool_definition()])
}

/// POST /tools/call
///
/// Pipeline failures come back as an error-flagged `ToolResult` with HTTP 200;
/// only an unknown tool or malformed arguments are HTTP errors.
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(call): Json<ToolCallRequest>,
) -> Result<Json<ToolResult>, AppError> {
    if call.name != TOOL_NAME {
        tracing::warn!("Unknown tool requested: {}", call.name);
        return Err(AppError::BadRequest(format!("Unknown tool: {}", call.name)));
    }

    let request: EligibilityRequest = serde_json::from_value(call.arguments)
        .map_err(|e| AppError::BadRequest(format!("Invalid arguments: {}", e)))?;
    if request.street_address.trim().is_empty() || request.town_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "streetAddress and townName must not be empty".to_string(),
        ));
    }

    Ok(Json(
        call_fixed_line_eligibilities(&state.client, &request).await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let config = Config::default();
        let client = ArcepClient::from_config(&config).unwrap();
        Arc::new(AppState { config, client })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_call(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/tools/call")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["credential_configured"], false);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let response = router(test_state())
            .oneshot(Request::builder().uri("/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body[0]["name"], TOOL_NAME);
    }

    #[tokio::test]
    async fn test_missing_credential_is_an_error_result() {
        let response = router(test_state())
            .oneshot(post_call(json!({
                "name": TOOL_NAME,
                "arguments": {"streetAddress": "10 rue de la Paix", "townName": "Paris"}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["isError"], true);
        assert_eq!(
            body["content"][0]["text"],
            "Error: ARCEP_API_KEY environment variable is not set"
        );
    }

    #[tokio::test]
    async fn test_bad_calls_are_rejected() {
        let response = router(test_state())
            .oneshot(post_call(json!({"name": "unknown", "arguments": {}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router(test_state())
            .oneshot(post_call(json!({
                "name": TOOL_NAME,
                "arguments": {"streetAddress": "", "townName": "Paris"}
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
