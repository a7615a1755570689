//! HTTP ingress
//!
//! Axum router exposing the coordinator. Queries return the rendered Markdown
//! document; every other endpoint and every error is JSON.

use crate::config::RouterConfig;
use crate::error::Error;
use crate::orchestrator::Coordinator;
use crate::types::CapabilityTag;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query as QueryParams, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Query pipeline
    pub coordinator: Arc<Coordinator>,
    /// Default number of history entries returned
    pub listing_limit: usize,
}

impl AppState {
    /// Create state with the default listing limit
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self {
            coordinator,
            listing_limit: 10,
        }
    }

    /// Set the default history listing limit
    pub fn with_listing_limit(mut self, limit: usize) -> Self {
        self.listing_limit = limit.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SpecialistEntry {
    tag: CapabilityTag,
    name: String,
    status: &'static str,
}

/// Error body returned by every endpoint
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            error!(error = %err, "query processing failed");
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "internal server error".to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/query", post(query_handler))
        .route("/api/status", get(status_handler))
        .route("/api/specialists", get(specialists_handler))
        .route("/api/history", get(history_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(coordinator: Arc<Coordinator>, config: &RouterConfig) -> crate::Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(coordinator).with_listing_limit(config.history.listing_limit);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "rejected query body");
        ApiError::bad_request(format!("invalid request body: {}", rejection.body_text()))
    })?;

    let text = request
        .query
        .ok_or_else(|| ApiError::bad_request("missing 'query' field"))?;
    if text.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    let response = state.coordinator.process(&text).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        response.document,
    )
        .into_response())
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "specialists": state.coordinator.registry().len(),
        "queries_recorded": state.coordinator.query_log().len(),
    }))
}

async fn specialists_handler(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = &state.coordinator;
    let specialists: Vec<SpecialistEntry> = coordinator
        .registry()
        .profiles()
        .map(|profile| SpecialistEntry {
            tag: profile.tag,
            name: profile.name.clone(),
            status: if coordinator.specialists().get(profile.tag).is_some() {
                "active"
            } else {
                "unavailable"
            },
        })
        .collect();

    Json(json!({
        "total": specialists.len(),
        "specialists": specialists,
    }))
}

async fn history_handler(
    State(state): State<AppState>,
    params: Result<QueryParams<HistoryParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let QueryParams(params) =
        params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let limit = params.limit.unwrap_or(state.listing_limit);

    let log = state.coordinator.query_log();
    Ok(Json(json!({
        "history": log.history(limit),
        "total": log.len(),
    })))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "endpoint not found" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SpecialistRegistry;
    use crate::specialist::{Payload, Specialist, SpecialistSet};
    use crate::specialists::MissionPlanningSpecialist;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct Echo(CapabilityTag);

    #[async_trait]
    impl Specialist for Echo {
        fn tag(&self) -> CapabilityTag {
            self.0
        }

        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, request: &str) -> crate::Result<Payload> {
            Ok(Payload::Opaque(json!({ "request": request })))
        }
    }

    fn app() -> Router {
        let specialists = SpecialistSet::new()
            .with(Arc::new(Echo(CapabilityTag::StructuredData)))
            .with(Arc::new(MissionPlanningSpecialist::new()));
        let coordinator = Coordinator::new(SpecialistRegistry::default(), specialists);
        router(AppState::new(Arc::new(coordinator)).with_listing_limit(2))
    }

    fn post_query(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_query_returns_markdown() {
        let response = app()
            .oneshot(post_query(r#"{"query": "lunar mission risks"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/markdown"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let document = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(document.contains("- **MISSION_PLANNING** ✅"));
        assert!(document.contains("## Recommendations"));
    }

    #[tokio::test]
    async fn test_bad_query_requests() {
        for body in [r#"{"query": "   "}"#, r#"{"text": "hi"}"#, "not json"] {
            let response = app().oneshot(post_query(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
            assert!(json_body(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_status_and_specialists() {
        let app = app();
        let status = json_body(app.clone().oneshot(get("/api/status")).await.unwrap()).await;
        assert_eq!(status["status"], "online");
        assert_eq!(status["specialists"], 3);
        assert_eq!(status["queries_recorded"], 0);

        let listing = json_body(app.oneshot(get("/api/specialists")).await.unwrap()).await;
        assert_eq!(listing["total"], 3);
        assert_eq!(listing["specialists"][0]["tag"], "structured_data");
        assert_eq!(listing["specialists"][0]["status"], "active");
        assert_eq!(listing["specialists"][1]["status"], "unavailable");
    }

    #[tokio::test]
    async fn test_history_uses_default_and_explicit_limit() {
        let app = app();
        for text in ["first mission", "second mission", "third mission"] {
            let body = json!({ "query": text }).to_string();
            let response = app.clone().oneshot(post_query(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let history = json_body(app.clone().oneshot(get("/api/history")).await.unwrap()).await;
        assert_eq!(history["total"], 3);
        let entries = history["history"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["text"], "second mission");
        assert_eq!(entries[1]["id"], "q-3");

        let history = json_body(app.oneshot(get("/api/history?limit=5")).await.unwrap()).await;
        assert_eq!(history["history"].as_array().unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_queries_on_spawned_tasks() {
        let app = app();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    let body = json!({ "query": format!("mission {} to mars", i) }).to_string();
                    app.oneshot(post_query(&body)).await.unwrap().status()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }
        let history = json_body(app.oneshot(get("/api/history?limit=20")).await.unwrap()).await;
        assert_eq!(history["total"], 8);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app().oneshot(get("/api/nothing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "endpoint not found");
    }
}
