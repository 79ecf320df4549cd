//! HTTP transport for the agent, powered by axum
//!
//! Serves:
//! - `POST /`                            JSON-RPC 2.0 endpoint
//! - `GET  /.well-known/agent.json`      Agent Card discovery
//! - `GET  /.well-known/agent-card.json` Agent Card discovery (current A2A path)
//! - `GET  /health`                      Liveness probe

pub mod card;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::{
    backend::Summarizer,
    codec::jsonrpc::{JsonRpcRequest, JsonRpcResponse},
    config::ServerConfig,
    layer::{JsonRpcValidationLayer, JsonRpcValidationService},
    protocol::{agent::AgentCard, error::A2AError, task::now_timestamp},
    service::A2AServerService,
    store::TaskStore,
};

pub use card::build_agent_card;

/// Protocol name reported by the liveness probe
pub const PROTOCOL_NAME: &str = "A2A (Agent2Agent)";

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    rpc: JsonRpcValidationService<A2AServerService>,
    card: Arc<AgentCard>,
}

impl AppState {
    /// Wrap a dispatcher in the validation layer and pair it with a card
    pub fn new(service: A2AServerService, card: AgentCard) -> Self {
        let rpc = ServiceBuilder::new()
            .layer(JsonRpcValidationLayer::new())
            .service(service);

        Self {
            rpc,
            card: Arc::new(card),
        }
    }

    /// Build the state from configuration, a fresh store and a summarizer
    pub fn from_config(config: &ServerConfig, summarizer: Arc<dyn Summarizer>) -> Self {
        Self::new(
            A2AServerService::from_parts(TaskStore::new(), summarizer),
            build_agent_card(config),
        )
    }
}

/// Build the axum router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_jsonrpc))
        .route("/.well-known/agent.json", get(get_agent_card))
        .route("/.well-known/agent-card.json", get(get_agent_card))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(config: ServerConfig, summarizer: Arc<dyn Summarizer>) -> anyhow::Result<()> {
    let app = build_router(AppState::from_config(&config, summarizer));
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!(address = %addr, "agent listening");
    info!(
        "Agent Card: {}/.well-known/agent.json",
        config.public_url()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("agent stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// POST / JSON-RPC 2.0 endpoint
///
/// Envelope failures are answered with HTTP 400; everything the dispatcher
/// produces, including JSON-RPC errors, goes out with HTTP 200.
async fn handle_jsonrpc(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return reject(Value::Null, A2AError::Parse(e.to_string())),
    };
    debug!(request = %value, "JSON-RPC request body");

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => return reject(id, A2AError::InvalidRequest(e.to_string())),
    };

    match state.rpc.oneshot(request).await {
        Ok(response) => {
            debug!(is_error = response.is_error(), "JSON-RPC response ready");
            (StatusCode::OK, Json(response))
        }
        Err(e) => reject(id, e),
    }
}

fn reject(id: Value, error: A2AError) -> (StatusCode, Json<JsonRpcResponse>) {
    warn!(error = %error, "rejected request at transport boundary");
    (
        StatusCode::BAD_REQUEST,
        Json(JsonRpcResponse::from_error(id, &error)),
    )
}

/// GET /.well-known/agent.json
async fn get_agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": now_timestamp(),
        "agent": state.card.name,
        "protocol": PROTOCOL_NAME,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};

    use crate::backend::MockSummarizer;

    use super::*;

    fn app(summarizer: MockSummarizer) -> Router {
        build_router(AppState::from_config(
            &ServerConfig::new(),
            Arc::new(summarizer),
        ))
    }

    fn idle_app() -> Router {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);
        app(summarizer)
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(body.into())
            .expect("request")
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");

        let resp = idle_app().oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["agent"], "Audio Intelligence Agent");
        assert_eq!(json["protocol"], "A2A (Agent2Agent)");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_agent_card_endpoints() {
        for path in ["/.well-known/agent.json", "/.well-known/agent-card.json"] {
            let req = Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request");

            let resp = idle_app().oneshot(req).await.expect("response");
            assert_eq!(resp.status(), StatusCode::OK);

            let json = body_json(resp).await;
            assert_eq!(json["name"], "Audio Intelligence Agent");
            assert_eq!(json["skills"].as_array().map(Vec::len), Some(2));
        }
    }

    #[tokio::test]
    async fn test_jsonrpc_send_message() {
        let mut summarizer = MockSummarizer::new();
        summarizer
            .expect_summarize()
            .times(1)
            .returning(|_| Ok("a short summary".to_string()));

        let body = json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "parts": [{"kind": "text", "text": "please check https://cdn.example.com/talk.wav"}]
                }
            },
            "id": 1
        });

        let resp = app(summarizer)
            .oneshot(post(body.to_string()))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["status"]["state"], "completed");
        assert_eq!(json["result"]["kind"], "task");
    }

    #[tokio::test]
    async fn test_jsonrpc_errors_keep_http_ok() {
        let body = json!({"jsonrpc": "2.0", "method": "task/get", "params": {"taskId": "x"}, "id": 7});

        let resp = idle_app()
            .oneshot(post(body.to_string()))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], -32001);
        assert_eq!(json["id"], 7);
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let resp = idle_app()
            .oneshot(post("{not json"))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], -32700);
        assert!(json["id"].is_null());
    }

    #[tokio::test]
    async fn test_wrong_version_rejected() {
        let body = json!({"jsonrpc": "1.0", "method": "task/list", "params": {}, "id": "abc"});

        let resp = idle_app()
            .oneshot(post(body.to_string()))
            .await
            .expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], -32600);
        assert_eq!(json["id"], "abc");
    }

    #[tokio::test]
    async fn test_non_object_request_rejected() {
        let resp = idle_app().oneshot(post("42")).await.expect("response");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], -32600);
    }
}
