//! Axum-based HTTP server for the channel gateway.

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super_tools_controller::AgentRouter;
use super_tools_core::{
    config::AppConfig,
    traits::ToolRegistry,
    types::{CorrelationId, Message, RoutingContext, ToolDefinition, ToolOutput},
    Error, Result,
};
use super_tools_governance::BearerValidator;

use crate::error::ApiError;
use crate::middleware::correlation_id;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "channel-gateway";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Enable CORS.
    pub enable_cors: bool,
    /// Origins allowed by CORS; `*` allows any.
    pub allowed_origins: Vec<String>,
    /// Enable request tracing.
    pub enable_tracing: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9200,
            enable_cors: true,
            allowed_origins: vec!["*".to_string()],
            enable_tracing: true,
        }
    }
}

impl From<&AppConfig> for GatewayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            enable_cors: config.gateway.enable_cors,
            allowed_origins: config.gateway.allowed_origins.clone(),
            enable_tracing: config.gateway.enable_tracing,
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Agent router.
    pub router: Arc<AgentRouter>,
    /// Named broker tools.
    pub tools: Arc<dyn ToolRegistry>,
    /// Bearer credential check.
    pub validator: Arc<BearerValidator>,
}

impl AppState {
    fn authorize(&self, headers: &HeaderMap) -> Result<String> {
        let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        self.validator.validate(header)
    }
}

/// Gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
    metrics_handle: Option<PrometheusHandle>,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(
        config: GatewayConfig,
        router: Arc<AgentRouter>,
        tools: Arc<dyn ToolRegistry>,
        validator: Arc<BearerValidator>,
    ) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                router,
                tools,
                validator,
            }),
            metrics_handle: None,
        }
    }

    /// Set metrics handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins = &self.config.allowed_origins;
        let allow_origin = if origins.iter().any(|o| o == "*") {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(
                origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok()),
            )
        };
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any)
    }

    /// Build the Axum router.
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/api/v1/messages", post(message_handler))
            .route("/api/v1/tools", get(list_tools_handler))
            .route("/api/v1/tools/:name", post(invoke_tool_handler))
            .with_state(self.state.clone());

        if let Some(handle) = &self.metrics_handle {
            let handle = handle.clone();
            router = router.route("/metrics", get(move || async move { handle.render() }));
        }

        router = router.layer(middleware::from_fn(correlation_id));

        if self.config.enable_cors {
            router = router.layer(self.cors_layer());
        }

        if self.config.enable_tracing {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::gateway(format!("Failed to bind: {}", e)))?;

        tracing::info!(addr = %addr, "Gateway server starting");

        axum::serve(listener, self.build_router())
            .await
            .map_err(|e| Error::gateway(format!("Server error: {}", e)))?;

        Ok(())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

fn default_channel() -> String {
    "chat".to_string()
}

/// Inbound channel message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Message text.
    pub message: String,
    /// Channel the message came from.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Optional user ID.
    pub user_id: Option<String>,
    /// Optional session ID.
    pub session_id: Option<String>,
    /// Opaque caller metadata.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Reply to a channel message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Generated message ID.
    pub message_id: String,
    /// Agent reply text.
    pub response: String,
    /// `success` or `error`, from the agent's success flag.
    pub status: String,
    /// When the reply was produced.
    pub timestamp: DateTime<Utc>,
    /// Classified intent.
    pub intent: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Version.
    pub version: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Parse a JSON request body. Runs after the bearer check so that an
/// unauthenticated caller never learns whether its body was well formed.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::invalid_request(format!("invalid JSON body: {}", e)))
}

/// Channel message handler: one routing cycle per request.
async fn message_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation_id): Extension<CorrelationId>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<MessageResponse>, ApiError> {
    state.authorize(&headers)?;
    let payload: MessageRequest = parse_body(&body)?;

    if payload.message.trim().is_empty() {
        return Err(Error::invalid_request("message must not be empty").into());
    }

    tracing::info!(
        correlation_id = %correlation_id,
        channel = %payload.channel,
        message_len = payload.message.len(),
        "Processing channel message"
    );

    let message = Message {
        text: payload.message,
        channel: Some(payload.channel),
        user_id: payload.user_id,
        session_id: payload.session_id,
        metadata: payload.metadata,
    };
    let context = RoutingContext::new(correlation_id);
    let (intent, response) = state.router.dispatch(&message, &context).await;

    Ok(Json(MessageResponse {
        message_id: Uuid::new_v4().to_string(),
        response: response.message,
        status: if response.success { "success" } else { "error" }.to_string(),
        timestamp: Utc::now(),
        intent: intent.to_string(),
    }))
}

/// List the named broker tools.
async fn list_tools_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<ToolDefinition>>, ApiError> {
    Ok(Json(state.tools.list().await?))
}

/// Invoke one named tool with a JSON body. An empty body means no arguments.
async fn invoke_tool_handler(
    State(state): State<Arc<AppState>>,
    Extension(correlation_id): Extension<CorrelationId>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<ToolOutput>, ApiError> {
    state.authorize(&headers)?;

    let args = if body.is_empty() {
        Value::Null
    } else {
        parse_body(&body)?
    };

    tracing::info!(correlation_id = %correlation_id, tool = %name, "Invoking tool");
    let output = state.tools.execute(&name, args, &correlation_id).await?;
    Ok(Json(output))
}
