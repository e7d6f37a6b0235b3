//! HTTP transport implementation.
//!
//! A single listener multiplexing both protocol front-ends over the same tool
//! registry: plain REST (`POST /tools/{name}`) and JSON-RPC over POST (`/mcp`),
//! plus info and health endpoints. The two front-ends consume the same
//! `ToolOutcome` but render it independently.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::{Method, header};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use super::{HttpConfig, TransportError, TransportResult};
use crate::core::GatewayServer;
use crate::domains::tools::{ToolError, ToolOutcome};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Echoed verbatim into the response; absent means null.
    #[serde(default)]
    pub id: serde_json::Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create an error response with attached data.
    pub fn error_with_data(
        id: serde_json::Value,
        code: i32,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: Some(data),
            }),
        }
    }

    /// Method (or tool) not found error.
    pub fn method_not_found(id: serde_json::Value, msg: impl Into<String>) -> Self {
        Self::error(id, -32601, msg)
    }

    /// Invalid request error.
    pub fn invalid_request(id: serde_json::Value) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: serde_json::Value, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: serde_json::Value, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }

    /// Parse error. The request id could not be recovered, so a sentinel 0
    /// stands in for it.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::error(serde_json::json!(0), -32700, msg)
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: GatewayServer) -> TransportResult<()> {
        let addr = self.address();
        let app = build_router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → REST:     POST /tools/{{name}}");
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the router serving both front-ends.
pub fn build_router(server: GatewayServer) -> Router {
    let transport = server.config().transport.clone();

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/tools/{name}", post(handle_tool_call))
        .route(&transport.rpc_path, post(handle_rpc))
        .with_state(server);

    if transport.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
        app = app.layer(cors);
    }

    app
}

/// Root handler - describes the available tools and how to call them.
async fn root_handler(State(server): State<GatewayServer>) -> impl IntoResponse {
    let tools: Vec<_> = server
        .list_tools()
        .into_iter()
        .map(|t| {
            serde_json::json!({
                "name": t["name"],
                "description": t["description"]
            })
        })
        .collect();

    Json(serde_json::json!({
        "name": server.name(),
        "version": server.version(),
        "endpoints": {
            "rest": "/tools/{name}",
            "rpc": "/mcp",
            "health": "/health"
        },
        "tools": tools,
        "usage": "POST /tools/{name} with a JSON object of parameters, or send JSON-RPC 2.0 messages (initialize, tools/list, tools/call) to /mcp"
    }))
}

/// Health check endpoint.
async fn health_check(State(server): State<GatewayServer>) -> impl IntoResponse {
    let credentials = &server.config().credentials;

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "tools": server.tool_names(),
        "credentials": {
            "data_gov_api_key": credentials.data_gov_api_key.is_some(),
            "exa_api_key": credentials.exa_api_key.is_some()
        }
    }))
}

/// REST front-end: `POST /tools/{name}`.
///
/// A handled tool call always answers 200 with the outcome in the body shape;
/// only a malformed request body (400) or an unknown tool name (404) differ.
async fn handle_tool_call(
    State(server): State<GatewayServer>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value @ serde_json::Value::Object(_)) => value,
            Ok(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": "Request body must be a JSON object"})),
                )
                    .into_response();
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("Invalid JSON body: {e}")})),
                )
                    .into_response();
            }
        }
    };

    info!("REST tool call: {}", name);

    match server.call_tool(&name, arguments).await {
        Ok(ToolOutcome::Success(data)) => (
            StatusCode::OK,
            Json(serde_json::json!({"success": true, "data": data})),
        )
            .into_response(),
        Ok(ToolOutcome::Failure(message)) => (
            StatusCode::OK,
            Json(serde_json::json!({"error": message})),
        )
            .into_response(),
        Err(err) => match &err {
            ToolError::NotFound { available, .. } => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({
                    "error": err.to_string(),
                    "available_tools": available
                })),
            )
                .into_response(),
            _ => (
                StatusCode::OK,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response(),
        },
    }
}

/// RPC front-end: one JSON-RPC envelope per request, no batching.
async fn handle_rpc(State(server): State<GatewayServer>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Malformed JSON-RPC envelope: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::parse_error(format!("Parse error: {e}"))),
            )
                .into_response();
        }
    };

    info!("JSON-RPC request: {}", request.method);
    let response = process_request(&server, request).await;

    (StatusCode::OK, Json(response)).into_response()
}

/// Process a JSON-RPC request and return the response.
async fn process_request(server: &GatewayServer, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            let message = format!("Method not found: {}", request.method);
            JsonRpcResponse::method_not_found(request.id, message)
        }
    }
}

/// Handle initialize: fixed capability metadata, no side effects.
fn handle_initialize(server: &GatewayServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": server.name(),
            "version": server.version()
        }
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list: the full descriptor set.
fn handle_tools_list(server: &GatewayServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = serde_json::json!({
        "tools": server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call.
async fn handle_tools_call(server: &GatewayServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let JsonRpcRequest { id, params, .. } = request;

    let params = match params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(id, "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(id, "Missing tool name"),
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| serde_json::json!({}));

    match server.call_tool(&name, arguments).await {
        Ok(ToolOutcome::Success(data)) => {
            let text = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
            JsonRpcResponse::success(
                id,
                serde_json::json!({
                    "content": [{"type": "text", "text": text}]
                }),
            )
        }
        Ok(ToolOutcome::Failure(message)) => JsonRpcResponse::internal_error(id, message),
        Err(err) => match &err {
            ToolError::NotFound { available, .. } => JsonRpcResponse::error_with_data(
                id,
                -32601,
                err.to_string(),
                serde_json::json!({"available_tools": available}),
            ),
            _ => JsonRpcResponse::internal_error(id, err.to_string()),
        },
    }
}
