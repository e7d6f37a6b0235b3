//! Gateway server implementation.
//!
//! The server owns the tool registry and the process-wide configuration, both
//! read-only after construction, and exposes the support methods the protocol
//! front-ends are built on. It carries no per-request state.

use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{ToolError, ToolOutcome, ToolRegistry};

/// The main gateway server.
#[derive(Clone)]
pub struct GatewayServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool registry for dispatching tool calls.
    registry: Arc<ToolRegistry>,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(ToolRegistry::new(config.clone()));

        Self { config, registry }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the registered tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        ToolRegistry::tool_names()
    }

    /// List all available tools as discovery metadata.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::all_descriptors()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name.
    ///
    /// `Err` means the name is not registered; any other failure comes back as
    /// a `ToolOutcome::Failure`.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutcome, ToolError> {
        self.registry.call_tool(name, arguments).await
    }
}
