//! Tool Registry - central registration and dispatch for all tools.
//!
//! A fixed mapping from tool name to handler and descriptor, constructed once
//! at startup and read-only afterwards. Lookup is by exact string match; an
//! unknown name is a first-class `ToolError::NotFound`, never a crash.

use std::sync::Arc;

use rmcp::model::Tool;
use tracing::warn;

use crate::core::Config;
use crate::upstream::UpstreamClient;

use super::definitions::{CropPriceTool, WebSearchTool};
use super::error::ToolError;
use super::outcome::ToolOutcome;

/// Tool registry - owns the shared upstream client and dispatches tool calls.
pub struct ToolRegistry {
    config: Arc<Config>,
    client: UpstreamClient,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            client: UpstreamClient::new(),
        }
    }

    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![CropPriceTool::NAME, WebSearchTool::NAME]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for tool discovery; both front-ends
    /// render their listings from it.
    pub fn all_descriptors() -> Vec<Tool> {
        vec![CropPriceTool::to_tool(), WebSearchTool::to_tool()]
    }

    /// Dispatch a tool call to the appropriate handler.
    ///
    /// Returns `Err` only when the name is not registered; every handler-level
    /// failure is folded into `ToolOutcome::Failure` so that both front-ends
    /// can render it as a handled call.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutcome, ToolError> {
        match name {
            CropPriceTool::NAME => Ok(ToolOutcome::from_result(
                CropPriceTool::run(arguments, &self.config, &self.client).await,
            )),
            WebSearchTool::NAME => Ok(ToolOutcome::from_result(
                WebSearchTool::run(arguments, &self.config, &self.client).await,
            )),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name, Self::tool_names()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::new(Arc::new(Config::default()))
    }

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"crop-price"));
        assert!(names.contains(&"search"));
    }

    #[test]
    fn test_descriptors_match_names() {
        let descriptors = ToolRegistry::all_descriptors();
        let names: Vec<_> = descriptors.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, ToolRegistry::tool_names());
        for tool in &descriptors {
            assert!(
                tool.description.as_ref().is_some_and(|d| !d.is_empty()),
                "{} has no description",
                tool.name
            );
        }
    }

    #[test]
    fn test_call_unknown_tool() {
        let registry = test_registry();
        let result =
            tokio_test::block_on(registry.call_tool("weather", serde_json::json!({})));

        match result {
            Err(ToolError::NotFound { name, available }) => {
                assert_eq!(name, "weather");
                assert_eq!(available, vec!["crop-price", "search"]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_call_without_credentials_is_a_handled_failure() {
        // Default config has no keys set; the call must come back as a
        // Failure outcome, not an Err or a panic.
        let registry = test_registry();
        let outcome =
            tokio_test::block_on(registry.call_tool("crop-price", serde_json::json!({}))).unwrap();

        match outcome {
            ToolOutcome::Failure(msg) => assert!(msg.contains("DATA_GOV_API_KEY")),
            ToolOutcome::Success(_) => panic!("expected failure without credentials"),
        }
    }
}
