//! Tool-specific error types.

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Errors that can occur while resolving or executing a tool call.
///
/// Every variant is terminal for the single request that produced it; nothing
/// here is retried and nothing escapes as a process-level fault.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required credential is missing. Detected before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The upstream was reachable but returned a non-success status.
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    /// The upstream body could not be parsed as the expected structure.
    #[error("Unexpected upstream response format: {raw}")]
    UpstreamFormat { raw: String },

    /// The requested tool is not registered.
    #[error("Unknown tool: {name}")]
    NotFound {
        name: String,
        available: Vec<&'static str>,
    },

    /// The caller's arguments failed schema validation.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The outbound request itself failed (connect, send, timeout, body read).
    #[error(transparent)]
    Transport(#[from] UpstreamError),

    /// Anything else that went wrong during handling.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new upstream HTTP status error.
    pub fn upstream_http(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status,
            body: body.into(),
        }
    }

    /// Create a new upstream format error carrying the raw body.
    pub fn upstream_format(raw: impl Into<String>) -> Self {
        Self::UpstreamFormat { raw: raw.into() }
    }

    /// Create a new "not found" error listing the valid tool names.
    pub fn not_found(name: impl Into<String>, available: Vec<&'static str>) -> Self {
        Self::NotFound {
            name: name.into(),
            available,
        }
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
