//! The normalized result of a tool invocation.
//!
//! Every handler produces a `ToolOutcome`, and both protocol front-ends render
//! it — each with its own formatting, never shared. The two variants are
//! mutually exclusive by construction: a caller can never observe both a data
//! payload and an error message, or neither.

use super::error::ToolError;

/// Outcome of a handled tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The tool ran and produced a structured payload.
    Success(serde_json::Value),

    /// The tool ran and failed; the message is the caller-visible diagnosis.
    Failure(String),
}

impl ToolOutcome {
    /// Create a successful outcome.
    pub fn success(data: serde_json::Value) -> Self {
        Self::Success(data)
    }

    /// Create a failed outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Fold a handler result into an outcome, rendering the error's display
    /// form as the failure message.
    pub fn from_result(result: Result<serde_json::Value, ToolError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err.to_string()),
        }
    }

    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
