//! Error types for MCP operations.

use thiserror::Error;

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Error type for MCP operations.
///
/// Every variant is terminal for the current invocation; nothing in this
/// crate retries or recovers locally.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to reach the MCP server, or it answered with a non-JSON error status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The run's deadline elapsed before the response was read.
    #[error("timeout waiting for response")]
    Timeout,

    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `initialize` response carried no `Mcp-Session-Id` header.
    #[error("Mcp-Session-Id not found in initialize response headers")]
    MissingSessionId,

    /// A request was issued before the handshake completed.
    #[error("session not initialized - complete the handshake first")]
    NotInitialized,

    /// The response did not declare `jsonrpc: "2.0"`.
    #[error("unexpected jsonrpc version: {0}")]
    ProtocolMismatch(String),

    /// The response did not echo the request id.
    #[error("response id mismatch: expected {expected}, got {found}")]
    IdMismatch {
        /// Id sent with the request.
        expected: String,
        /// Id found in the response (`<absent>` when missing).
        found: String,
    },

    /// The `result` member is missing or has the wrong shape.
    #[error("malformed result: {0}")]
    MalformedResult(String),

    /// A list result did not contain the requested feature array.
    #[error("feature '{0}' not found in list result")]
    FeatureNotFound(String),

    /// The user-supplied tool arguments are not valid JSON.
    #[error("failed to parse arguments JSON: {0}")]
    ArgumentParse(#[source] serde_json::Error),

    /// A tool's input schema contradicts its own `required` list.
    #[error("malformed input schema: {0}")]
    SchemaMalformed(String),
}

impl McpError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a malformed result error.
    pub fn malformed_result(msg: impl Into<String>) -> Self {
        Self::MalformedResult(msg.into())
    }

    /// Create a schema error.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaMalformed(msg.into())
    }

    /// Map a reqwest failure, keeping timeouts distinct from other network errors.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(format!("HTTP request failed: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::transport("connection refused");
        assert!(err.to_string().contains("transport"));
        assert!(err.to_string().contains("connection refused"));

        let err = McpError::IdMismatch {
            expected: "\"123\"".to_string(),
            found: "<absent>".to_string(),
        };
        assert!(err.to_string().contains("\"123\""));
        assert!(err.to_string().contains("<absent>"));

        let err = McpError::FeatureNotFound("tools".to_string());
        assert!(err.to_string().contains("'tools'"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let mcp_err: McpError = json_err.into();
        assert!(matches!(mcp_err, McpError::Json(_)));
    }

    #[test]
    fn test_argument_parse_keeps_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = McpError::ArgumentParse(json_err);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to parse arguments JSON"));
    }
}
