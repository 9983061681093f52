//! Error types for the Autobahn traffic server
//!
//! This module provides the error hierarchy used across all components,
//! built on `thiserror`. Upstream failures are classified into transient
//! and permanent categories; the client's retry policy and the overview
//! composer both dispatch on that classification.

use thiserror::Error;

/// The main error type for Autobahn traffic operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested identifier is not in the highway catalog.
    ///
    /// Detected locally against the cached catalog; no network call is
    /// issued for an unknown identifier.
    #[error("unknown autobahn identifier: {0}")]
    UnknownHighway(String),

    /// Upstream traffic API errors
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// MCP protocol errors
    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration (bad base URL, unbuildable HTTP client)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures talking to the upstream traffic API
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request did not complete within the configured timeout
    #[error("upstream request timed out after {0}ms")]
    Timeout(u64),

    /// Connection/DNS failure or a 5xx status after retry exhaustion
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Malformed JSON or a response shape the API contract does not allow
    #[error("upstream returned a bad response: {0}")]
    BadResponse(String),
}

impl UpstreamError {
    /// Whether a single automatic retry is worthwhile.
    ///
    /// Timeouts and availability problems are transient. A bad response is
    /// a contract violation and will not improve on retry; 4xx statuses
    /// are classified as bad responses for the same reason.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UpstreamError::Timeout(_) | UpstreamError::Unavailable(_)
        )
    }

    /// Stable machine-readable tag used in structured tool-error results
    /// and overview failure notes.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "upstream_timeout",
            UpstreamError::Unavailable(_) => "upstream_unavailable",
            UpstreamError::BadResponse(_) => "upstream_bad_response",
        }
    }
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    /// Invalid JSON-RPC request
    #[error("invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool not found
    #[error("tool not found: {0}")]
    ToolNotFound(String),
}

impl Error {
    /// Stable machine-readable tag used in structured tool-error results.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnknownHighway(_) => "unknown_highway",
            Error::Upstream(e) => e.kind(),
            Error::Mcp(McpError::InvalidRequest(_)) => "invalid_request",
            Error::Mcp(McpError::InvalidParams(_)) => "invalid_params",
            Error::Mcp(McpError::ToolNotFound(_)) => "tool_not_found",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Config(_) => "config",
        }
    }
}

/// Result type alias for Autobahn traffic operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_highway_display() {
        let err = Error::UnknownHighway("Z99".to_string());
        assert_eq!(err.to_string(), "unknown autobahn identifier: Z99");
        assert_eq!(err.kind(), "unknown_highway");
    }

    #[test]
    fn test_upstream_error_display() {
        let err = Error::Upstream(UpstreamError::Timeout(5000));
        assert!(err.to_string().contains("timed out after 5000ms"));
        assert_eq!(err.kind(), "upstream_timeout");
    }

    #[test]
    fn test_upstream_transient_classification() {
        assert!(UpstreamError::Timeout(1000).is_transient());
        assert!(UpstreamError::Unavailable("connection refused".to_string()).is_transient());
        assert!(!UpstreamError::BadResponse("not JSON".to_string()).is_transient());
    }

    #[test]
    fn test_mcp_error_display() {
        let err = McpError::ToolNotFound("get_weather".to_string());
        assert_eq!(err.to_string(), "tool not found: get_weather");
    }

    #[test]
    fn test_error_kind_tags_are_snake_case() {
        let errors = vec![
            Error::UnknownHighway("A0".to_string()),
            Error::Upstream(UpstreamError::Unavailable("dns".to_string())),
            Error::Upstream(UpstreamError::BadResponse("shape".to_string())),
            Error::Mcp(McpError::InvalidParams("missing".to_string())),
        ];
        for err in errors {
            let kind = err.kind();
            assert!(kind.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
