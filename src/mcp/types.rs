//! MCP protocol types
//!
//! JSON-RPC 2.0 framing plus the MCP-specific shapes for server info,
//! capabilities, tool definitions, and tool results. All five traffic
//! tools reply with JSON rendered as text content; errors are carried as
//! structured `{"error": {"kind", "message"}}` payloads with the result
//! flagged `isError`, never as transport failures.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Optional parameters
    #[serde(default)]
    pub params: Option<Value>,
    /// Request ID (None for notifications)
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Success result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Create a parse error response
    pub fn parse_error() -> Self {
        Self::error(None, -32700, "Parse error")
    }

    /// Create a method not found error
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, -32601, format!("Method not found: {}", method))
    }

    /// Create an invalid params error
    pub fn invalid_params(id: Option<Value>, msg: &str) -> Self {
        Self::error(id, -32602, format!("Invalid params: {}", msg))
    }

    /// Create an internal error
    pub fn internal_error(id: Option<Value>, msg: &str) -> Self {
        Self::error(id, -32603, format!("Internal error: {}", msg))
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

/// MCP server capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Tools capability
    #[serde(default)]
    pub tools: ToolsCapability,
}

/// Tools capability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether tool list changes are notified (they are not; the five
    /// tools are fixed at startup)
    #[serde(default, rename = "listChanged")]
    pub list_changed: bool,
}

/// MCP server info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// MCP tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input JSON schema
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for tools/call method
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// Result of a tool call
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    /// Whether the call failed
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Content array
    pub content: Vec<ToolContent>,
}

impl ToolResult {
    /// Success result with plain text content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            content: vec![ToolContent::text(text)],
        }
    }

    /// Success result with a pretty-printed JSON payload
    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::failure("json", format!("failed to serialize result: {}", e)),
        }
    }

    /// Structured error result: a stable kind tag plus a message
    pub fn failure(kind: &str, message: impl Into<String>) -> Self {
        let body = json!({
            "error": {
                "kind": kind,
                "message": message.into(),
            }
        });
        Self {
            is_error: true,
            content: vec![ToolContent::text(
                serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
            )],
        }
    }
}

/// Content item in a tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    /// Text content
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },
}

impl ToolContent {
    /// Create text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"jsonrpc":"2.0","method":"tools/list","id":7}"#;
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Some(json!(7)));
        assert!(request.params.is_none());
    }

    #[test]
    fn test_response_success_omits_error() {
        let response = JsonRpcResponse::success(Some(json!(1)), json!({"ok": true}));
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains("\"result\""));
        assert!(!text.contains("\"error\""));
    }

    #[test]
    fn test_response_error_omits_result() {
        let response = JsonRpcResponse::method_not_found(Some(json!(1)), "nope");
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains("-32601"));
        assert!(!text.contains("\"result\""));
    }

    #[test]
    fn test_tool_result_text() {
        let result = ToolResult::text("hello");
        assert!(!result.is_error);
        let text = serde_json::to_string(&result).unwrap();
        // isError is omitted entirely on success
        assert!(!text.contains("isError"));
        assert!(text.contains("\"type\":\"text\""));
    }

    #[test]
    fn test_tool_result_failure_is_structured() {
        let result = ToolResult::failure("unknown_highway", "unknown autobahn identifier: Z99");
        assert!(result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["error"]["kind"], "unknown_highway");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Z99"));
    }

    #[test]
    fn test_tool_result_json_pretty_prints() {
        let result = ToolResult::json(&json!({"roads": ["A1", "A2"]}));
        let ToolContent::Text { text } = &result.content[0];
        let body: Value = serde_json::from_str(text).unwrap();
        assert_eq!(body["roads"][0], "A1");
    }

    #[test]
    fn test_server_info_default() {
        let info = ServerInfo::default();
        assert_eq!(info.name, "autobahn-traffic");
        assert!(!info.version.is_empty());
    }
}
