//! Model Context Protocol (MCP) server module
//!
//! Implements the MCP stdio transport: JSON-RPC 2.0 framing, the
//! lifecycle handshake, and the registry of the five traffic tools.

mod server;
mod tools;
/// MCP protocol types
pub mod types;

pub use server::McpServer;
pub use tools::{McpTool, ToolRegistry, AVAILABLE_TOOLS};
pub use types::{
    Capabilities, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolCallParams,
    ToolContent, ToolDefinition, ToolResult,
};
