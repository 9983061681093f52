//! MCP tool definitions and registry
//!
//! The five traffic tools, their JSON Schema definitions, and the
//! dispatch into [`TrafficService`]. Tool failures come back as
//! structured error results; the server process keeps serving
//! subsequent calls no matter what a single tool invocation did.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::error::Error;
use crate::mcp::types::{ToolDefinition, ToolResult};
use crate::traffic::TrafficService;

/// A registered MCP tool
pub trait McpTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;
    /// Tool description
    fn description(&self) -> &str;
    /// Input schema as JSON
    fn input_schema(&self) -> Value;
    /// Get the tool definition
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool registry holding the five traffic tools
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
    service: Arc<TrafficService>,
}

impl ToolRegistry {
    /// Create a registry over the given traffic service
    pub fn new(service: Arc<TrafficService>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            service,
        };

        registry.register(Box::new(ListAutobahnsTool));
        registry.register(Box::new(TrafficWarningsTool));
        registry.register(Box::new(RoadClosuresTool));
        registry.register(Box::new(ChargingStationsTool));
        registry.register(Box::new(AutobahnOverviewTool));

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a tool by name
    #[instrument(skip(self, args))]
    pub async fn execute(&self, name: &str, args: Value) -> ToolResult {
        info!("Executing tool: {}", name);

        if !self.tools.contains_key(name) {
            return ToolResult::failure("tool_not_found", format!("tool not found: {}", name));
        }

        match name {
            "list_autobahns" => self.execute_list().await,
            "get_traffic_warnings" => match highway_id_arg(&args) {
                Ok(id) => self.result_of(self.service.traffic_warnings(id).await),
                Err(result) => result,
            },
            "get_road_closures" => match highway_id_arg(&args) {
                Ok(id) => self.result_of(self.service.road_closures(id).await),
                Err(result) => result,
            },
            "get_charging_stations" => match highway_id_arg(&args) {
                Ok(id) => self.result_of(self.service.charging_stations(id).await),
                Err(result) => result,
            },
            "get_autobahn_overview" => match highway_id_arg(&args) {
                Ok(id) => self.result_of(self.service.overview(id).await),
                Err(result) => result,
            },
            _ => ToolResult::failure("tool_not_found", format!("unknown tool: {}", name)),
        }
    }

    async fn execute_list(&self) -> ToolResult {
        self.result_of(self.service.list_autobahns().await)
    }

    /// Shape a service outcome into a tool result
    fn result_of<T: serde::Serialize>(&self, outcome: crate::error::Result<T>) -> ToolResult {
        match outcome {
            Ok(value) => ToolResult::json(&value),
            Err(e) => failure_result(e),
        }
    }
}

/// Extract the required `highwayId` string argument
fn highway_id_arg(args: &Value) -> Result<&str, ToolResult> {
    args.get("highwayId")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            ToolResult::failure(
                "invalid_params",
                "missing required parameter: highwayId",
            )
        })
}

/// Turn a service error into a structured tool error
fn failure_result(e: Error) -> ToolResult {
    warn!(kind = e.kind(), error = %e, "Tool execution failed");
    ToolResult::failure(e.kind(), e.to_string())
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Schema fragment shared by the four per-highway tools
fn highway_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "highwayId": {
                "type": "string",
                "description": "The autobahn identifier (e.g. 'A1', 'A7', 'A99'); matched case-insensitively"
            }
        },
        "required": ["highwayId"]
    })
}

/// List all known autobahns
struct ListAutobahnsTool;

impl McpTool for ListAutobahnsTool {
    fn name(&self) -> &str {
        "list_autobahns"
    }

    fn description(&self) -> &str {
        "List all available German autobahns (highways)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}

/// Current traffic warnings for one autobahn
struct TrafficWarningsTool;

impl McpTool for TrafficWarningsTool {
    fn name(&self) -> &str {
        "get_traffic_warnings"
    }

    fn description(&self) -> &str {
        "Get current traffic warnings for a specific autobahn"
    }

    fn input_schema(&self) -> Value {
        highway_id_schema()
    }
}

/// Current road closures for one autobahn
struct RoadClosuresTool;

impl McpTool for RoadClosuresTool {
    fn name(&self) -> &str {
        "get_road_closures"
    }

    fn description(&self) -> &str {
        "Get current road closures for a specific autobahn"
    }

    fn input_schema(&self) -> Value {
        highway_id_schema()
    }
}

/// Charging stations along one autobahn
struct ChargingStationsTool;

impl McpTool for ChargingStationsTool {
    fn name(&self) -> &str {
        "get_charging_stations"
    }

    fn description(&self) -> &str {
        "Get electric vehicle charging stations along a specific autobahn"
    }

    fn input_schema(&self) -> Value {
        highway_id_schema()
    }
}

/// Combined overview for one autobahn
struct AutobahnOverviewTool;

impl McpTool for AutobahnOverviewTool {
    fn name(&self) -> &str {
        "get_autobahn_overview"
    }

    fn description(&self) -> &str {
        "Get a complete overview of an autobahn including warnings, closures, and charging stations"
    }

    fn input_schema(&self) -> Value {
        highway_id_schema()
    }
}

/// List of all available tools (for documentation)
pub const AVAILABLE_TOOLS: &[&str] = &[
    "list_autobahns",
    "get_traffic_warnings",
    "get_road_closures",
    "get_charging_stations",
    "get_autobahn_overview",
];
