//! Autobahn Traffic - MCP server for German highway traffic data
//!
//! This crate provides an MCP (Model Context Protocol) server exposing
//! live traffic data for the German autobahn network, backed by the
//! public `verkehr.autobahn.de` REST API.
//!
//! # Tools
//!
//! - **list_autobahns**: all known highway identifiers
//! - **get_traffic_warnings**: current warnings for one highway
//! - **get_road_closures**: current closures for one highway
//! - **get_charging_stations**: charging stations along one highway
//! - **get_autobahn_overview**: all three categories, fetched
//!   concurrently and merged best-effort
//!
//! # Architecture
//!
//! ```text
//! AI Agent ──▶ MCP Server ──▶ Traffic Service
//!                                  │
//!                   ┌──────────────┼──────────────┐
//!                   ▼              ▼              ▼
//!            ┌────────────┐ ┌────────────┐ ┌────────────┐
//!            │  Catalog   │ │  Category  │ │  Overview  │
//!            │  Cache     │ │  Fetchers  │ │  Composer  │
//!            └─────┬──────┘ └─────┬──────┘ └─────┬──────┘
//!                  └──────────────┼──────────────┘
//!                                 ▼
//!                         Upstream Client
//!                     (verkehr.autobahn.de)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use autobahn_traffic::traffic::{ServiceConfig, TrafficService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = TrafficService::new(ServiceConfig::default())?;
//!
//!     for road in service.list_autobahns().await? {
//!         let overview = service.overview(&road).await?;
//!         println!("{}: {} warnings", road, overview.summary.warnings);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod error;
pub mod mcp;
pub mod traffic;
pub mod upstream;

// Re-exports for convenience
pub use catalog::{CatalogCache, HighwayId};
pub use error::{Error, McpError, Result, UpstreamError};
pub use mcp::{McpServer, McpTool, ToolRegistry};
pub use traffic::{ServiceConfig, TrafficService};
pub use upstream::{UpstreamClient, UpstreamConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
