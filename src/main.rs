//! Autobahn Traffic MCP Server
//!
//! Serves German highway traffic data over the MCP stdio transport.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use autobahn_traffic::traffic::{ServiceConfig, TrafficService};
use autobahn_traffic::upstream::{UpstreamConfig, DEFAULT_BASE_URL};
use autobahn_traffic::McpServer;

/// Autobahn Traffic MCP Server
#[derive(Parser, Debug)]
#[command(name = "autobahn-mcp")]
#[command(version)]
#[command(about = "MCP server for German Autobahn traffic data")]
struct Args {
    /// Base URL of the upstream traffic API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,

    /// Highway catalog cache TTL in seconds
    #[arg(long, default_value = "300")]
    catalog_ttl_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout is the MCP protocol channel.
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServiceConfig {
        upstream: UpstreamConfig::builder()
            .base_url(args.base_url)
            .timeout_ms(args.timeout_ms)
            .build(),
        catalog_ttl: Duration::from_secs(args.catalog_ttl_secs),
    };

    let service = TrafficService::new(config).context("failed to build traffic service")?;
    let server = McpServer::new(Arc::new(service));

    server.run().await.context("MCP server failed")?;
    Ok(())
}
