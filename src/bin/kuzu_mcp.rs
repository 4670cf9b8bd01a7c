//! Kuzu MCP server binary entry point.
//!
//! Usage: `kuzu-mcp <db_path>` or set `KUZU_DB_PATH`.

use anyhow::{Context, Result};
use data_tools_mcp::{
    config::{GraphConfig, ServerConfig},
    database::{DatabaseClient, KuzuClient, SessionStore},
    logging::init_tracing,
    protocol::McpServerBuilder,
    server::{McpHandler, ServerStateBuilder},
    tools::create_graph_registry,
};
use std::sync::Arc;
use tracing::info;

const SERVER_NAME: &str = "kuzu-memory-server";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = GraphConfig::builder()
        .args(std::env::args().skip(1))
        .from_env()
        .build()?;

    info!(
        db_path = %config.db_path,
        read_only = config.read_only,
        "Opening Kuzu database"
    );

    let GraphConfig { db_path, read_only } = config.clone();
    let client = tokio::task::spawn_blocking(move || KuzuClient::open(&db_path, read_only))
        .await?
        .with_context(|| format!("failed to open Kuzu database at {}", config.db_path))?;

    let session = Arc::new(SessionStore::with_client(client));

    let instructions = format!(
        "Kuzu MCP Server connected to {}{}. Use 'getSchema' to inspect node and relationship \
        tables, then run Cypher with the 'query' tool.",
        config.db_path,
        if config.read_only { " (read-only)" } else { "" }
    );

    let state = Arc::new(
        ServerStateBuilder::new()
            .config(ServerConfig::builder().name(SERVER_NAME).build())
            .tools(create_graph_registry(Arc::clone(&session)))
            .instructions(move || instructions.clone())
            .build()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    info!("Server state initialized with {} tools", state.tools.len());

    let server = McpServerBuilder::new()
        .handler(McpHandler::new(state))
        .name(SERVER_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .with_tools()
        .build()?;

    info!("MCP server ready, waiting for requests...");

    let outcome = server.run().await;
    session.close();

    outcome?;
    info!("Server shutdown complete");
    Ok(())
}
