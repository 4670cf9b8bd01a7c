//! DuckDB MCP server binary entry point.

use anyhow::Result;
use data_tools_mcp::{
    config::{RelationalConfig, ServerConfig},
    database::{DuckDbClient, SessionStore},
    logging::init_tracing,
    protocol::McpServerBuilder,
    resources::create_relational_resources,
    server::{McpHandler, ServerStateBuilder},
    tools::create_relational_registry,
};
use std::sync::Arc;
use tracing::{error, info, warn};

const SERVER_NAME: &str = "duckdb-server";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let session = Arc::new(SessionStore::<DuckDbClient>::new());

    match RelationalConfig::builder().from_env() {
        Ok(builder) => auto_configure(&session, builder.build()).await,
        Err(e) => warn!("Ignoring invalid environment configuration: {}", e),
    }

    let instructions_session = Arc::clone(&session);
    let state = Arc::new(
        ServerStateBuilder::new()
            .config(ServerConfig::builder().name(SERVER_NAME).build())
            .tools(create_relational_registry(Arc::clone(&session)))
            .resources(create_relational_resources(Arc::clone(&session)))
            .instructions(move || instructions(&instructions_session))
            .build()
            .map_err(|e| anyhow::anyhow!(e))?,
    );

    info!(
        "Server state initialized with {} tools and {} resources",
        state.tools.len(),
        state.resources.len()
    );

    let handler = McpHandler::new(state);
    let server = McpServerBuilder::new()
        .handler(handler)
        .name(SERVER_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .with_tools()
        .with_resources()
        .build()?;

    info!("MCP server ready, waiting for requests...");

    let outcome = server.run().await;
    session.close();

    outcome?;
    info!("Server shutdown complete");
    Ok(())
}

async fn auto_configure(session: &Arc<SessionStore<DuckDbClient>>, config: RelationalConfig) {
    if !config.should_auto_configure() {
        info!("No database configured. Use the 'configure' tool to connect.");
        return;
    }

    let db_path = config.db_path.clone().unwrap_or_default();
    let home_dir = config.home_dir.clone().unwrap_or_default();
    info!(
        db_path = %db_path,
        home_dir = %home_dir,
        read_only = config.read_only,
        "Found environment configuration, configuring session"
    );

    let target = Arc::clone(session);
    let outcome = tokio::task::spawn_blocking(move || {
        target.configure(&db_path, &home_dir, config.read_only)
    })
    .await;

    match outcome {
        Ok(Ok(())) => info!("Session configured from environment"),
        Ok(Err(e)) => {
            error!("Failed to configure session: {}", e);
            warn!("Server will start without a database. Use 'configure' to retry.");
        }
        Err(e) => error!("Configuration task failed: {}", e),
    }
}

fn instructions(session: &SessionStore<DuckDbClient>) -> String {
    let metadata = session.metadata();
    let mut text = match &metadata.db_path {
        Some(db_path) if metadata.connected => format!(
            "DuckDB MCP Server connected to {} ({}). Run SQL with the 'query' tool.",
            db_path,
            if metadata.read_only { "read-only" } else { "read-write" }
        ),
        _ => "DuckDB MCP Server (not connected). \
            Use the 'configure' tool with db_path (a file or ':memory:') to connect, \
            then run SQL with the 'query' tool."
            .to_string(),
    };

    match &metadata.home_dir {
        Some(home_dir) => text.push_str(&format!(
            " Home directory: {}. Use 'list_files' or read duckdb://home-directory to see data files.",
            home_dir
        )),
        None => text.push_str(" Set home_dir with 'configure' to enable 'list_files'."),
    }
    text
}
