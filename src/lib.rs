//! MCP servers for DuckDB and Kuzu.
//!
//! The relational server (`duckdb-mcp`) exposes `configure`, `query` and
//! `list_files` tools plus a home directory resource. The graph server
//! (`kuzu-mcp`) exposes Cypher `query` and `getSchema`. Both speak
//! line-delimited JSON-RPC over stdio.
//!
//! # Example
//!
//! ```no_run
//! use data_tools_mcp::{
//!     config::ServerConfig,
//!     database::{DuckDbClient, SessionStore},
//!     protocol::McpServerBuilder,
//!     resources::create_relational_resources,
//!     server::{McpHandler, ServerStateBuilder},
//!     tools::create_relational_registry,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Starts unconfigured; clients call the 'configure' tool
//!     let session = Arc::new(SessionStore::<DuckDbClient>::new());
//!
//!     let state = Arc::new(
//!         ServerStateBuilder::new()
//!             .config(ServerConfig::builder().name("duckdb-server").build())
//!             .tools(create_relational_registry(Arc::clone(&session)))
//!             .resources(create_relational_resources(Arc::clone(&session)))
//!             .build()
//!             .map_err(|e| anyhow::anyhow!(e))?,
//!     );
//!
//!     let server = McpServerBuilder::new()
//!         .handler(McpHandler::new(state))
//!         .name("duckdb-server")
//!         .with_tools()
//!         .with_resources()
//!         .build()?;
//!
//!     server.run().await?;
//!     session.close();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod render;
pub mod resources;
pub mod schema;
pub mod server;
pub mod tools;

pub use config::{GraphConfig, RelationalConfig, ServerConfig};
pub use database::{CatalogSource, DatabaseClient, SessionStore, TableQuery};
pub use error::{McpError, Result};
pub use protocol::{McpServer, McpServerBuilder};
pub use server::{McpHandler, ServerState, ServerStateBuilder};
