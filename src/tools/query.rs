//! The relational `query` tool.

use crate::database::{DatabaseClient, SessionStore, TableQuery};
use crate::error::{McpError, Result, ToolError};
use crate::protocol::{CallToolResult, Tool};
use crate::tools::registry::{ToolHandler, json_result, parse_arguments, run_blocking};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
pub struct QueryArgs {
    pub sql: String,
}

/// Execution failures are reported in `error` rather than as a failed call.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub db_path: String,
}

pub struct QueryTool<C: DatabaseClient + TableQuery> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient + TableQuery> QueryTool<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient + TableQuery> ToolHandler for QueryTool<C> {
    fn definition(&self) -> Tool {
        crate::define_tool! {
            name: "query",
            description: "Execute a SQL query on the configured DuckDB database",
            schema: {
                "type": "object",
                "properties": {
                    "sql": {
                        "type": "string",
                        "description": "SQL query to execute (DuckDB dialect)"
                    }
                },
                "required": ["sql"]
            }
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "query"))]
    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        // Check connection first
        let client = self.session.require_client().map_err(McpError::from)?;

        let args: QueryArgs = parse_arguments(arguments)?;
        if args.sql.is_empty() {
            return Err(ToolError::InvalidArguments("Parameter 'sql' cannot be empty".into()).into());
        }

        debug!("Executing SQL on {}", client.db_path());
        let outcome = run_blocking(move || Ok(client.query(&args.sql))).await?;

        let response = match outcome {
            Ok(results) => QueryResponse {
                success: true,
                results: Some(results),
                error: None,
                db_path: self.session.db_path(),
            },
            Err(e) => {
                warn!("Query failed: {}", e);
                QueryResponse {
                    success: false,
                    results: None,
                    error: Some(e.to_string()),
                    db_path: self.session.db_path(),
                }
            }
        };

        json_result(&response)
    }
}
