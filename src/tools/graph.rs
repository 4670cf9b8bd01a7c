//! Graph tools: Cypher `query` and `getSchema`.

use crate::database::{CatalogSource, DatabaseClient, SessionStore};
use crate::error::{McpError, Result};
use crate::protocol::{CallToolResult, Tool};
use crate::render::{render_json, render_rows};
use crate::schema::SchemaIntrospector;
use crate::tools::registry::{ToolHandler, parse_arguments, run_blocking};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
pub struct CypherArgs {
    pub cypher: String,
}

/// Runs a Cypher statement and returns its rows as indented JSON.
/// Failures surface as error results.
pub struct CypherQueryTool<C: DatabaseClient + CatalogSource> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient + CatalogSource> CypherQueryTool<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient + CatalogSource> ToolHandler for CypherQueryTool<C> {
    fn definition(&self) -> Tool {
        crate::define_tool! {
            name: "query",
            description: "Run a Cypher query on the Kuzu database",
            schema: {
                "type": "object",
                "properties": {
                    "cypher": {
                        "type": "string",
                        "description": "The Cypher query to run"
                    }
                },
                "required": ["cypher"]
            }
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "query"))]
    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: CypherArgs = parse_arguments(arguments)?;
        let client = self.session.require_client().map_err(McpError::from)?;

        let rows = run_blocking(move || Ok(client.fetch_rows(&args.cypher)?)).await?;
        debug!("Cypher query returned {} rows", rows.len());

        Ok(CallToolResult::text(render_rows(&rows)?))
    }
}

pub struct GetSchemaTool<C: DatabaseClient + CatalogSource> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient + CatalogSource> GetSchemaTool<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient + CatalogSource> ToolHandler for GetSchemaTool<C> {
    fn definition(&self) -> Tool {
        crate::define_tool! {
            name: "getSchema",
            description: "Get the schema of the Kuzu database",
            schema: {
                "type": "object",
                "properties": {}
            }
        }
    }

    #[instrument(skip(self, _arguments), fields(tool = "getSchema"))]
    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        let client = self.session.require_client().map_err(McpError::from)?;

        let schema =
            run_blocking(move || Ok(SchemaIntrospector::new(&*client).introspect()?))
                .await?;
        debug!(
            "Schema has {} node tables and {} rel tables",
            schema.node_tables.len(),
            schema.rel_tables.len()
        );

        Ok(CallToolResult::text(render_json(&schema)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::result::{CellValue, RowMap};
    use crate::database::session::testing::FakeClient;
    use crate::schema::introspect::SHOW_TABLES;
    use serde_json::json;

    fn row(pairs: &[(&str, CellValue)]) -> RowMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn session() -> Arc<SessionStore<FakeClient>> {
        let client = FakeClient::with_rows(vec![
            (
                "MATCH (p:Person) RETURN p.name AS name, p.id AS id",
                vec![row(&[
                    ("name", "Ada".into()),
                    ("id", CellValue::BigInt(9_007_199_254_740_993)),
                ])],
            ),
            (
                SHOW_TABLES,
                vec![
                    row(&[("name", "Person".into()), ("type", "NODE".into())]),
                    row(&[("name", "Knows".into()), ("type", "REL".into())]),
                ],
            ),
            (
                "CALL TABLE_INFO('Person') RETURN *",
                vec![row(&[
                    ("name", "id".into()),
                    ("type", "INT64".into()),
                    ("primary key", CellValue::Bool(true)),
                ])],
            ),
            (
                "CALL TABLE_INFO('Knows') RETURN *",
                vec![row(&[
                    ("name", "since".into()),
                    ("type", "INT64".into()),
                    ("primary key", "true".into()),
                ])],
            ),
            (
                "CALL SHOW_CONNECTION('Knows') RETURN *",
                vec![row(&[
                    ("source table name", "Person".into()),
                    ("destination table name", "Person".into()),
                ])],
            ),
        ]);
        Arc::new(SessionStore::with_client(client))
    }

    #[tokio::test]
    async fn test_query_renders_indented_rows() {
        let tool = CypherQueryTool::new(session());
        let result = tool
            .execute(json!({"cypher": "MATCH (p:Person) RETURN p.name AS name, p.id AS id"}))
            .await
            .unwrap();

        let text = result.first_text().unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"9007199254740993\""));
        let rows: Value = serde_json::from_str(text).unwrap();
        assert_eq!(rows[0]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_query_failure_is_error() {
        let tool = CypherQueryTool::new(session());
        let err = tool
            .execute(json!({"cypher": "MATCH (x) RETURN x"}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("query execution failed"));
    }

    #[tokio::test]
    async fn test_query_requires_cypher() {
        let tool = CypherQueryTool::new(session());
        assert!(tool.execute(json!({"sql": "x"})).await.is_err());
    }

    #[tokio::test]
    async fn test_schema_document() {
        let tool = GetSchemaTool::new(session());
        let result = tool.execute(Value::Null).await.unwrap();
        let schema: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();

        assert_eq!(schema["nodeTables"][0]["name"], "Person");
        assert_eq!(schema["nodeTables"][0]["properties"][0]["isPrimaryKey"], true);
        assert_eq!(schema["relTables"][0]["name"], "Knows");
        assert!(schema["relTables"][0]["properties"][0].get("isPrimaryKey").is_none());
        assert_eq!(schema["relTables"][0]["connectivity"][0]["dst"], "Person");
    }

    #[tokio::test]
    async fn test_schema_without_connection() {
        let tool = GetSchemaTool::new(Arc::new(SessionStore::<FakeClient>::new()));
        let err = tool.execute(Value::Null).await.unwrap_err();
        assert!(err.to_string().contains("No database connection"));
    }
}
