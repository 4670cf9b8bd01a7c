//! MCP tool definitions and registry.

pub mod configure;
pub mod files;
pub mod graph;
pub mod query;
pub mod registry;

pub use configure::{ConfigureArgs, ConfigureResponse, ConfigureTool};
pub use files::{ListFilesResponse, ListFilesTool};
pub use graph::{CypherQueryTool, GetSchemaTool};
pub use query::{QueryResponse, QueryTool};
pub use registry::{ToolHandler, ToolRegistry, json_result, parse_arguments, run_blocking};

use crate::database::{CatalogSource, DatabaseClient, SessionStore, TableQuery};
use std::sync::Arc;

/// Tools of the relational server: `configure`, `query`, `list_files`.
pub fn create_relational_registry<C>(session: Arc<SessionStore<C>>) -> ToolRegistry
where
    C: DatabaseClient + TableQuery,
{
    let registry = ToolRegistry::new();
    registry.register(ConfigureTool::new(Arc::clone(&session)));
    registry.register(QueryTool::new(Arc::clone(&session)));
    registry.register(ListFilesTool::new(session));
    registry
}

/// Tools of the graph server: `query` (Cypher) and `getSchema`.
pub fn create_graph_registry<C>(session: Arc<SessionStore<C>>) -> ToolRegistry
where
    C: DatabaseClient + CatalogSource,
{
    let registry = ToolRegistry::new();
    registry.register(CypherQueryTool::new(Arc::clone(&session)));
    registry.register(GetSchemaTool::new(session));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::session::testing::FakeClient;

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list().into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_relational_registry() {
        let registry = create_relational_registry(Arc::new(SessionStore::<FakeClient>::new()));
        assert_eq!(names(&registry), vec!["configure", "list_files", "query"]);
        let query = registry.get("query").unwrap().definition();
        assert_eq!(query.input_schema["required"][0], "sql");
    }

    #[test]
    fn test_graph_registry() {
        let registry = create_graph_registry(Arc::new(SessionStore::<FakeClient>::new()));
        assert_eq!(names(&registry), vec!["getSchema", "query"]);
        let query = registry.get("query").unwrap().definition();
        assert_eq!(query.input_schema["required"][0], "cypher");
    }
}
