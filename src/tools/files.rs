//! The `list_files` tool.

use crate::database::{DatabaseClient, SessionStore};
use crate::discovery::{FileCatalog, catalog_home_dir};
use crate::error::{ConfigError, Result};
use crate::protocol::{CallToolResult, Tool};
use crate::tools::registry::{ToolHandler, json_result, run_blocking};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub success: bool,
    pub home_dir: String,
    pub available_files: FileCatalog,
    pub total_files: usize,
    pub message: String,
}

pub struct ListFilesTool<C: DatabaseClient> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient> ListFilesTool<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient> ToolHandler for ListFilesTool<C> {
    fn definition(&self) -> Tool {
        crate::define_tool! {
            name: "list_files",
            description: "List available database and data files in the configured home directory",
            schema: {
                "type": "object",
                "properties": {}
            }
        }
    }

    #[instrument(skip(self, _arguments), fields(tool = "list_files"))]
    async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
        let home_dir = self.session.home_dir();
        if home_dir.is_empty() {
            return Err(ConfigError::NoHomeDir.into());
        }

        let dir = home_dir.clone();
        let files = run_blocking(move || Ok(catalog_home_dir(&dir)?)).await?;
        let total_files = files.total();

        json_result(&ListFilesResponse {
            success: true,
            message: format!("Found {} supported files in {}", total_files, home_dir),
            home_dir,
            available_files: files,
            total_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::session::testing::FakeClient;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_requires_home_dir() {
        let tool = ListFilesTool::new(Arc::new(SessionStore::<FakeClient>::new()));
        let err = tool.execute(Value::Null).await.unwrap_err();
        assert!(err.to_string().starts_with("No home directory configured"));
    }

    #[tokio::test]
    async fn test_lists_home_dir() {
        let dir = TempDir::new().unwrap();
        for name in ["a.parquet", "b.json", "c.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let home = dir.path().to_str().unwrap();

        let session = Arc::new(SessionStore::<FakeClient>::new());
        session.configure("", home, false).unwrap();
        let tool = ListFilesTool::new(session);

        let result = tool.execute(json!({})).await.unwrap();
        let body: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["total_files"], 2);
        assert_eq!(body["available_files"]["Parquet Files"], json!(["a.parquet"]));
        assert_eq!(body["message"], format!("Found 2 supported files in {}", home));
    }

    #[tokio::test]
    async fn test_home_dir_removed_after_configure() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("gone");
        std::fs::create_dir(&home).unwrap();

        let session = Arc::new(SessionStore::<FakeClient>::new());
        session.configure("", home.to_str().unwrap(), false).unwrap();
        std::fs::remove_dir(&home).unwrap();

        let err = ListFilesTool::new(session).execute(json!({})).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to list files in home directory"));
    }
}
