//! The `configure` tool: connect to a database and/or set the home directory.

use crate::database::{DatabaseClient, SessionStore, is_memory_path, validate_db_path};
use crate::discovery::{FileCatalog, catalog_home_dir};
use crate::error::{ConfigError, McpError, Result};
use crate::protocol::{CallToolResult, Tool};
use crate::tools::registry::{ToolHandler, json_result, parse_arguments, run_blocking};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigureArgs {
    #[serde(default)]
    pub db_path: String,
    #[serde(default)]
    pub home_dir: String,
    #[serde(default)]
    pub read_only: bool,
}

impl ConfigureArgs {
    /// Checks the request before the session is touched.
    pub fn validate(&self) -> Result<()> {
        if self.db_path.is_empty() && self.home_dir.is_empty() {
            return Err(ConfigError::NothingToConfigure.into());
        }
        if !self.db_path.is_empty() && !is_memory_path(&self.db_path) {
            validate_db_path(&self.db_path)?;
        }
        if !self.home_dir.is_empty() {
            validate_home_dir(&self.home_dir)?;
        }
        Ok(())
    }
}

/// Requires `dir` to exist and be a directory.
pub fn validate_home_dir(dir: &str) -> std::result::Result<(), ConfigError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::NotADirectory(dir.to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(ConfigError::HomeDirNotFound(dir.to_string()))
        }
        Err(e) => Err(ConfigError::HomeDirAccess(e.to_string())),
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigureResponse {
    pub success: bool,
    pub message: String,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_files: Option<FileCatalog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
}

impl ConfigureResponse {
    fn new(args: &ConfigureArgs, connected: bool, files: Option<FileCatalog>) -> Self {
        let mut message = String::new();
        if !args.db_path.is_empty() {
            message = format!("Successfully connected to database: {}", args.db_path);
            if args.read_only {
                message.push_str(" (read-only mode)");
            }
        }

        if let Some(files) = &files {
            if args.db_path.is_empty() {
                message = format!(
                    "Home directory set to: {} (found {} supported files)",
                    args.home_dir,
                    files.total()
                );
            } else {
                message.push_str(&format!(" | Home directory: {}", args.home_dir));
            }
        }

        Self {
            success: true,
            message,
            connected,
            db_path: (!args.db_path.is_empty()).then(|| args.db_path.clone()),
            home_dir: (!args.home_dir.is_empty()).then(|| args.home_dir.clone()),
            read_only: args.read_only,
            total_files: files.as_ref().map(FileCatalog::total),
            available_files: files,
        }
    }
}

pub struct ConfigureTool<C: DatabaseClient> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient> ConfigureTool<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient> ToolHandler for ConfigureTool<C> {
    fn definition(&self) -> Tool {
        crate::define_tool! {
            name: "configure",
            description: "Configure DuckDB database connection and/or working directory",
            schema: {
                "type": "object",
                "properties": {
                    "db_path": {
                        "type": "string",
                        "description": "Path to database file or ':memory:' for in-memory database"
                    },
                    "home_dir": {
                        "type": "string",
                        "description": "Directory to scan for available database and data files"
                    },
                    "read_only": {
                        "type": "boolean",
                        "description": "Connect in read-only mode (default: false)"
                    }
                }
            }
        }
    }

    #[instrument(skip(self, arguments), fields(tool = "configure"))]
    async fn execute(&self, arguments: Value) -> Result<CallToolResult> {
        let args: ConfigureArgs = parse_arguments(arguments)?;
        args.validate()?;

        let session = Arc::clone(&self.session);
        let request = args.clone();
        let files = run_blocking(move || {
            session
                .configure(&request.db_path, &request.home_dir, request.read_only)
                .map_err(McpError::from)?;
            if request.home_dir.is_empty() {
                return Ok(None);
            }
            Ok(Some(catalog_home_dir(&request.home_dir)?))
        })
        .await?;

        info!(
            db_path = %args.db_path,
            home_dir = %args.home_dir,
            read_only = args.read_only,
            "Session configured"
        );

        let response = ConfigureResponse::new(&args, self.session.has_connection(), files);
        json_result(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::session::testing::FakeClient;
    use crate::error::DatabaseError;
    use serde_json::json;
    use tempfile::{NamedTempFile, TempDir};

    fn tool() -> (ConfigureTool<FakeClient>, Arc<SessionStore<FakeClient>>) {
        let session = Arc::new(SessionStore::new());
        (ConfigureTool::new(Arc::clone(&session)), session)
    }

    fn parse(result: &CallToolResult) -> Value {
        serde_json::from_str(result.first_text().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_memory_database() {
        let (tool, session) = tool();
        let result = tool.execute(json!({"db_path": ":memory:"})).await.unwrap();
        let body = parse(&result);

        assert_eq!(body["success"], true);
        assert_eq!(body["connected"], true);
        assert_eq!(body["db_path"], ":memory:");
        assert_eq!(body["message"], "Successfully connected to database: :memory:");
        assert!(body.get("home_dir").is_none());
        assert!(body.get("available_files").is_none());
        assert!(session.has_connection());
    }

    #[tokio::test]
    async fn test_empty_home_dir_lists_nothing() {
        let (tool, session) = tool();
        let dir = TempDir::new().unwrap();
        let home = dir.path().to_str().unwrap();

        let body = parse(&tool.execute(json!({"home_dir": home})).await.unwrap());
        assert_eq!(body["available_files"], json!({}));
        assert_eq!(body["total_files"], 0);
        assert_eq!(body["connected"], false);
        assert_eq!(
            body["message"],
            format!("Home directory set to: {} (found 0 supported files)", home)
        );
        assert_eq!(session.home_dir(), home);
    }

    #[tokio::test]
    async fn test_database_and_home_dir() {
        let (tool, _session) = tool();
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sales.csv"), b"a,b\n").unwrap();
        let home = dir.path().to_str().unwrap();

        let body = parse(
            &tool
                .execute(json!({"db_path": ":memory:", "home_dir": home, "read_only": true}))
                .await
                .unwrap(),
        );
        assert_eq!(body["read_only"], true);
        assert_eq!(body["available_files"]["CSV Files"][0], "sales.csv");
        assert_eq!(
            body["message"],
            format!(
                "Successfully connected to database: :memory: (read-only mode) | Home directory: {}",
                home
            )
        );
    }

    #[tokio::test]
    async fn test_nothing_to_configure() {
        let (tool, session) = tool();
        for args in [json!({}), Value::Null, json!({"db_path": "", "home_dir": ""})] {
            let err = tool.execute(args).await.unwrap_err();
            assert_eq!(err.to_string(), "Either 'db_path' or 'home_dir' must be provided");
        }
        assert!(!session.is_configured());
    }

    #[tokio::test]
    async fn test_missing_database_file() {
        let (tool, session) = tool();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.duckdb");

        let err = tool
            .execute(json!({"db_path": path.to_str().unwrap()}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            McpError::Database(DatabaseError::FileNotFound(_))
        ));
        assert!(!session.is_configured());
    }

    #[tokio::test]
    async fn test_home_dir_must_be_directory() {
        let (tool, _session) = tool();
        let file = NamedTempFile::new().unwrap();
        let err = tool
            .execute(json!({"home_dir": file.path().to_str().unwrap()}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Home path is not a directory"));

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = tool
            .execute(json!({"home_dir": missing.to_str().unwrap()}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Home directory does not exist"));
    }

    #[tokio::test]
    async fn test_open_failure_is_error() {
        let (tool, session) = tool();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.broken");
        std::fs::write(&path, b"").unwrap();

        let err = tool
            .execute(json!({"db_path": path.to_str().unwrap()}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            McpError::Database(DatabaseError::ConnectionFailed(_))
        ));
        assert!(!session.has_connection());
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let (tool, _session) = tool();
        let err = tool.execute(json!({"read_only": "yes"})).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid arguments"));
    }
}
