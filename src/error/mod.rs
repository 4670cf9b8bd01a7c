//! Error types for the MCP servers.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` conversions.

use std::borrow::Cow;
use thiserror::Error;

/// Main error type shared by both adapters.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to format response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: Cow<'static, str> },
}

/// JSON-RPC 2.0 and MCP protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Parse error: invalid JSON")]
    ParseError,

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(Cow<'static, str>),

    #[error("Internal error: {0}")]
    InternalError(Cow<'static, str>),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
}

impl ProtocolError {
    /// Returns the JSON-RPC 2.0 error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) => -32602,
            Self::InternalError(_) => -32603,
            Self::ResourceNotFound(_) => -32002,
        }
    }
}

/// Connection and query errors raised by the backend clients and the session.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("No database connection. Use the 'configure' tool first to connect to a database.")]
    NotConnected,

    #[error("database connection is not established")]
    NotEstablished,

    #[error("database file does not exist: {0}")]
    FileNotFound(String),

    #[error("cannot access database file: {0}")]
    Access(String),

    #[error("failed to open database: {0}")]
    OpenFailed(String),

    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("query execution failed: {0}")]
    QueryFailed(String),

    #[error("failed to read query results: {0}")]
    ResultFailed(String),

    #[error("failed to read catalog for table {table}: {message}")]
    Catalog { table: String, message: String },

    #[error("session has been closed")]
    SessionClosed,
}

/// Configuration errors, raised both at startup and by the `configure` tool.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Either 'db_path' or 'home_dir' must be provided")]
    NothingToConfigure,

    #[error("Home directory does not exist: {0}")]
    HomeDirNotFound(String),

    #[error("Home path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Cannot access home directory: {0}")]
    HomeDirAccess(String),

    #[error("No home directory configured. Use the 'configure' tool to set a home directory first.")]
    NoHomeDir,

    #[error("Failed to list files in home directory: {0}")]
    ListFiles(String),
}

/// Tool execution errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type alias for McpError.
pub type Result<T> = std::result::Result<T, McpError>;

/// Result type alias for DatabaseError.
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

/// Result type alias for ProtocolError.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        assert_eq!(ProtocolError::ParseError.code(), -32700);
        assert_eq!(ProtocolError::MethodNotFound("test".into()).code(), -32601);
        assert_eq!(ProtocolError::InvalidParams("test".into()).code(), -32602);
        assert_eq!(ProtocolError::InternalError("test".into()).code(), -32603);
        assert_eq!(ProtocolError::ResourceNotFound("x://y".into()).code(), -32002);
    }

    #[test]
    fn test_error_conversion() {
        let db_error = DatabaseError::ConnectionFailed("test".into());
        let mcp_error: McpError = db_error.into();
        assert!(matches!(mcp_error, McpError::Database(_)));
    }

    #[test]
    fn test_not_connected_message() {
        let message = McpError::from(DatabaseError::NotConnected).to_string();
        assert!(message.contains("No database connection"));
    }

    #[test]
    fn test_not_found_is_distinct_from_access() {
        let missing = DatabaseError::FileNotFound("/tmp/x.db".into()).to_string();
        let denied = DatabaseError::Access("permission denied".into()).to_string();
        assert!(missing.starts_with("database file does not exist"));
        assert!(denied.starts_with("cannot access database file"));
    }
}
