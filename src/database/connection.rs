//! Connection targets, path validation and connection metadata.

use crate::error::{DatabaseError, DbResult};
use serde::Serialize;
use std::fmt;
use std::io::ErrorKind;

/// Path that opens a transient in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Marker appended to the textual target of read-only connections.
pub const READ_ONLY_MARKER: &str = "?access_mode=read_only";

pub fn is_memory_path(path: &str) -> bool {
    path == MEMORY_PATH
}

/// Checks that a database path exists, unless it is the in-memory sentinel.
pub fn validate_db_path(path: &str) -> DbResult<()> {
    if is_memory_path(path) {
        return Ok(());
    }

    match std::fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(DatabaseError::FileNotFound(path.to_string()))
        }
        Err(e) => Err(DatabaseError::Access(e.to_string())),
    }
}

/// Where and how a client connects.
///
/// The read-only marker is never applied to in-memory databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    path: String,
    read_only: bool,
}

impl ConnectionTarget {
    pub fn new(path: impl Into<String>, read_only: bool) -> Self {
        let path = path.into();
        let read_only = read_only && !is_memory_path(&path);
        Self { path, read_only }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_memory(&self) -> bool {
        is_memory_path(&self.path)
    }

    /// Whether the connection is opened with the read-only access mode.
    pub fn read_only(&self) -> bool {
        self.read_only
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if self.read_only {
            f.write_str(READ_ONLY_MARKER)?;
        }
        Ok(())
    }
}

/// Snapshot of the session's connection, used in server instructions.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionMetadata {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,
    pub read_only: bool,
}

impl ConnectionMetadata {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            backend: None,
            db_path: None,
            home_dir: None,
            read_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_path_skips_existence_check() {
        assert!(validate_db_path(MEMORY_PATH).is_ok());
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.duckdb");
        let err = validate_db_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DatabaseError::FileNotFound(_)));
    }

    #[test]
    fn test_existing_path_is_valid() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_db_path(file.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_target_read_only_marker() {
        let target = ConnectionTarget::new("/data/app.duckdb", true);
        assert!(target.read_only());
        assert_eq!(target.to_string(), "/data/app.duckdb?access_mode=read_only");

        let writable = ConnectionTarget::new("/data/app.duckdb", false);
        assert_eq!(writable.to_string(), "/data/app.duckdb");
    }

    #[test]
    fn test_memory_target_ignores_read_only() {
        let target = ConnectionTarget::new(MEMORY_PATH, true);
        assert!(target.is_memory());
        assert!(!target.read_only());
        assert_eq!(target.to_string(), ":memory:");
    }

    #[test]
    fn test_connection_metadata_serialization() {
        let metadata = ConnectionMetadata {
            connected: true,
            backend: Some("duckdb".into()),
            db_path: Some(":memory:".into()),
            home_dir: None,
            read_only: false,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("\"connected\":true"));
        assert!(json.contains("\"db_path\":\":memory:\""));
        assert!(!json.contains("home_dir"));
    }
}
