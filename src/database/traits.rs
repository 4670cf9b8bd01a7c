//! Backend client traits.
//!
//! Implementations: [`DuckDbClient`](crate::database::DuckDbClient),
//! [`KuzuClient`](crate::database::KuzuClient).

use crate::database::result::RowMap;
use crate::error::DbResult;

/// A single connection to one backend database.
///
/// Clients are shared as `Arc<Self>` between the session and in-flight tool
/// calls, so every method takes `&self`.
pub trait DatabaseClient: Send + Sync + Sized + 'static {
    /// Returns the backend name (e.g., "duckdb", "kuzu").
    fn backend(&self) -> &'static str;

    /// Opens and pings a connection.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::FileNotFound`](crate::error::DatabaseError::FileNotFound)
    /// if `path` is not the in-memory sentinel and does not exist, and
    /// [`DatabaseError::ConnectionFailed`](crate::error::DatabaseError::ConnectionFailed)
    /// if the liveness check fails.
    fn open(path: &str, read_only: bool) -> DbResult<Self>;

    /// Path the client was opened with.
    fn db_path(&self) -> &str;

    /// Read-only flag the client was opened with.
    fn is_read_only(&self) -> bool;

    /// Whether the underlying handle is still open.
    fn is_open(&self) -> bool;

    /// Closes the connection. Safe to call more than once.
    fn close(&self);
}

/// Backends that answer a statement with a rendered text table.
pub trait TableQuery {
    /// Executes `sql` and returns the fully rendered result.
    fn query(&self, sql: &str) -> DbResult<String>;
}

/// Backends that answer a statement with column-keyed rows.
///
/// Used for plain graph queries and for catalog calls during schema
/// introspection.
pub trait CatalogSource {
    fn fetch_rows(&self, statement: &str) -> DbResult<Vec<RowMap>>;
}
