//! Database abstraction layer.
//!
//! One client per backend behind the [`DatabaseClient`] trait, and the
//! [`SessionStore`] that owns the live client.
//!
//! # Feature Flags
//!
//! - `duckdb` - DuckDB relational backend (enabled by default)
//! - `kuzu` - Kuzu graph backend
//!
//! # Example
//!
//! ```toml
//! # Cargo.toml - graph backend only
//! [dependencies]
//! data-tools-mcp = { version = "0.1", default-features = false, features = ["kuzu"] }
//! ```

pub mod connection;
#[cfg(feature = "duckdb")]
pub mod duckdb_client;
#[cfg(feature = "kuzu")]
pub mod kuzu_client;
pub mod result;
pub mod session;
pub mod traits;

pub use connection::{
    ConnectionMetadata, ConnectionTarget, MEMORY_PATH, is_memory_path, validate_db_path,
};
#[cfg(feature = "duckdb")]
pub use duckdb_client::DuckDbClient;
#[cfg(feature = "kuzu")]
pub use kuzu_client::KuzuClient;
pub use result::*;
pub use session::{SessionPhase, SessionStore};
pub use traits::{CatalogSource, DatabaseClient, TableQuery};
