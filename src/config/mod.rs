//! Configuration types and builders.
//!
//! Builders read the environment through a lookup closure, so tests can
//! supply variables without touching the process environment.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;

pub const DUCKDB_DB_PATH: &str = "DUCKDB_DB_PATH";
pub const DUCKDB_HOME_DIR: &str = "DUCKDB_HOME_DIR";
pub const DUCKDB_READ_ONLY: &str = "DUCKDB_READ_ONLY";
pub const KUZU_DB_PATH: &str = "KUZU_DB_PATH";
pub const KUZU_READ_ONLY: &str = "KUZU_READ_ONLY";

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Looks up `key`, treating empty values as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.is_empty())
}

/// Startup settings for the relational server.
///
/// When either path is present the session is configured before the server
/// starts accepting requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalConfig {
    pub db_path: Option<String>,
    pub home_dir: Option<String>,
    pub read_only: bool,
}

impl RelationalConfig {
    pub fn builder() -> RelationalConfigBuilder {
        RelationalConfigBuilder::default()
    }

    pub fn should_auto_configure(&self) -> bool {
        self.db_path.is_some() || self.home_dir.is_some()
    }
}

/// Builder for RelationalConfig with fluent API.
#[derive(Default)]
pub struct RelationalConfigBuilder {
    config: RelationalConfig,
}

impl RelationalConfigBuilder {
    pub fn db_path(mut self, path: impl Into<String>) -> Self {
        self.config.db_path = Some(path.into());
        self
    }

    pub fn home_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.home_dir = Some(dir.into());
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Build from environment variables.
    pub fn from_env(self) -> Result<Self> {
        self.from_lookup(env_lookup)
    }

    pub fn from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = non_empty(&lookup, DUCKDB_DB_PATH) {
            self.config.db_path = Some(path);
        }

        if let Some(dir) = non_empty(&lookup, DUCKDB_HOME_DIR) {
            self.config.home_dir = Some(dir);
        }

        if let Some(flag) = non_empty(&lookup, DUCKDB_READ_ONLY) {
            self.config.read_only = parse_bool(DUCKDB_READ_ONLY, &flag)?;
        }

        Ok(self)
    }

    pub fn build(self) -> RelationalConfig {
        self.config
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            message: format!("expected 'true' or 'false', got '{}'", value).into(),
        }
        .into())
    }
}

/// Startup settings for the graph server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub db_path: String,
    pub read_only: bool,
}

impl GraphConfig {
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }
}

/// Builder for GraphConfig.
///
/// The database path comes from the first command-line argument, falling
/// back to `KUZU_DB_PATH`. Read-only mode is on only when `KUZU_READ_ONLY`
/// is exactly `true`.
#[derive(Default)]
pub struct GraphConfigBuilder {
    db_path: Option<String>,
    read_only: bool,
}

impl GraphConfigBuilder {
    /// Takes the database path from process arguments, program name excluded.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(first) = args.into_iter().next() {
            self.db_path = Some(first.into());
        }
        self
    }

    pub fn from_env(self) -> Self {
        self.from_lookup(env_lookup)
    }

    pub fn from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.db_path.is_none() {
            self.db_path = non_empty(&lookup, KUZU_DB_PATH);
        }
        self.read_only = lookup(KUZU_READ_ONLY).as_deref() == Some("true");
        self
    }

    pub fn build(self) -> Result<GraphConfig> {
        let db_path = self.db_path.ok_or_else(|| {
            ConfigError::MissingField(
                "database path (pass it as the first argument or set KUZU_DB_PATH)".into(),
            )
        })?;

        Ok(GraphConfig {
            db_path,
            read_only: self.read_only,
        })
    }
}

/// Server identity reported during `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<Cow<'static, str>>) -> Self {
        self.config.version = version.into();
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
