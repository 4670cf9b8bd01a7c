//! `duckdb://home-directory`: the home directory listing as a resource.

use crate::database::{DatabaseClient, SessionStore};
use crate::discovery::{FileCatalog, catalog_home_dir};
use crate::error::{ConfigError, Result};
use crate::protocol::Resource;
use crate::render::render_json;
use crate::resources::registry::ResourceHandler;
use crate::tools::run_blocking;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub const HOME_DIRECTORY_URI: &str = "duckdb://home-directory";

#[derive(Debug, Serialize)]
pub struct HomeDirectoryListing {
    pub home_dir: String,
    pub available_files: FileCatalog,
    pub total_files: usize,
}

pub struct HomeDirectoryResource<C: DatabaseClient> {
    session: Arc<SessionStore<C>>,
}

impl<C: DatabaseClient> HomeDirectoryResource<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl<C: DatabaseClient> ResourceHandler for HomeDirectoryResource<C> {
    fn definition(&self) -> Resource {
        Resource {
            uri: HOME_DIRECTORY_URI.into(),
            name: "Home Directory Listing".into(),
            description: Some(
                "Lists available database and data files in the configured home directory".into(),
            ),
            mime_type: Some("application/json".into()),
        }
    }

    async fn read(&self) -> Result<String> {
        let home_dir = self.session.home_dir();
        if home_dir.is_empty() {
            return Err(ConfigError::NoHomeDir.into());
        }

        let dir = home_dir.clone();
        let files = run_blocking(move || Ok(catalog_home_dir(&dir)?)).await?;

        Ok(render_json(&HomeDirectoryListing {
            home_dir,
            total_files: files.total(),
            available_files: files,
        })?)
    }
}
