//! Resource registry keyed by URI.

use crate::error::{ProtocolError, ProtocolResult, Result};
use crate::protocol::{ReadResourceResult, Resource, ResourceContent};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, error};

#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn definition(&self) -> Resource;

    /// Produces the resource body as text.
    async fn read(&self) -> Result<String>;
}

pub struct ResourceRegistry {
    resources: DashMap<String, Arc<dyn ResourceHandler>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
        }
    }

    pub fn register<R: ResourceHandler + 'static>(&self, resource: R) {
        let uri = resource.definition().uri;
        debug!("Registering resource: {}", uri);
        self.resources.insert(uri, Arc::new(resource));
    }

    pub fn get(&self, uri: &str) -> Option<Arc<dyn ResourceHandler>> {
        self.resources.get(uri).map(|r| Arc::clone(&*r))
    }

    /// Resource definitions sorted by URI.
    pub fn list(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self
            .resources
            .iter()
            .map(|r| r.value().definition())
            .collect();
        resources.sort_by(|a, b| a.uri.cmp(&b.uri));
        resources
    }

    pub async fn read(&self, uri: &str) -> ProtocolResult<ReadResourceResult> {
        let resource = self
            .get(uri)
            .ok_or_else(|| ProtocolError::ResourceNotFound(uri.to_string()))?;

        let text = resource.read().await.map_err(|e| {
            error!("Resource read failed for {}: {}", uri, e);
            ProtocolError::InternalError(e.to_string().into())
        })?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                mime_type: resource.definition().mime_type,
                text: Some(text),
            }],
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
