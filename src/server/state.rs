//! Server state management.

use crate::config::ServerConfig;
use crate::protocol::ClientInfo;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Produces the `initialize` instructions from the live session state.
pub type Instructions = Box<dyn Fn() -> String + Send + Sync>;

pub struct ServerState {
    pub config: ServerConfig,
    pub tools: ToolRegistry,
    pub resources: ResourceRegistry,
    instructions: Instructions,
    initialized: AtomicBool,
    client_info: RwLock<Option<ClientInfo>>,
    request_count: AtomicU64,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        tools: ToolRegistry,
        resources: ResourceRegistry,
        instructions: Instructions,
    ) -> Self {
        Self {
            config,
            tools,
            resources,
            instructions,
            initialized: AtomicBool::new(false),
            client_info: RwLock::new(None),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn set_initialized(&self, client_info: ClientInfo) {
        *self.client_info.write() = Some(client_info);
        self.initialized.store(true, Ordering::SeqCst);
    }

    pub fn client_info(&self) -> Option<ClientInfo> {
        self.client_info.read().clone()
    }

    pub fn instructions(&self) -> String {
        (self.instructions)()
    }

    pub fn next_request_id(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }
}

pub struct ServerStateBuilder {
    config: Option<ServerConfig>,
    tools: Option<ToolRegistry>,
    resources: Option<ResourceRegistry>,
    instructions: Option<Instructions>,
}

impl ServerStateBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            tools: None,
            resources: None,
            instructions: None,
        }
    }

    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn resources(mut self, resources: ResourceRegistry) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn instructions<F>(mut self, instructions: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.instructions = Some(Box::new(instructions));
        self
    }

    pub fn build(self) -> Result<ServerState, &'static str> {
        let config = self.config.ok_or("Config is required")?;
        let tools = self.tools.ok_or("Tool registry is required")?;
        let resources = self.resources.unwrap_or_default();
        let instructions = self
            .instructions
            .unwrap_or_else(|| Box::new(String::new) as Instructions);

        Ok(ServerState::new(config, tools, resources, instructions))
    }
}

impl Default for ServerStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_tools() {
        let err = ServerStateBuilder::new()
            .config(ServerConfig::default())
            .build()
            .err();
        assert_eq!(err, Some("Tool registry is required"));
    }

    #[test]
    fn test_initialized_records_client() {
        let state = ServerStateBuilder::new()
            .config(ServerConfig::default())
            .tools(ToolRegistry::new())
            .instructions(|| "hello".to_string())
            .build()
            .unwrap();

        assert!(!state.is_initialized());
        assert!(state.resources.is_empty());
        assert_eq!(state.instructions(), "hello");

        state.set_initialized(ClientInfo {
            name: "inspector".into(),
            version: "1.0".into(),
        });
        assert!(state.is_initialized());
        assert_eq!(state.client_info().unwrap().name, "inspector");
        assert_eq!(state.next_request_id(), 0);
        assert_eq!(state.request_count(), 1);
    }
}
