//! MCP request handler implementation.

use crate::error::ProtocolResult;
use crate::protocol::{
    CallToolParams, CallToolResult, Handler, InitializeParams, InitializeResult,
    ListResourcesResult, ListToolsResult, MCP_VERSION, ReadResourceParams, ReadResourceResult,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::server::state::ServerState;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// MCP request handler that processes protocol messages.
pub struct McpHandler {
    state: Arc<ServerState>,
}

impl McpHandler {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    fn capabilities(&self) -> ServerCapabilities {
        let resources = (!self.state.resources.is_empty()).then(|| ResourcesCapability {
            subscribe: Some(false),
            list_changed: Some(false),
        });

        ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources,
        }
    }
}

#[async_trait]
impl Handler for McpHandler {
    async fn initialize(&self, params: InitializeParams) -> ProtocolResult<InitializeResult> {
        info!(
            "Initialize request from {} v{}",
            params.client_info.name, params.client_info.version
        );
        debug!("Client capabilities: {:?}", params.capabilities);

        self.state.set_initialized(params.client_info);

        let instructions = self.state.instructions();

        Ok(InitializeResult {
            protocol_version: MCP_VERSION.into(),
            capabilities: self.capabilities(),
            server_info: ServerInfo {
                name: self.state.config.name.to_string(),
                version: self.state.config.version.to_string(),
            },
            instructions: (!instructions.is_empty()).then_some(instructions),
        })
    }

    async fn initialized(&self) -> ProtocolResult<()> {
        info!("Server initialized successfully");
        Ok(())
    }

    async fn shutdown(&self) -> ProtocolResult<()> {
        info!("Shutdown request received");
        Ok(())
    }

    async fn list_tools(&self) -> ProtocolResult<ListToolsResult> {
        let tools = self.state.tools.list();
        debug!("Listing {} tools", tools.len());

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(&self, params: CallToolParams) -> ProtocolResult<CallToolResult> {
        debug!("Tool call: {}", params.name);
        self.state.next_request_id();

        match self.state.tools.execute(params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Tool execution error: {}", e);
                Ok(CallToolResult::error(e.to_string()))
            }
        }
    }

    async fn list_resources(&self) -> ProtocolResult<ListResourcesResult> {
        Ok(ListResourcesResult {
            resources: self.state.resources.list(),
            next_cursor: None,
        })
    }

    async fn read_resource(&self, params: ReadResourceParams) -> ProtocolResult<ReadResourceResult> {
        debug!("Resource read: {}", params.uri);
        self.state.resources.read(&params.uri).await
    }
}
