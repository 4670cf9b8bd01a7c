//! Tool registry for dynamic tool registration.

use crate::error::{McpError, Result, ToolError};
use crate::protocol::{CallToolParams, CallToolResult, Tool};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> Tool;
    async fn execute(&self, arguments: Value) -> Result<CallToolResult>;
}

pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    pub fn register<T: ToolHandler + 'static>(&self, tool: T) {
        let definition = tool.definition();
        let name = definition.name.clone();
        debug!("Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).map(|r| Arc::clone(&*r))
    }

    /// Tool definitions sorted by name.
    pub fn list(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.tools.iter().map(|r| r.value().definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub async fn execute(&self, params: CallToolParams) -> Result<CallToolResult> {
        let tool = self
            .get(&params.name)
            .ok_or_else(|| ToolError::NotFound(params.name.clone()))?;

        tool.execute(params.arguments).await
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! define_tool {
    (
        name: $name:expr,
        description: $desc:expr,
        schema: $schema:tt
    ) => {
        $crate::protocol::Tool {
            name: $name.into(),
            description: Some($desc.into()),
            input_schema: serde_json::json!($schema),
        }
    };
}

/// Decodes tool arguments. Absent arguments decode like an empty object.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()).into())
}

/// Compact JSON text result.
pub fn json_result<T: Serialize>(data: &T) -> Result<CallToolResult> {
    Ok(CallToolResult::text(serde_json::to_string(data)?))
}

/// Runs a blocking backend call off the async runtime.
pub async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| McpError::Internal {
            message: format!("blocking task failed: {}", e).into(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    struct TestTool(&'static str);

    #[async_trait]
    impl ToolHandler for TestTool {
        fn definition(&self) -> Tool {
            crate::define_tool! {
                name: self.0,
                description: "A test tool",
                schema: {
                    "type": "object",
                    "properties": {}
                }
            }
        }

        async fn execute(&self, _arguments: Value) -> Result<CallToolResult> {
            Ok(CallToolResult::text("test result"))
        }
    }

    #[test]
    fn test_registry() {
        let registry = ToolRegistry::new();
        registry.register(TestTool("zeta"));
        registry.register(TestTool("alpha"));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("zeta").is_some());
        assert!(registry.get("unknown").is_none());

        let names: Vec<_> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_execute() {
        let registry = ToolRegistry::new();
        registry.register(TestTool("test_tool"));

        let params = CallToolParams {
            name: "test_tool".into(),
            arguments: serde_json::json!({}),
        };

        let result = registry.execute(params).await.unwrap();
        assert!(result.is_error.is_none());
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let params = CallToolParams {
            name: "missing".into(),
            arguments: Value::Null,
        };
        let err = registry.execute(params).await.unwrap_err();
        assert!(matches!(err, McpError::Tool(ToolError::NotFound(_))));
    }

    #[derive(Debug, Deserialize)]
    struct Args {
        #[serde(default)]
        name: String,
    }

    #[test]
    fn test_parse_arguments_accepts_null() {
        let args: Args = parse_arguments(Value::Null).unwrap();
        assert!(args.name.is_empty());
    }

    #[test]
    fn test_parse_arguments_rejects_wrong_type() {
        let err = parse_arguments::<Args>(serde_json::json!({"name": 5})).unwrap_err();
        assert!(matches!(err, McpError::Tool(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_errors() {
        let ok = run_blocking(|| Ok(2 + 2)).await.unwrap();
        assert_eq!(ok, 4);

        let err = run_blocking(|| -> Result<()> { Err(ToolError::InvalidArguments("x".into()).into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::Tool(ToolError::InvalidArguments(_))));
    }
}
