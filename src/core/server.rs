//! MCP server implementation and lifecycle management.
//!
//! The server handler implements the MCP protocol by delegating every
//! `tools/call` to the tools domain. Handlers are pure functions over their
//! arguments, so the server carries no per-request state: the config and the
//! coordination-id generator are the only shared pieces, both behind `Arc`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{
    CoordinationIdGen, SequentialIdGen, ToolError, ToolRegistry, build_tool_router,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registry used for dispatch-by-name (HTTP transport).
    registry: Arc<ToolRegistry>,

    /// Tool router for rmcp-based transports.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let id_gen: Arc<dyn CoordinationIdGen> = Arc::new(SequentialIdGen::new());

        Self {
            tool_router: build_tool_router::<Self>(config.clone(), id_gen.clone()),
            registry: Arc::new(ToolRegistry::new(config.clone(), id_gen)),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// List all available tools as plain JSON metadata.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name, returning the handler's raw output value.
    ///
    /// Used by the HTTP transport; the rmcp transports go through the router.
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        self.registry.call_tool(name, arguments)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Engineering-workflow MCP server. Provides practitioner style selection, \
                 styled code generation, team workflow coordination, and heuristic code \
                 quality analysis."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_exposes_four_tools() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools();
        assert_eq!(tools.len(), 4);
        for tool in &tools {
            assert!(tool["name"].is_string());
            assert!(tool["inputSchema"].is_object());
        }
    }

    #[test]
    fn test_server_call_tool_roundtrip() {
        let server = McpServer::new(Config::default());
        let value = server
            .call_tool(
                "analyze_code_quality",
                serde_json::json!({ "code": "function f(){ if(x){} }" }),
            )
            .unwrap();
        assert_eq!(value["metrics"]["functions"], 1);
    }

    #[test]
    fn test_server_unknown_tool_is_not_found() {
        let server = McpServer::new(Config::default());
        let result = server.call_tool("bogus", serde_json::json!({}));
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_server_identity_from_config() {
        let mut config = Config::default();
        config.server.name = "test-server".to_string();
        let server = McpServer::new(config);
        assert_eq!(server.name(), "test-server");
    }
}
