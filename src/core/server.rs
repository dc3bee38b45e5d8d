//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. Tool listing and invocation are routed through the
//! [`ToolRegistry`]; see `domains/tools/` for the tool definitions.

use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    model::{JsonObject, ServerCapabilities, ServerInfo},
    tool_handler,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error::Result as CoreResult;
use crate::domains::sage::SageClient;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router, error_result};

const INSTRUCTIONS: &str = "Tools for the Sage Business Cloud Accounting API. \
    List tools accept optional filters plus page and items_per_page; \
    get tools take an id; create tools return the created record. \
    Use sage_list_ledger_accounts and sage_list_tax_rates to find ids for invoice lines.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatch table shared with every tool route.
    registry: Arc<ToolRegistry>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server talking to the Sage API described by `config`.
    pub fn new(config: Config) -> CoreResult<Self> {
        let client = SageClient::from_config(&config.sage)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a server around an existing Sage client.
    pub fn with_client(config: Config, client: SageClient) -> Self {
        let registry = Arc::new(ToolRegistry::new(client));
        info!("Registered {} tools", registry.tool_names().len());

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config: Arc::new(config),
            registry,
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

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON (for HTTP transport).
    pub fn list_tools(&self) -> Vec<Value> {
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

    /// Call a tool by name and return the MCP result envelope as JSON
    /// (for HTTP transport).
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        let result = match arguments {
            Value::Object(map) => self.registry.call(name, map).await,
            Value::Null => self.registry.call(name, JsonObject::new()).await,
            _ => error_result(&ToolError::invalid_arguments(
                "'arguments' must be a JSON object",
            )),
        };

        serde_json::json!({
            "content": result.content,
            "isError": result.is_error.unwrap_or(false)
        })
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::sage::testing::ScriptedSender;
    use crate::domains::sage::{CredentialStore, HttpReply};

    fn test_server(replies: Vec<HttpReply>) -> McpServer {
        let credentials = Arc::new(CredentialStore::new(
            Some("t1".to_string()),
            None,
            None,
            None,
        ));
        let client = SageClient::new(
            "https://api.accounting.sage.com/v3.1",
            credentials,
            Arc::new(ScriptedSender::new(replies)),
        );
        McpServer::with_client(Config::default(), client)
    }

    #[test]
    fn test_new_from_default_config() {
        let server = McpServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "sage-accounting-mcp");
        assert_eq!(server.registry().tool_names().len(), 24);
        assert_eq!(
            server.registry().client().base_url(),
            "https://api.accounting.sage.com/v3.1"
        );
    }

    #[test]
    fn test_list_tools_json() {
        let server = test_server(vec![]);
        let tools = server.list_tools();
        assert_eq!(tools.len(), 24);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_call_tool_success_envelope() {
        let server = test_server(vec![HttpReply::new(200, r#"{"id":"B1"}"#)]);
        let response = server
            .call_tool("sage_get_bank_account", serde_json::json!({"id": "B1"}))
            .await;
        assert_eq!(response["isError"], false);
        assert_eq!(response["content"][0]["type"], "text");
        assert!(
            response["content"][0]["text"]
                .as_str()
                .unwrap()
                .contains("\"B1\"")
        );
    }

    #[tokio::test]
    async fn test_call_tool_rejects_non_object_arguments() {
        let server = test_server(vec![]);
        let response = server
            .call_tool("sage_list_contacts", serde_json::json!([1, 2]))
            .await;
        assert_eq!(response["isError"], true);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = test_server(vec![]);
        let response = server.call_tool("unknown", Value::Null).await;
        assert_eq!(response["isError"], true);
        assert_eq!(response["content"][0]["text"], "Error: Unknown tool: unknown");
    }

    #[test]
    fn test_server_info_enables_tools_only() {
        let info = test_server(vec![]).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.instructions.unwrap().contains("Sage"));
    }
}
