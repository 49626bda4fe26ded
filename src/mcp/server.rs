use std::sync::Arc;

use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer};
use schemars::JsonSchema;

use super::dispatch::{Dispatcher, Operation};
use super::params::{DownloadFilesParams, FindFilesParams, SearchCodeParams};
use crate::engine::Engine;
use crate::error::ScoutError;
use crate::remote::RemoteClient;

pub struct McpServer<C> {
    dispatcher: Dispatcher<C>,
}

impl<C> Clone for McpServer<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<C: RemoteClient + 'static> McpServer<C> {
    pub fn new(engine: Arc<Engine<C>>) -> Self {
        Self {
            dispatcher: Dispatcher::new(engine),
        }
    }

    /// The fixed tool catalog.
    pub fn tools() -> Vec<Tool> {
        Operation::ALL
            .into_iter()
            .map(|op| Tool {
                name: op.name().into(),
                title: Some(op.title().to_string()),
                description: Some(op.description().into()),
                input_schema: match op {
                    Operation::FindFiles => schema_for::<FindFilesParams>(),
                    Operation::DownloadFiles => schema_for::<DownloadFilesParams>(),
                    Operation::SearchCode => schema_for::<SearchCodeParams>(),
                },
                output_schema: None,
                annotations: None,
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Runs one tool call. Unknown tools and operation failures come back as
    /// an error result; undecodable or missing arguments are protocol errors.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match self.dispatcher.dispatch(name, arguments).await {
            Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
            Err(ScoutError::UnknownOperation(name)) => Ok(CallToolResult::error(vec![
                Content::text(format!("Unknown tool: {}", name)),
            ])),
            Err(ScoutError::InvalidArguments(message)) => {
                Err(McpError::invalid_params(message, None))
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

fn schema_for<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema) {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

impl<C: RemoteClient + 'static> ServerHandler for McpServer<C> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "repo-scout".to_string(),
                title: Some("Repo Scout".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Discovery, retrieval and code search for hosted repositories. \
                 Every tool takes `owner` and `repo`; responses are cached for five minutes."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: Self::tools(),
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.to_string();
        self.call(&name, request.arguments).await
    }
}
