//! MCP Server implementation
//!
//! JSON-RPC dispatch shared by both transports, plus the stdio transport loop.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::error::{McpError, Result};
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
pub const SERVER_NAME: &str = "ai-bank-tool";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for the mock bank tools
#[derive(Debug, Default)]
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Whether the client sent `notifications/initialized`
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tool_handler: ToolHandler) -> Self {
        Self {
            tool_handler,
            initialized: false,
        }
    }

    /// Whether the initialization handshake has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio
    pub async fn run_stdio(&mut self) -> Result<()> {
        info!("MCP (stdio) server ready");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC until the reader reaches EOF
    pub async fn serve_lines<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_message(&line).await {
                Ok(Some(response)) => {
                    let mut response_str = serde_json::to_string(&response)?;
                    response_str.push('\n');
                    writer.write_all(response_str.as_bytes()).await?;
                    writer.flush().await?;
                }
                Ok(None) => {
                    // Notification, no response needed
                }
                Err(e) => {
                    error!("Error handling message: {}", e);
                }
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle a raw JSON-RPC message or batch
    pub async fn handle_message(&mut self, message: &str) -> Result<Option<Value>> {
        let payload: Value = match serde_json::from_str(message) {
            Ok(v) => v,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(None, JsonRpcError::parse_error(e.to_string()));
                return Ok(Some(serde_json::to_value(response)?));
            }
        };

        self.handle_payload(payload).await
    }

    /// Handle an already-parsed message or batch. Returns `None` when nothing needs
    /// to be sent back (notifications only).
    pub async fn handle_payload(&mut self, payload: Value) -> Result<Option<Value>> {
        match payload {
            Value::Array(items) => {
                if items.is_empty() {
                    let response =
                        JsonRpcResponse::error(None, JsonRpcError::invalid_request("Empty batch"));
                    return Ok(Some(serde_json::to_value(response)?));
                }

                let mut responses = Vec::new();
                for item in items {
                    if let Some(response) = self.handle_value(item).await? {
                        responses.push(response);
                    }
                }

                if responses.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(serde_json::to_value(responses)?))
                }
            }
            single => match self.handle_value(single).await? {
                Some(response) => Ok(Some(serde_json::to_value(response)?)),
                None => Ok(None),
            },
        }
    }

    /// Handle a single JSON-RPC message
    async fn handle_value(&mut self, value: Value) -> Result<Option<JsonRpcResponse>> {
        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(req) => req,
            Err(e) => {
                let id = value
                    .get("id")
                    .cloned()
                    .and_then(|id| serde_json::from_value(id).ok());
                return Ok(Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(e.to_string()),
                )));
            }
        };

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                self.initialized = true;
            }
            debug!(method = %request.method, "notification received");
            return Ok(None);
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            methods::INITIALIZE => JsonRpcResponse::success(id, self.handle_initialize(&request)?),
            methods::PING => JsonRpcResponse::success(id, json!({})),
            methods::LIST_TOOLS => JsonRpcResponse::success(id, self.handle_list_tools()?),
            methods::CALL_TOOL => match self.handle_call_tool(&request).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::error(id, rpc_error(&e)),
            },
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
        };

        Ok(Some(response))
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: &JsonRpcRequest) -> Result<Value> {
        let params: InitializeParams = request
            .params
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "client connected");
        }

        let result = InitializeResult {
            protocol_version: negotiate_protocol_version(params.protocol_version.as_deref())
                .to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request
    async fn handle_call_tool(
        &self,
        request: &JsonRpcRequest,
    ) -> std::result::Result<Value, McpError> {
        let params: CallToolParams = match request.params.as_ref() {
            Some(p) => {
                serde_json::from_value(p.clone()).map_err(|e| McpError::InvalidArguments {
                    tool: methods::CALL_TOOL.to_string(),
                    message: format!("Invalid tool parameters: {}", e),
                })?
            }
            None => {
                return Err(McpError::InvalidArguments {
                    tool: methods::CALL_TOOL.to_string(),
                    message: "Missing tool parameters".to_string(),
                })
            }
        };

        let result = self
            .tool_handler
            .call_tool(&params.name, params.arguments)
            .await?;

        serde_json::to_value(result).map_err(|e| McpError::ProtocolError {
            message: e.to_string(),
        })
    }
}

/// Map a protocol error onto its JSON-RPC error code
fn rpc_error(err: &McpError) -> JsonRpcError {
    match err {
        McpError::UnknownTool { .. } | McpError::InvalidArguments { .. } => {
            JsonRpcError::invalid_params(err.to_string())
        }
        McpError::ProtocolError { .. } | McpError::SessionNotFound { .. } => {
            JsonRpcError::internal_error(err.to_string())
        }
    }
}
