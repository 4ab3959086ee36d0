//! Request dispatch: MCP methods to engine operations.

use crate::protocol::{methods, InitializeResult, McpHandler, McpRequest, McpResponse};
use crate::state::AppState;
use crate::tools;
use serde_json::{json, Value};
use tracing::{debug, info};

impl McpHandler for AppState {
    fn handle_request(&self, request: McpRequest) -> McpResponse {
        debug!(target: "zedthreads::mcp", "Handling {}", request.method);

        match request.method.as_str() {
            methods::INITIALIZE => {
                McpResponse::success(request.id, json!(InitializeResult::default()))
            }
            methods::INITIALIZED => {
                // Notification, nothing to do.
                McpResponse::success(request.id, json!({}))
            }
            methods::LIST_TOOLS => {
                McpResponse::success(request.id, json!({"tools": tools::tool_definitions()}))
            }
            methods::CALL_TOOL => {
                let name = request
                    .params
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(Value::Null);

                let result = tools::dispatch(self, name, &arguments);
                McpResponse::success(request.id, json!(result))
            }
            methods::LIST_RESOURCES => {
                McpResponse::success(request.id, json!({"resources": resource_list()}))
            }
            methods::READ_RESOURCE => {
                let uri = request
                    .params
                    .get("uri")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                match read_resource(uri) {
                    Some(contents) => McpResponse::success(request.id, contents),
                    None => McpResponse::error(
                        request.id,
                        -32602,
                        format!("Unknown resource URI: {uri}"),
                    ),
                }
            }
            methods::SHUTDOWN => {
                info!(target: "zedthreads::mcp", "Shutdown request received");
                McpResponse::success(request.id, json!({}))
            }
            other => McpResponse::error(request.id, -32601, format!("Method not found: {other}")),
        }
    }
}

fn resource_list() -> Value {
    json!([
        {
            "name": "Server Status",
            "uri": "zedchat://status",
            "description": "Current server status and statistics",
            "mimeType": "application/json"
        },
        {
            "name": "Welcome Message",
            "uri": "zedchat://welcome",
            "description": "Welcome message and server information",
            "mimeType": "text/plain"
        },
        {
            "name": "Server Configuration",
            "uri": "zedchat://config",
            "description": "Server configuration details",
            "mimeType": "application/json"
        }
    ])
}

fn read_resource(uri: &str) -> Option<Value> {
    let (text, mime_type) = match uri {
        "zedchat://status" => (
            json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
            })
            .to_string(),
            "application/json",
        ),
        "zedchat://welcome" => (
            format!(
                "Welcome to the ZedThreads MCP server!\n\n\
                 Read-only browsing and search over Zed's chat thread archive.\n\n\
                 Version: {}",
                env!("CARGO_PKG_VERSION")
            ),
            "text/plain",
        ),
        "zedchat://config" => (
            json!({
                "name": "zedthreads",
                "version": env!("CARGO_PKG_VERSION"),
                "capabilities": {
                    "tools": true,
                    "resources": true,
                    "prompts": false,
                    "sampling": false
                },
                "transport": "stdio"
            })
            .to_string(),
            "application/json",
        ),
        _ => return None,
    };

    Some(json!({
        "contents": [{"uri": uri, "mimeType": mime_type, "text": text}]
    }))
}
