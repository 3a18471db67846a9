#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer, UNKNOWN_TOOL, is_tool_error, tool_error};
use scene_storage::CheckpointStore;
use serde_json::{Value, json};
use std::sync::Arc;

impl McpServer {
    pub(crate) fn new(store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            initialized: false,
            store,
        }
    }

    pub(crate) fn store(&self) -> &dyn CheckpointStore {
        self.store.as_ref()
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        if request.is_notification() {
            self.handle_notification(&request.method);
            return None;
        }

        let method = request.method.as_str();

        if method == "initialize" {
            // Clients that never send `notifications/initialized` still get a
            // working session.
            self.initialized = true;
            return Some(crate::json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": { "name": crate::SERVER_NAME, "version": crate::SERVER_VERSION },
                    "capabilities": { "tools": {}, "resources": {} }
                }),
            ));
        }

        if method == "ping" {
            return Some(crate::json_rpc_response(request.id, json!({})));
        }

        if !self.initialized {
            return Some(crate::json_rpc_error(
                request.id,
                -32002,
                "Server not initialized",
            ));
        }

        // The rendering widget is served by the host, so no resources are exposed.
        if method == "resources/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "resources": [] }),
            ));
        }
        if method == "resources/read" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "contents": [] }),
            ));
        }

        if method == "tools/list" {
            return Some(crate::json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };
            let Some(tool_name) = params_obj.get("name").and_then(|v| v.as_str()) else {
                return Some(crate::json_rpc_error(
                    request.id,
                    -32602,
                    "params.name must be a string",
                ));
            };
            let args = params_obj
                .get("arguments")
                .cloned()
                .filter(|v| !v.is_null())
                .unwrap_or_else(|| json!({}));
            let result = self.call_tool(tool_name, args);
            return Some(crate::json_rpc_response(request.id, result));
        }

        Some(crate::json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" => self.initialized = true,
            _ => tracing::debug!(method, "ignoring notification"),
        }
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        tracing::debug!(tool = name, "tool call");
        let Some(result) = crate::tools::dispatch_tool(self, name, args) else {
            return tool_error(UNKNOWN_TOOL, &format!("Unknown tool: {name}"));
        };
        if is_tool_error(&result) {
            tracing::debug!(tool = name, "tool returned an error result");
        }
        result
    }
}

#[cfg(test)]
mod tests;
