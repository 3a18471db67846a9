#![forbid(unsafe_code)]

use crate::{INVALID_INPUT, McpServer, STORAGE_FAILURE, tool_error, tool_json_text, tool_text};
use scene_core::Element;
use scene_storage::{read_checkpoint, save_checkpoint};
use serde_json::Value;

fn required_id(args: &Value) -> Result<&str, Value> {
    args.get("id")
        .and_then(|v| v.as_str())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| tool_error(INVALID_INPUT, "id must be a non-empty string"))
}

pub(crate) fn handle_read(server: &McpServer, args: Value) -> Value {
    let id = match required_id(&args) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match read_checkpoint(server.store(), id) {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(payload) => tool_json_text(&payload),
            Err(err) => tool_error(STORAGE_FAILURE, &format!("Failed to encode checkpoint: {err}")),
        },
        Err(err) => {
            tracing::error!(checkpoint = %id, error = %err, "checkpoint read failed");
            tool_error(STORAGE_FAILURE, &format!("Checkpoint storage failed: {err}"))
        }
    }
}

pub(crate) fn handle_save(server: &McpServer, args: Value) -> Value {
    let id = match required_id(&args) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(items) = args.get("elements").and_then(|v| v.as_array()) else {
        return tool_error(INVALID_INPUT, "elements must be an array");
    };
    let elements = items
        .iter()
        .cloned()
        .map(Element::from_value)
        .collect::<Vec<_>>();

    match save_checkpoint(server.store(), id, elements) {
        Ok(()) => tool_text("Saved"),
        Err(err) => {
            tracing::error!(checkpoint = %id, error = %err, "manual checkpoint save failed");
            tool_error(STORAGE_FAILURE, &format!("Checkpoint storage failed: {err}"))
        }
    }
}
