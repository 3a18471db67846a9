#![forbid(unsafe_code)]

use serde_json::{Value, json};

pub(crate) const INVALID_INPUT: &str = "INVALID_INPUT";
pub(crate) const CHECKPOINT_NOT_FOUND: &str = "CHECKPOINT_NOT_FOUND";
pub(crate) const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
pub(crate) const UNKNOWN_TOOL: &str = "UNKNOWN_TOOL";

/// `tools/call` result carrying a plain text block.
pub(crate) fn tool_text(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    })
}

/// `tools/call` result carrying `payload` both as JSON text (what most hosts
/// read) and as `structuredContent`.
pub(crate) fn tool_json(payload: Value) -> Value {
    let text = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": payload,
        "isError": false
    })
}

/// Same as [`tool_json`] without the structured copy.
pub(crate) fn tool_json_text(payload: &Value) -> Value {
    let text = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    tool_text(&text)
}

pub(crate) fn tool_error(code: &str, message: &str) -> Value {
    let message = message.trim();
    json!({
        "content": [{ "type": "text", "text": message }],
        "structuredContent": { "error": { "code": code, "message": message } },
        "isError": true
    })
}

pub(crate) fn is_tool_error(result: &Value) -> bool {
    result
        .get("isError")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}
