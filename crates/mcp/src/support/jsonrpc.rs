#![forbid(unsafe_code)]

use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    #[serde(default)]
    #[serde(rename = "jsonrpc")]
    pub(crate) _jsonrpc: Option<String>,
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id (or with a null id) expect no response.
    pub(crate) fn is_notification(&self) -> bool {
        matches!(self.id, None | Some(Value::Null))
    }
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

/// Decodes one framed message. Failures come back as ready-to-send error
/// responses (-32700 for bad JSON, -32600 for a non-request).
pub(crate) fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| json_rpc_error(None, -32700, &format!("Parse error: {e}")))?;

    let Some(obj) = data.as_object() else {
        return Err(json_rpc_error(None, -32600, "Invalid Request"));
    };
    let id = obj.get("id").cloned();
    if !obj.contains_key("method") {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value::<JsonRpcRequest>(data)
        .map_err(|e| json_rpc_error(id, -32600, &format!("Invalid Request: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_maps_errors_to_json_rpc_codes() {
        let err = parse_request(b"{nope").expect_err("parse error");
        assert_eq!(err["error"]["code"], -32700);
        let err = parse_request(b"[1,2]").expect_err("not an object");
        assert_eq!(err["error"]["code"], -32600);
        let err = parse_request(b"{\"id\":3}").expect_err("no method");
        assert_eq!(err["id"], 3);
        assert!(parse_request(b"{\"id\":1,\"method\":\"ping\"}").is_ok());
    }
}
