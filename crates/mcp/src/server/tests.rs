#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer};
use scene_storage::{CheckpointStore, MemoryStore};
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;

fn server() -> (McpServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (McpServer::new(store.clone()), store)
}

fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

fn initialized() -> (McpServer, Arc<MemoryStore>) {
    let (mut server, store) = server();
    let resp = server.handle(request(json!({
        "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}
    })));
    assert!(resp.is_some());
    (server, store)
}

fn call(server: &mut McpServer, name: &str, arguments: Value) -> Value {
    let resp = server
        .handle(request(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })))
        .unwrap();
    resp["result"].clone()
}

#[test]
fn tools_list_is_rejected_before_initialize() {
    let (mut server, _) = server();
    let resp = server
        .handle(request(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" })))
        .unwrap();
    assert_eq!(resp["error"]["code"], -32002);
}

#[test]
fn initialized_notification_unlocks_session_without_response() {
    let (mut server, _) = server();
    let resp = server.handle(request(json!({
        "jsonrpc": "2.0", "method": "notifications/initialized"
    })));
    assert!(resp.is_none());
    let resp = server
        .handle(request(json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" })))
        .unwrap();
    assert_eq!(resp["result"]["tools"].as_array().unwrap().len(), 4);
}

#[test]
fn unknown_tool_is_a_tool_error_not_a_protocol_error() {
    let (mut server, _) = initialized();
    let result = call(&mut server, "3d_explode", json!({}));
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["error"]["code"], "UNKNOWN_TOOL");
}

#[test]
fn tools_call_requires_a_tool_name() {
    let (mut server, _) = initialized();
    let resp = server
        .handle(request(json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": { "arguments": {} }
        })))
        .unwrap();
    assert_eq!(resp["error"]["code"], -32602);
}

#[test]
fn render_stores_the_resolved_scene_in_the_injected_store() {
    let (mut server, store) = initialized();
    let result = call(
        &mut server,
        "3d_render_scene",
        json!({ "elements": r#"[{"type":"cube","id":"a"}]"# }),
    );
    assert_eq!(result["isError"], false);
    let id = result["structuredContent"]["checkpointId"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(id.len(), 18);
    assert_eq!(store.len(), 1);

    let saved = store.load(&id).unwrap().unwrap();
    assert_eq!(saved.elements.len(), 1);
    assert_eq!(saved.elements[0].id(), Some("a"));
}

#[test]
fn render_rejects_missing_elements_argument() {
    let (mut server, store) = initialized();
    let result = call(&mut server, "3d_render_scene", json!({}));
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["error"]["code"], "INVALID_INPUT");
    assert!(store.is_empty());
}

#[test]
fn read_me_returns_format_reference() {
    let (mut server, _) = initialized();
    let result = call(&mut server, "3d_read_me", Value::Null);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("restoreCheckpoint"));
    assert!(text.contains("delete"));
}

#[test]
fn stdio_loop_answers_newline_requests_and_skips_notifications() {
    let (mut server, _) = server();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        "\n",
    );
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    crate::entry::run_stdio(&mut server, &mut reader, &mut out).unwrap();

    let lines = String::from_utf8(out).unwrap();
    let responses = lines
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], crate::MCP_VERSION);
    assert_eq!(responses[1]["id"], 2);
}

#[test]
fn stdio_loop_reports_parse_errors_and_keeps_serving() {
    let (mut server, _) = server();
    let input = concat!(
        "{not json\n",
        r#"{"jsonrpc":"2.0","id":9,"method":"ping"}"#,
        "\n"
    );
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    crate::entry::run_stdio(&mut server, &mut reader, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let responses = text
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["id"], 9);
}
