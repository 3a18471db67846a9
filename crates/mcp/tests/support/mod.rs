#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

const KV_ENV: &[&str] = &[
    "UPSTASH_REDIS_REST_URL",
    "UPSTASH_REDIS_REST_TOKEN",
    "KV_REST_API_URL",
    "KV_REST_API_TOKEN",
    "SCENE_MCP_STORAGE_DIR",
    "SCENE_MCP_CHECKPOINT_TTL_SECS",
];

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    cleanup_storage: bool,
    next_id: u64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        let storage_dir = temp_dir(test_name);
        Self::start_with_storage_dir(storage_dir, true)
    }

    /// Starts against `storage_dir` and leaves it in place on drop, so a second
    /// process can reopen the same checkpoints.
    pub(crate) fn start_with_storage_dir(storage_dir: PathBuf, cleanup_storage: bool) -> Self {
        std::fs::create_dir_all(&storage_dir).expect("create storage dir");
        let mut command = Command::new(env!("CARGO_BIN_EXE_scene_mcp"));
        command.arg("--storage-dir").arg(&storage_dir);
        for key in KV_ENV {
            command.env_remove(key);
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn scene_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin,
            stdout,
            storage_dir,
            cleanup_storage,
            next_id: 100,
        }
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        let mut server = Self::start(test_name);
        server.initialize_default();
        server
    }

    pub(crate) fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone()
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write raw line");
        self.stdin.flush().expect("flush raw line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    /// Returns the `result` of a `tools/call` (the tool payload, error or not).
    pub(crate) fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.next_id += 1;
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }));
        assert!(resp.get("error").is_none(), "unexpected rpc error: {resp}");
        resp.get("result").cloned().expect("result")
    }

    /// Renders `elements` and returns the structured scene payload.
    pub(crate) fn render(&mut self, elements: Value) -> Value {
        let result = self.call_tool(
            "3d_render_scene",
            json!({ "elements": elements.to_string() }),
        );
        assert_eq!(result["isError"], false, "render failed: {result}");
        result
            .get("structuredContent")
            .cloned()
            .expect("structuredContent")
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if self.cleanup_storage {
            let _ = std::fs::remove_dir_all(&self.storage_dir);
        }
    }
}

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("scene_mcp_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn extract_tool_text(result: &Value) -> Value {
    let text = result
        .get("content")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("content[0].text");
    if let Ok(parsed) = serde_json::from_str(text) {
        return parsed;
    }
    Value::String(text.to_string())
}

pub(crate) fn tool_error_code(result: &Value) -> &str {
    assert_eq!(result["isError"], true, "expected tool error: {result}");
    result
        .get("structuredContent")
        .and_then(|v| v.get("error"))
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_str())
        .expect("structuredContent.error.code")
}

pub(crate) fn element_ids(scene: &Value) -> Vec<String> {
    scene["elements"]
        .as_array()
        .expect("elements array")
        .iter()
        .map(|el| el.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string())
        .collect()
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_i64())
        .expect("error.code");
    assert_eq!(code, expected_code);
}
