#![forbid(unsafe_code)]

mod entry;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

use scene_storage::CheckpointStore;
use std::io::BufReader;
use std::sync::Arc;

// Kept at the widely deployed baseline; some clients are strict about the echoed version.
const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "scene-render-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) struct McpServer {
    initialized: bool,
    store: Arc<dyn CheckpointStore>,
}

fn usage() -> &'static str {
    "scene_mcp: 3D scene render MCP server with checkpoint storage (stdio)\n\n\
USAGE:\n\
  scene_mcp [--kv-url URL] [--storage-dir DIR] [--checkpoint-ttl-secs N]\n\
            [--kv-timeout-secs N]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
STORE SELECTION (first configured wins):\n\
  1. remote KV   --kv-url / UPSTASH_REDIS_REST_URL + UPSTASH_REDIS_REST_TOKEN\n\
                 (KV_REST_API_URL / KV_REST_API_TOKEN are accepted too)\n\
  2. sqlite      --storage-dir / SCENE_MCP_STORAGE_DIR\n\
  3. memory      always available; checkpoints are lost on exit\n\
\n\
ENV:\n\
  SCENE_MCP_CHECKPOINT_TTL_SECS   checkpoint lifetime (default 604800 = 7 days)\n\
  SCENE_MCP_KV_TIMEOUT_SECS       remote request timeout (default 10)\n\
  RUST_LOG                        log filter; logs are written to stderr\n"
}

fn version_line() -> String {
    format!("scene_mcp {SERVER_VERSION}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = process_args();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    init_tracing();

    let config = parse_store_config(&RuntimeInputs {
        args: &args,
        env: &process_env,
    })?;
    let store = scene_storage::open_store(&config)?;
    tracing::info!(
        server = SERVER_NAME,
        version = SERVER_VERSION,
        backend = store.backend().as_str(),
        "serving on stdio"
    );

    let mut server = McpServer::new(store);
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    let result = entry::run_stdio(&mut server, &mut reader, &mut stdout);
    if let Err(err) = &result {
        tracing::error!(error = %err, "transport failed");
    }
    result
}
