#![forbid(unsafe_code)]

use super::definitions::{READ_CHECKPOINT, READ_ME, RENDER_SCENE, SAVE_CHECKPOINT};
use super::{checkpoints, read_me, render};
use crate::McpServer;
use serde_json::Value;

pub(crate) fn dispatch_tool(server: &mut McpServer, name: &str, args: Value) -> Option<Value> {
    let resp = match name {
        READ_ME => read_me::handle(),
        RENDER_SCENE => render::handle(server, args),
        READ_CHECKPOINT => checkpoints::handle_read(server, args),
        SAVE_CHECKPOINT => checkpoints::handle_save(server, args),
        _ => return None,
    };
    Some(resp)
}
