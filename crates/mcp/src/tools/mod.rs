#![forbid(unsafe_code)]

mod checkpoints;
mod definitions;
mod dispatch;
mod read_me;
mod render;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
