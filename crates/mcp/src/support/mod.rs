#![forbid(unsafe_code)]

mod jsonrpc;
mod logging;
mod results;
mod runtime;

pub(crate) use jsonrpc::*;
pub(crate) use logging::*;
pub(crate) use results::*;
pub(crate) use runtime::*;
