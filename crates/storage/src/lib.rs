#![forbid(unsafe_code)]

mod scene;
mod store;

pub use scene::*;
pub use store::*;
