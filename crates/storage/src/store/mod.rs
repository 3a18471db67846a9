#![forbid(unsafe_code)]

mod error;
mod memory;
mod open;
mod remote;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use open::*;
pub use remote::{KvTransport, RemoteStore, RestKvTransport};
pub use sqlite::SqliteStore;

use scene_core::CheckpointData;
use std::time::Duration;

/// Lifetime given to checkpoints by backends that expire entries.
pub const DEFAULT_CHECKPOINT_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Sqlite,
    Memory,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    /// Whether checkpoints survive a restart of this process.
    pub fn is_durable(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Keyed checkpoint persistence shared by every tool call of a server process.
///
/// `load` reports a missing or expired id as `Ok(None)`; only backend I/O
/// failures are errors, and they are never retried here.
pub trait CheckpointStore: Send + Sync {
    fn backend(&self) -> Backend;

    fn save(&self, id: &str, data: &CheckpointData) -> Result<(), StoreError>;

    fn load(&self, id: &str) -> Result<Option<CheckpointData>, StoreError>;
}

pub(crate) fn now_ms_i64() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

pub(crate) fn validate_checkpoint_key(id: &str) -> Result<(), StoreError> {
    if id.trim().is_empty() {
        return Err(StoreError::InvalidInput("checkpoint id must not be empty"));
    }
    if id.len() > 256 {
        return Err(StoreError::InvalidInput("checkpoint id is too long"));
    }
    if id.chars().any(|c| c.is_control()) {
        return Err(StoreError::InvalidInput(
            "checkpoint id contains control characters",
        ));
    }
    Ok(())
}
