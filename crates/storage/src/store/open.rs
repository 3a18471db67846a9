#![forbid(unsafe_code)]

use super::{
    Backend, CheckpointStore, DEFAULT_CHECKPOINT_TTL, MemoryStore, RemoteStore, SqliteStore,
    StoreError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

impl RemoteConfig {
    /// Both credentials present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;
        Some((url, token))
    }

    fn is_partial(&self) -> bool {
        self.credentials().is_none()
            && (self.url.as_deref().is_some_and(|v| !v.trim().is_empty())
                || self.token.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub remote: RemoteConfig,
    pub storage_dir: Option<PathBuf>,
    pub checkpoint_ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            storage_dir: None,
            checkpoint_ttl: DEFAULT_CHECKPOINT_TTL,
        }
    }
}

type Opener = fn(&StoreConfig) -> Result<Option<Arc<dyn CheckpointStore>>, StoreError>;

/// Backends in preference order. An opener returns `Ok(None)` when it is not
/// configured; an error from a configured backend aborts selection.
const BACKEND_CHAIN: &[(Backend, Opener)] = &[
    (Backend::Remote, open_remote),
    (Backend::Sqlite, open_sqlite),
    (Backend::Memory, open_memory),
];

pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn CheckpointStore>, StoreError> {
    if config.checkpoint_ttl.is_zero() {
        return Err(StoreError::InvalidInput("checkpoint ttl must be positive"));
    }
    if config.remote.is_partial() {
        tracing::warn!("remote store needs both an endpoint url and an access token; ignoring it");
    }

    for (backend, open) in BACKEND_CHAIN {
        let Some(store) = open(config)? else {
            tracing::debug!(backend = backend.as_str(), "backend not configured");
            continue;
        };
        if backend.is_durable() {
            tracing::info!(backend = backend.as_str(), "checkpoint store ready");
        } else {
            tracing::warn!(
                backend = backend.as_str(),
                "no durable checkpoint store configured; checkpoints will not survive a restart"
            );
        }
        return Ok(store);
    }

    Err(StoreError::InvalidInput("no checkpoint store backend available"))
}

fn open_remote(config: &StoreConfig) -> Result<Option<Arc<dyn CheckpointStore>>, StoreError> {
    let Some((url, token)) = config.remote.credentials() else {
        return Ok(None);
    };
    let timeout = config.remote.timeout.unwrap_or(DEFAULT_REMOTE_TIMEOUT);
    let store = RemoteStore::connect(url, token, timeout, config.checkpoint_ttl)?;
    Ok(Some(Arc::new(store)))
}

fn open_sqlite(config: &StoreConfig) -> Result<Option<Arc<dyn CheckpointStore>>, StoreError> {
    let Some(dir) = config.storage_dir.as_ref() else {
        return Ok(None);
    };
    let store = SqliteStore::open(dir, Some(config.checkpoint_ttl))?;
    Ok(Some(Arc::new(store)))
}

fn open_memory(_: &StoreConfig) -> Result<Option<Arc<dyn CheckpointStore>>, StoreError> {
    Ok(Some(Arc::new(MemoryStore::new())))
}
