#![forbid(unsafe_code)]

use super::{Backend, CheckpointStore, StoreError, validate_checkpoint_key};
use scene_core::CheckpointData;
use std::collections::HashMap;
use std::sync::Mutex;

/// Process-local store. Entries never expire and are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CheckpointData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CheckpointStore for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    fn save(&self, id: &str, data: &CheckpointData) -> Result<(), StoreError> {
        validate_checkpoint_key(id)?;
        let mut entries = self.entries.lock()?;
        entries.insert(id.to_string(), data.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CheckpointData>, StoreError> {
        let entries = self.entries.lock()?;
        Ok(entries.get(id).cloned())
    }
}
