#![forbid(unsafe_code)]

use uuid::Uuid;

pub const CHECKPOINT_ID_LEN: usize = 18;

/// Mints a fresh checkpoint id: 18 lowercase hex characters taken from a random
/// v4 UUID. Collisions are not checked against the store.
pub fn new_checkpoint_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CHECKPOINT_ID_LEN);
    id
}
