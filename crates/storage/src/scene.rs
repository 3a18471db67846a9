#![forbid(unsafe_code)]

use crate::{CheckpointStore, StoreError};
use scene_core::{
    BatchError, CameraOverride, CheckpointData, Element, ResolvedScene, merge_onto_base,
    new_checkpoint_id, parse_batch, restore_target, strip_directives,
};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Validation(#[from] BatchError),
    #[error("Checkpoint \"{id}\" not found. It may have expired or never existed.")]
    CheckpointNotFound { id: String },
    #[error("Checkpoint storage failed: {0}")]
    Storage(#[from] StoreError),
}

/// Decodes a JSON element batch and resolves it. Malformed input fails before
/// the store is touched.
pub fn render_scene(
    store: &dyn CheckpointStore,
    elements_json: &str,
    camera: Option<CameraOverride>,
) -> Result<ResolvedScene, ResolveError> {
    let batch = parse_batch(elements_json)?;
    resolve(store, batch, camera)
}

/// Applies the batch's restore and delete directives, then writes the result
/// under a freshly minted checkpoint id. Nothing is written unless the merge
/// succeeds, and the restored base is only read.
pub fn resolve(
    store: &dyn CheckpointStore,
    batch: Vec<Element>,
    camera: Option<CameraOverride>,
) -> Result<ResolvedScene, ResolveError> {
    let restore = restore_target(&batch);
    let elements = match restore {
        Some(base_id) => {
            tracing::info!(checkpoint = %base_id, "restoring checkpoint");
            let Some(base) = store.load(&base_id)? else {
                tracing::warn!(checkpoint = %base_id, "checkpoint not found");
                return Err(ResolveError::CheckpointNotFound { id: base_id });
            };
            merge_onto_base(base.elements, batch)
        }
        None => strip_directives(batch),
    };

    let checkpoint_id = new_checkpoint_id();
    let data = CheckpointData::new(elements);
    tracing::info!(
        checkpoint = %checkpoint_id,
        elements = data.elements.len(),
        "saving new checkpoint"
    );
    store.save(&checkpoint_id, &data)?;

    Ok(ResolvedScene {
        checkpoint_id,
        elements: data.elements,
        camera,
    })
}

/// Checkpoint contents, or an empty element list when the id is unknown.
pub fn read_checkpoint(
    store: &dyn CheckpointStore,
    id: &str,
) -> Result<CheckpointData, StoreError> {
    tracing::debug!(checkpoint = %id, "reading checkpoint");
    Ok(store.load(id)?.unwrap_or_default())
}

/// Writes `elements` under a caller-chosen id, replacing whatever was there.
pub fn save_checkpoint(
    store: &dyn CheckpointStore,
    id: &str,
    elements: Vec<Element>,
) -> Result<(), StoreError> {
    tracing::info!(checkpoint = %id, elements = elements.len(), "saving checkpoint manually");
    store.save(id, &CheckpointData::new(elements))
}
