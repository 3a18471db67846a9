#![forbid(unsafe_code)]

pub mod element;
pub mod ids;
pub mod scene;

pub use element::{
    BatchError, CameraOverride, CheckpointData, Element, ElementKind, Fields, parse_batch,
};
pub use ids::new_checkpoint_id;
pub use scene::{ResolvedScene, delete_ids, merge_onto_base, restore_target, strip_directives};
