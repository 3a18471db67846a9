#![forbid(unsafe_code)]

use crate::{
    CHECKPOINT_NOT_FOUND, INVALID_INPUT, McpServer, STORAGE_FAILURE, tool_error, tool_json,
};
use scene_core::CameraOverride;
use scene_storage::{ResolveError, render_scene};
use serde_json::Value;

pub(crate) fn handle(server: &McpServer, args: Value) -> Value {
    let Some(elements) = args.get("elements").and_then(|v| v.as_str()) else {
        return tool_error(
            INVALID_INPUT,
            "elements must be a JSON array encoded as a string. Call 3d_read_me for the format.",
        );
    };
    let camera = match parse_camera(args.get("camera")) {
        Ok(camera) => camera,
        Err(message) => return tool_error(INVALID_INPUT, &message),
    };

    match render_scene(server.store(), elements, camera) {
        Ok(scene) => match serde_json::to_value(&scene) {
            Ok(payload) => tool_json(payload),
            Err(err) => tool_error(STORAGE_FAILURE, &format!("Failed to encode scene: {err}")),
        },
        Err(err) => {
            let code = match &err {
                ResolveError::Validation(_) => INVALID_INPUT,
                ResolveError::CheckpointNotFound { .. } => CHECKPOINT_NOT_FOUND,
                ResolveError::Storage(_) => STORAGE_FAILURE,
            };
            if matches!(err, ResolveError::Storage(_)) {
                tracing::error!(error = %err, "render failed");
            }
            tool_error(code, &err.to_string())
        }
    }
}

fn parse_camera(raw: Option<&Value>) -> Result<Option<CameraOverride>, String> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value::<CameraOverride>(value.clone())
            .map(Some)
            .map_err(|e| {
                format!(
                    "Invalid camera: {e}. Expected {{\"position\": [x, y, z], \"target\"?: [x, y, z]}}."
                )
            }),
    }
}
