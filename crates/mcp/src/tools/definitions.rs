#![forbid(unsafe_code)]

use serde_json::{Value, json};

pub(crate) const READ_ME: &str = "3d_read_me";
pub(crate) const RENDER_SCENE: &str = "3d_render_scene";
pub(crate) const READ_CHECKPOINT: &str = "3d_read_checkpoint";
pub(crate) const SAVE_CHECKPOINT: &str = "3d_save_checkpoint";

fn vec3_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "number" },
        "minItems": 3,
        "maxItems": 3,
        "description": description
    })
}

pub(crate) fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": READ_ME,
            "description": "Returns the 3D scene element format reference (primitives, checkpoints, examples). Call this BEFORE using 3d_render_scene for the first time.",
            "inputSchema": { "type": "object", "properties": {} },
            "annotations": { "readOnlyHint": true }
        }),
        json!({
            "name": RENDER_SCENE,
            "title": "Render 3D Scene",
            "description": "Renders a 3D scene from primitives (cubes, spheres, cylinders). Every call stores the resolved scene as a new checkpoint and returns its id; start a batch with a restoreCheckpoint element to build on a previous scene. Call 3d_read_me first to learn the element format.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "elements": {
                        "type": "string",
                        "description": "JSON array string of 3D elements. Must be valid JSON. Keep compact."
                    },
                    "camera": {
                        "type": "object",
                        "description": "Explicit camera override for cinematic shots.",
                        "properties": {
                            "position": vec3_schema("Camera position [x, y, z]"),
                            "target": vec3_schema("Camera target [x, y, z]")
                        },
                        "required": ["position"]
                    }
                },
                "required": ["elements"]
            },
            // Writes a checkpoint on every call.
            "annotations": { "readOnlyHint": false, "destructiveHint": false, "idempotentHint": false }
        }),
        json!({
            "name": READ_CHECKPOINT,
            "description": "Private: loads a checkpoint. Unknown ids yield an empty element list.",
            "inputSchema": {
                "type": "object",
                "properties": { "id": { "type": "string" } },
                "required": ["id"]
            },
            "annotations": { "readOnlyHint": true }
        }),
        json!({
            "name": SAVE_CHECKPOINT,
            "description": "Private: saves a checkpoint from manual edits, replacing the elements stored under id.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "elements": { "type": "array", "items": {} }
                },
                "required": ["id", "elements"]
            },
            "annotations": { "readOnlyHint": false, "destructiveHint": true, "idempotentHint": true }
        }),
    ]
}
