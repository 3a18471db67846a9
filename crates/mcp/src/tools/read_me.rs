#![forbid(unsafe_code)]

use crate::tool_text;
use serde_json::Value;

const ELEMENT_FORMAT_REFERENCE: &str = r##"# 3D Scene Element Format

A scene is a JSON array of elements. Each element is an object with a "type"
and an optional "id". Give elements stable ids if you plan to delete them later;
elements without one are addressed as "el-<index>" (their position in the scene).

Units are meters. The Y axis points up. Rotations are radians [x, y, z].
Colors are hex ("#RRGGBB") or CSS names.

## Primitives

cube (alias: cuboid)
  size: [width, height, depth]   default [1, 1, 1]
  position: [x, y, z]            default [0, 0, 0]
  rotation: [x, y, z]            default [0, 0, 0]
  color: string                  default "gray"

sphere
  radius: number                 default 1
  segments: number               default 32
  position, color

cylinder
  radius: number                 top and bottom
  height: number
  segments: number
  position, rotation, color

Fields not listed here are kept as-is and stored with the checkpoint.

## Checkpoints

Every 3d_render_scene call stores the resolved scene and returns a
"checkpointId". To change a scene instead of redrawing it:

restoreCheckpoint
  id: string        checkpoint to start from (only the first one counts)

delete
  ids: string       comma-separated element ids to drop from the restored scene

The result is the restored elements (minus deleted ones) followed by the new
elements of the batch. Ids are not merged: re-sending an existing id adds a
second element, so delete the old one first when replacing it.
Checkpoints expire after a retention period (7 days by default).

## Example

[
  {"type": "restoreCheckpoint", "id": "3f2a9c01b7de4e5a8c"},
  {"type": "delete", "ids": "roof"},
  {"type": "cube", "id": "roof", "size": [4, 0.2, 4], "position": [0, 3, 0], "color": "#8b4513"},
  {"type": "sphere", "id": "sun", "radius": 0.5, "position": [5, 6, -3], "color": "yellow"}
]

Camera (optional argument of 3d_render_scene):
  {"position": [6, 4, 6], "target": [0, 1, 0]}
"##;

pub(crate) fn handle() -> Value {
    tool_text(ELEMENT_FORMAT_REFERENCE)
}
