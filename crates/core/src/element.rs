#![forbid(unsafe_code)]

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Fields = Map<String, Value>;

pub const RESTORE_CHECKPOINT_TYPE: &str = "restoreCheckpoint";
pub const DELETE_TYPE: &str = "delete";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Cube,
    Sphere,
    Cylinder,
    RestoreCheckpoint,
    Delete,
    Unknown,
}

impl ElementKind {
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "cube" | "cuboid" => Self::Cube,
            "sphere" => Self::Sphere,
            "cylinder" => Self::Cylinder,
            RESTORE_CHECKPOINT_TYPE => Self::RestoreCheckpoint,
            DELETE_TYPE => Self::Delete,
            _ => Self::Unknown,
        }
    }

    pub fn is_directive(self) -> bool {
        matches!(self, Self::RestoreCheckpoint | Self::Delete)
    }
}

/// One entry of a scene batch.
///
/// Every variant keeps the full set of fields it was decoded from, so an element
/// written back to a checkpoint carries the exact attributes the caller sent,
/// including the ones nothing here interprets (`color`, `segments`, ...).
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Cube(Fields),
    Sphere(Fields),
    Cylinder(Fields),
    RestoreCheckpoint(Fields),
    Delete(Fields),
    /// Unrecognized `type`, a missing `type`, or not an object at all.
    Unknown(Value),
}

impl Element {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::Unknown(value);
        };
        let kind = fields
            .get("type")
            .and_then(|v| v.as_str())
            .map(ElementKind::from_type_tag)
            .unwrap_or(ElementKind::Unknown);
        match kind {
            ElementKind::Cube => Self::Cube(fields),
            ElementKind::Sphere => Self::Sphere(fields),
            ElementKind::Cylinder => Self::Cylinder(fields),
            ElementKind::RestoreCheckpoint => Self::RestoreCheckpoint(fields),
            ElementKind::Delete => Self::Delete(fields),
            ElementKind::Unknown => Self::Unknown(Value::Object(fields)),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Cube(_) => ElementKind::Cube,
            Self::Sphere(_) => ElementKind::Sphere,
            Self::Cylinder(_) => ElementKind::Cylinder,
            Self::RestoreCheckpoint(_) => ElementKind::RestoreCheckpoint,
            Self::Delete(_) => ElementKind::Delete,
            Self::Unknown(_) => ElementKind::Unknown,
        }
    }

    pub fn is_directive(&self) -> bool {
        self.kind().is_directive()
    }

    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Self::Cube(fields)
            | Self::Sphere(fields)
            | Self::Cylinder(fields)
            | Self::RestoreCheckpoint(fields)
            | Self::Delete(fields) => Some(fields),
            Self::Unknown(value) => value.as_object(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().and_then(|fields| fields.get(key))
    }

    /// The caller-supplied `id`, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(|v| v.as_str())
    }

    /// Explicit non-empty id, or the positional `el-<index>` id the element is
    /// addressed by within the list it sits in.
    pub fn effective_id(&self, index: usize) -> String {
        match self.id().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => synthetic_id(index),
        }
    }
}

pub fn synthetic_id(index: usize) -> String {
    format!("el-{index}")
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Cube(fields)
            | Self::Sphere(fields)
            | Self::Cylinder(fields)
            | Self::RestoreCheckpoint(fields)
            | Self::Delete(fields) => fields.serialize(serializer),
            Self::Unknown(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointData {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl CheckpointData {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraOverride {
    pub position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<[f64; 3]>,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Invalid JSON in elements: {0}. Ensure proper quoting and no trailing commas.")]
    Json(#[from] serde_json::Error),
    #[error("Invalid elements: expected a JSON array, got {0}.")]
    NotArray(&'static str),
}

/// Decodes the `elements` argument of a render call.
pub fn parse_batch(raw: &str) -> Result<Vec<Element>, BatchError> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(Element::from_value).collect()),
        other => Err(BatchError::NotArray(json_type_name(&other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
