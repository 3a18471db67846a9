#![forbid(unsafe_code)]

use crate::element::{CameraOverride, Element};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedScene {
    pub checkpoint_id: String,
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraOverride>,
}

/// Id named by the first `restoreCheckpoint` element of the batch.
///
/// Only the first directive counts. A missing, empty or otherwise falsy id means
/// no restore at all, even if a later directive has one. Non-string ids are
/// used in their JSON text form, so `123456` names checkpoint `"123456"`.
pub fn restore_target(batch: &[Element]) -> Option<String> {
    let directive = batch
        .iter()
        .find(|el| matches!(el, Element::RestoreCheckpoint(_)))?;
    match directive.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        value if is_falsy(value) => None,
        other => Some(other.to_string()),
    }
}

/// Union of all ids named by `delete` directives (`ids`, falling back to `id`),
/// comma separated and trimmed.
pub fn delete_ids(batch: &[Element]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for el in batch {
        if !matches!(el, Element::Delete(_)) {
            continue;
        }
        let raw = el
            .get("ids")
            .filter(|v| !is_falsy(v))
            .or_else(|| el.get("id"));
        let Some(raw) = raw else {
            continue;
        };
        for id in id_list_text(raw).split(',') {
            let id = id.trim();
            if !id.is_empty() {
                out.insert(id.to_string());
            }
        }
    }
    out
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn id_list_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(id_list_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Batch elements with both directive kinds removed, order preserved.
pub fn strip_directives(batch: Vec<Element>) -> Vec<Element> {
    batch.into_iter().filter(|el| !el.is_directive()).collect()
}

/// Base elements minus the removed ids, then the non-directive batch elements.
///
/// Base elements without an explicit id are matched by their `el-<index>`
/// position in the base. Ids are not deduplicated between base and batch.
pub fn merge_onto_base(base: Vec<Element>, batch: Vec<Element>) -> Vec<Element> {
    let removed = delete_ids(&batch);
    let mut out = Vec::with_capacity(base.len() + batch.len());
    for (index, el) in base.into_iter().enumerate() {
        if removed.is_empty() || !removed.contains(&el.effective_id(index)) {
            out.push(el);
        }
    }
    out.extend(strip_directives(batch));
    out
}
