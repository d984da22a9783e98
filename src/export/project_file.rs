//! Portable project file (`.lenscore`): the full Project serialized as
//! pretty-printed JSON. This is the one export that must round-trip: parsing
//! an exported file and importing it reproduces an equivalent project
//! (modulo id rewriting when the id collides in the target store).

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::project::model::Project;

/// Serializes a project for export.
pub fn export_project_file(project: &Project) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Parses a project file, applying the minimal shape check (`title` is a
/// string, `shots` is an array) before the typed deserialization. Embedded
/// shots and characters are otherwise trusted verbatim.
pub fn parse_project_file(raw: &str) -> StoreResult<Project> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| StoreError::invalid_project_file(format!("not valid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::invalid_project_file("not a JSON object"))?;
    if !object.get("title").is_some_and(Value::is_string) {
        return Err(StoreError::invalid_project_file("missing string `title`"));
    }
    if !object.get("shots").is_some_and(Value::is_array) {
        return Err(StoreError::invalid_project_file("missing `shots` array"));
    }
    Ok(serde_json::from_value(value)?)
}
