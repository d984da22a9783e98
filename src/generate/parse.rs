//! Response parsing for the remote model.
//!
//! The model is asked for a bare JSON object, but responses still sometimes
//! arrive wrapped in prose or markdown fences. The first top-level block from
//! the first `{` to the last `}` is cut out before the typed parse; anything
//! that fails after that is a `MalformedResponse`, never a transport error.

use serde::Deserialize;

use super::GenerateError;
use crate::project::model::ShotFields;

/// Extracts the outermost JSON object from a raw completion, tolerating
/// leading/trailing commentary and code fences.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[derive(Deserialize)]
struct ShotListEnvelope {
    shots: Vec<ShotFields>,
}

/// Parses a full-storyboard completion, expected as `{"shots": [...]}`.
pub fn parse_shot_list(raw: &str) -> Result<Vec<ShotFields>, GenerateError> {
    let block = extract_json_object(raw)
        .ok_or_else(|| GenerateError::malformed("no JSON object in response"))?;
    let envelope: ShotListEnvelope = serde_json::from_str(block)
        .map_err(|e| GenerateError::malformed(format!("shot list did not parse: {}", e)))?;
    Ok(envelope.shots)
}

/// Parses a single-shot completion, expected as one bare shot object.
pub fn parse_shot_fields(raw: &str) -> Result<ShotFields, GenerateError> {
    let block = extract_json_object(raw)
        .ok_or_else(|| GenerateError::malformed("no JSON object in response"))?;
    serde_json::from_str(block)
        .map_err(|e| GenerateError::malformed(format!("shot did not parse: {}", e)))
}
