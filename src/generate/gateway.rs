//! Store-level generation operations.
//!
//! Both operations follow the same shape: validate against the store, raise
//! the matching busy flag, call the model, merge on success, and clear the
//! flag on every exit path. A failed call leaves the stored shots exactly as
//! they were.

use tracing::{info, warn};

use super::client::ShotModel;
use super::GenerateError;
use crate::project::model::{new_entity_id, Shot};
use crate::project::store::ProjectStore;

fn reject_if_busy(store: &ProjectStore) -> Result<(), GenerateError> {
    if store.is_generating() || store.regenerating_shot_id().is_some() {
        return Err(GenerateError::Busy);
    }
    Ok(())
}

/// Generates a full storyboard from the active project's script and replaces
/// its shot list. Shots get fresh ids and dense numbering regardless of what
/// the model returned.
pub async fn generate_storyboard(
    store: &mut ProjectStore,
    model: &dyn ShotModel,
) -> Result<(), GenerateError> {
    reject_if_busy(store)?;
    let (script, characters) = {
        let project = store.active_project().ok_or(GenerateError::NoActiveProject)?;
        if project.original_text.trim().is_empty() {
            return Err(GenerateError::EmptyScript);
        }
        (project.original_text.clone(), project.characters.clone())
    };

    store.set_generating(true);
    let outcome = match model.generate_shot_list(&script, &characters).await {
        Ok(fields) => {
            info!(shots = fields.len(), "storyboard generated");
            let shots: Vec<Shot> = fields
                .into_iter()
                .enumerate()
                .map(|(index, f)| Shot::from_fields(new_entity_id(), index as u32 + 1, f))
                .collect();
            store.replace_shots(shots).map_err(GenerateError::from)
        }
        Err(e) => {
            warn!(error = %e, "storyboard generation failed");
            Err(e)
        }
    };
    store.set_generating(false);
    outcome
}

/// Regenerates one shot in place, preserving its id, position, number and
/// attached image.
pub async fn regenerate_shot(
    store: &mut ProjectStore,
    model: &dyn ShotModel,
    shot_id: &str,
) -> Result<(), GenerateError> {
    reject_if_busy(store)?;
    let (script, characters, target) = {
        let project = store.active_project().ok_or(GenerateError::NoActiveProject)?;
        let shot = project
            .shot(shot_id)
            .ok_or_else(|| GenerateError::shot_not_found(shot_id))?
            .clone();
        (project.original_text.clone(), project.characters.clone(), shot)
    };

    store.set_regenerating_shot(Some(shot_id.to_string()));
    let outcome = match model.regenerate_shot(&script, &characters, &target).await {
        Ok(fields) => {
            info!(shot_id = %shot_id, "shot regenerated");
            store
                .apply_shot_fields(shot_id, fields)
                .map_err(GenerateError::from)
        }
        Err(e) => {
            warn!(shot_id = %shot_id, error = %e, "shot regeneration failed");
            Err(e)
        }
    };
    store.set_regenerating_shot(None);
    outcome
}
