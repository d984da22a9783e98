//! Data models for storyboard projects.
//!
//! The wire format (serde) uses camelCase field names so that exported
//! project files and server payloads match the files produced by the
//! original LensCore frontend.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Title given to a freshly created project.
pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Draft";

/// Suffix appended to the title of an imported project whose id collided
/// with an existing one.
pub const IMPORT_COPY_SUFFIX: &str = " (Imported Copy)";

/// Generates a fresh entity id.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

// =============================================================================
// CHARACTER
// =============================================================================

/// A reusable visual asset: a named bundle of visual-feature text woven into
/// generation prompts for appearance consistency.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub visual_prompt: String,
}

impl Character {
    /// Creates a new Character with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set the visual-feature prompt.
    pub fn with_visual_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.visual_prompt = prompt.into();
        self
    }
}

/// Shallow partial update for a Character. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterPatch {
    pub name: Option<String>,
    pub visual_prompt: Option<String>,
}

impl CharacterPatch {
    pub fn apply_to(self, character: &mut Character) {
        if let Some(name) = self.name {
            character.name = name;
        }
        if let Some(prompt) = self.visual_prompt {
            character.visual_prompt = prompt;
        }
    }
}

// =============================================================================
// SHOT
// =============================================================================

/// One row of the storyboard: a single camera take with framing, motion and
/// lighting metadata plus the generation prompts derived from it.
///
/// `shot_number` is a dense 1-based rank: after any structural change to a
/// project's shot list, `shots[i].shot_number == i + 1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Shot {
    pub id: String,
    pub shot_number: u32,
    /// Estimated duration in seconds (> 0).
    pub duration: f64,
    /// Framing, e.g. "Close-up" / "Wide shot".
    #[serde(rename = "type")]
    pub shot_type: String,
    pub angle: String,
    pub movement: String,
    pub lighting: String,
    pub description: String,
    pub t2i_prompt: String,
    pub i2v_prompt: String,
    pub dialogue: String,
    pub audio: String,
    /// User-attached reference imagery (data URL), never produced by generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Shot {
    /// Creates a new Shot with the given id and rank.
    pub fn new(id: impl Into<String>, shot_number: u32) -> Self {
        Self {
            id: id.into(),
            shot_number,
            ..Default::default()
        }
    }

    /// Builder: set the duration in seconds.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Builder: set the picture description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set the text-to-image prompt.
    pub fn with_t2i_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.t2i_prompt = prompt.into();
        self
    }

    /// Materializes a shot from generated fields, assigning the given id.
    ///
    /// The rank from the response is used when present, otherwise the caller's
    /// fallback; the store renumbers on insert anyway.
    pub fn from_fields(id: impl Into<String>, fallback_number: u32, fields: ShotFields) -> Self {
        let shot_number = fields.shot_number.unwrap_or(fallback_number);
        let mut shot = Shot::new(id, shot_number);
        shot.overwrite_fields(fields);
        shot
    }

    /// Overwrites the generated fields wholesale from a model response,
    /// preserving `id`, `shot_number` and `image_url`.
    pub fn overwrite_fields(&mut self, fields: ShotFields) {
        self.duration = fields.duration;
        self.shot_type = fields.shot_type;
        self.angle = fields.angle;
        self.movement = fields.movement;
        self.lighting = fields.lighting;
        self.description = fields.description;
        self.t2i_prompt = fields.t2i_prompt;
        self.i2v_prompt = fields.i2v_prompt;
        self.dialogue = fields.dialogue;
        self.audio = fields.audio;
    }
}

/// The generated portion of a shot, as returned by the remote model.
/// Never carries an id; `shot_number` is present in full-storyboard responses
/// and absent in single-shot regeneration responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShotFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_number: Option<u32>,
    pub duration: f64,
    #[serde(rename = "type")]
    pub shot_type: String,
    pub angle: String,
    pub movement: String,
    pub lighting: String,
    pub description: String,
    pub t2i_prompt: String,
    pub i2v_prompt: String,
    pub dialogue: String,
    pub audio: String,
}

impl From<&Shot> for ShotFields {
    fn from(shot: &Shot) -> Self {
        Self {
            shot_number: Some(shot.shot_number),
            duration: shot.duration,
            shot_type: shot.shot_type.clone(),
            angle: shot.angle.clone(),
            movement: shot.movement.clone(),
            lighting: shot.lighting.clone(),
            description: shot.description.clone(),
            t2i_prompt: shot.t2i_prompt.clone(),
            i2v_prompt: shot.i2v_prompt.clone(),
            dialogue: shot.dialogue.clone(),
            audio: shot.audio.clone(),
        }
    }
}

/// Shallow partial update for a Shot. `None` fields are left untouched;
/// `id` and `shot_number` are never patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShotPatch {
    pub duration: Option<f64>,
    #[serde(rename = "type")]
    pub shot_type: Option<String>,
    pub angle: Option<String>,
    pub movement: Option<String>,
    pub lighting: Option<String>,
    pub description: Option<String>,
    pub t2i_prompt: Option<String>,
    pub i2v_prompt: Option<String>,
    pub dialogue: Option<String>,
    pub audio: Option<String>,
    pub image_url: Option<String>,
}

impl ShotPatch {
    pub fn apply_to(self, shot: &mut Shot) {
        if let Some(duration) = self.duration {
            shot.duration = duration;
        }
        if let Some(shot_type) = self.shot_type {
            shot.shot_type = shot_type;
        }
        if let Some(angle) = self.angle {
            shot.angle = angle;
        }
        if let Some(movement) = self.movement {
            shot.movement = movement;
        }
        if let Some(lighting) = self.lighting {
            shot.lighting = lighting;
        }
        if let Some(description) = self.description {
            shot.description = description;
        }
        if let Some(t2i) = self.t2i_prompt {
            shot.t2i_prompt = t2i;
        }
        if let Some(i2v) = self.i2v_prompt {
            shot.i2v_prompt = i2v;
        }
        if let Some(dialogue) = self.dialogue {
            shot.dialogue = dialogue;
        }
        if let Some(audio) = self.audio {
            shot.audio = audio;
        }
        if let Some(image_url) = self.image_url {
            shot.image_url = Some(image_url);
        }
    }
}

// =============================================================================
// PROJECT
// =============================================================================

/// A saved storyboard session: source text, character bank, shot list.
/// Owns its characters and shots exclusively.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub original_text: String,
    pub characters: Vec<Character>,
    pub shots: Vec<Shot>,
    /// Milliseconds since epoch; refreshed on every mutation, never decreases.
    pub updated_at: i64,
}

impl Project {
    /// Creates a new empty project with the default placeholder title.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_PROJECT_TITLE.to_string(),
            updated_at: now_millis(),
            ..Default::default()
        }
    }

    /// Builder: set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the script text.
    pub fn with_original_text(mut self, text: impl Into<String>) -> Self {
        self.original_text = text.into();
        self
    }

    /// Refreshes `updated_at`, clamped so it never moves backwards even on a
    /// coarse or stepped clock.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }

    /// Looks up a shot by id.
    pub fn shot(&self, shot_id: &str) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == shot_id)
    }

    /// Looks up a character by id.
    pub fn character(&self, character_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == character_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults() {
        let project = Project::new("p-1");
        assert_eq!(project.id, "p-1");
        assert_eq!(project.title, DEFAULT_PROJECT_TITLE);
        assert!(project.characters.is_empty());
        assert!(project.shots.is_empty());
        assert!(project.updated_at > 0);
    }

    #[test]
    fn test_character_builder() {
        let character = Character::new("char-1", "Mei").with_visual_prompt("red silk jacket");
        assert_eq!(character.id, "char-1");
        assert_eq!(character.name, "Mei");
        assert_eq!(character.visual_prompt, "red silk jacket");
    }

    #[test]
    fn test_shot_wire_format() {
        let mut shot = Shot::new("shot-1", 1).with_duration(3.0);
        shot.shot_type = "Close-up".to_string();
        shot.t2i_prompt = "a face".to_string();

        let json = serde_json::to_value(&shot).unwrap();
        assert_eq!(json["shotNumber"], 1);
        assert_eq!(json["type"], "Close-up");
        assert_eq!(json["t2iPrompt"], "a face");
        // imageUrl is omitted when unset, matching the original files
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_shot_lenient_parse() {
        // Regeneration responses carry no shotNumber and no id
        let fields: ShotFields = serde_json::from_str(
            r#"{"duration": 4, "type": "Wide shot", "description": "dawn ridge"}"#,
        )
        .unwrap();
        assert_eq!(fields.shot_number, None);
        assert_eq!(fields.duration, 4.0);
        assert_eq!(fields.shot_type, "Wide shot");
        assert!(fields.audio.is_empty());
    }

    #[test]
    fn test_overwrite_fields_preserves_identity() {
        let mut shot = Shot::new("shot-7", 7).with_description("old");
        shot.image_url = Some("data:image/png;base64,xyz".to_string());

        let fields = ShotFields {
            description: "new".to_string(),
            duration: 5.0,
            ..Default::default()
        };
        shot.overwrite_fields(fields);

        assert_eq!(shot.id, "shot-7");
        assert_eq!(shot.shot_number, 7);
        assert_eq!(shot.description, "new");
        assert_eq!(shot.duration, 5.0);
        assert_eq!(shot.image_url.as_deref(), Some("data:image/png;base64,xyz"));
    }

    #[test]
    fn test_shot_patch_is_shallow() {
        let mut shot = Shot::new("shot-1", 1).with_duration(3.0);
        shot.dialogue = "keep me".to_string();

        let patch = ShotPatch {
            lighting: Some("Rembrandt".to_string()),
            duration: Some(6.0),
            ..Default::default()
        };
        patch.apply_to(&mut shot);

        assert_eq!(shot.lighting, "Rembrandt");
        assert_eq!(shot.duration, 6.0);
        assert_eq!(shot.dialogue, "keep me");
        assert_eq!(shot.shot_number, 1);
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut project = Project::new("p-1");
        project.updated_at = i64::MAX - 1;
        project.touch();
        assert_eq!(project.updated_at, i64::MAX - 1);
    }
}
