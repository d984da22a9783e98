//! Prompt templates for the two generation operations.
//!
//! Both system prompts cast the model as a director and prompt engineer,
//! demand forced visual expansion even for terse scripts, and fix the JSON
//! output contract. When the project has characters, their visual feature
//! tags are injected as a hard constraint block.

use crate::project::model::{Character, Shot, ShotFields};

const STORYBOARD_SYSTEM_TEMPLATE: &str = r#"You are an award-winning film director and a world-class prompt engineer for text-to-image tools (Midjourney style) and image-to-video tools (Runway/Kling style). Break the user's script into a professional shot list.
{character_context}
Core rule, forced expansion: even when the script is a single sentence, never fall back to generic filler. Invent concrete visual detail for every shot: the subject's look and action, the environment, the weather, the texture of light.

Output contract: return exactly one JSON object of the shape
{"shots": [{"shotNumber": 1, "duration": 3, "type": "Close-up", "angle": "Eye level", "movement": "Push in", "lighting": "Natural light", "description": "...", "t2iPrompt": "...", "i2vPrompt": "...", "dialogue": "...", "audio": "..."}]}

Prompt rules:
1. "t2iPrompt" is one long run of comma-separated dense tags: [precise subject description], [high-detail environment], [framing and angle], [complex lighting], and always the quality tags: masterpiece, 8k resolution, extreme detail, photorealistic, Unreal Engine 5 render, shot on ARRI Alexa 65.
2. "i2vPrompt" pairs an explicit camera movement with the micro-physics of the subject and environment (drifting dust, rippling fabric, breath fog). No quality tags.
3. "description" is written for a human reading the storyboard, not for a model.

Return strictly valid JSON. No markdown fences, no commentary."#;

const REGENERATE_SYSTEM_TEMPLATE: &str = r#"You are a professional film director and prompt engineer. The user is unhappy with one specific shot. Redesign that single shot against the full script context and rewrite its prompts in extreme detail.
{character_context}
The full script is:
"""
{script}
"""

Quality bar: "t2iPrompt" must be a long run of comma-separated tags with complex lighting and the quality tags masterpiece, 8k resolution, extreme detail, photorealistic, Unreal Engine 5 render, shot on ARRI Alexa 65. "i2vPrompt" must carry a precise camera movement plus the micro-physics of subject and environment. No quality tags in "i2vPrompt".

Return exactly one JSON object describing the redesigned shot, of the shape
{"duration": 3, "type": "Close-up", "angle": "Eye level", "movement": "Push in", "lighting": "Rembrandt light", "description": "...", "t2iPrompt": "...", "i2vPrompt": "...", "dialogue": "...", "audio": "..."}
No markdown fences, no commentary."#;

/// Renders the hard-constraint block from the project's character bank.
/// Empty when there are no characters.
pub fn character_context(characters: &[Character]) -> String {
    if characters.is_empty() {
        return String::new();
    }
    let mut block = String::from(
        "\nHard constraint, character asset bank: whenever one of these characters appears in a shot, weave their feature tags verbatim into that shot's t2iPrompt:\n",
    );
    for character in characters {
        block.push_str(&format!(
            "- {} -> features: {}\n",
            character.name, character.visual_prompt
        ));
    }
    block
}

/// System prompt for full-storyboard generation.
pub fn storyboard_system_prompt(characters: &[Character]) -> String {
    STORYBOARD_SYSTEM_TEMPLATE.replace("{character_context}", &character_context(characters))
}

/// System prompt for single-shot regeneration. Embeds the full script so the
/// redesigned shot stays coherent with its neighbors.
pub fn regenerate_system_prompt(script: &str, characters: &[Character]) -> String {
    REGENERATE_SYSTEM_TEMPLATE
        .replace("{character_context}", &character_context(characters))
        .replace("{script}", script)
}

/// User message for single-shot regeneration: the shot's current generated
/// fields, serialized for the model to rewrite.
pub fn regenerate_user_message(shot: &Shot) -> String {
    let fields = ShotFields::from(shot);
    let json = serde_json::to_string_pretty(&fields).unwrap_or_default();
    format!(
        "Here is the current data for the shot being rewritten:\n{}\nDeeply optimize, expand and restructure it.",
        json
    )
}
