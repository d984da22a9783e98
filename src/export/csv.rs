//! CSV export: one row per shot, spreadsheet-compatible.
//!
//! The output is prefixed with a UTF-8 byte-order mark so that spreadsheet
//! tools detect the encoding, and every free-text field is quoted with
//! internal quotes doubled.

use crate::project::model::Project;

const BOM: &str = "\u{feff}";

const HEADERS: [&str; 11] = [
    "Shot #",
    "Duration (s)",
    "Shot Type",
    "Camera Angle",
    "Camera Movement",
    "Lighting",
    "Description",
    "T2I Prompt",
    "I2V Prompt",
    "Dialogue",
    "Audio",
];

/// Quotes a free-text field, doubling any embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Formats a duration the way the project files carry it: no trailing `.0`
/// for whole seconds.
fn format_duration(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}

/// Renders a project's shot list as CSV text.
pub fn export_csv(project: &Project) -> String {
    let mut lines = Vec::with_capacity(project.shots.len() + 1);
    lines.push(HEADERS.join(","));
    for shot in &project.shots {
        let row = [
            shot.shot_number.to_string(),
            format_duration(shot.duration),
            quote(&shot.shot_type),
            quote(&shot.angle),
            quote(&shot.movement),
            quote(&shot.lighting),
            quote(&shot.description),
            quote(&shot.t2i_prompt),
            quote(&shot.i2v_prompt),
            quote(&shot.dialogue),
            quote(&shot.audio),
        ];
        lines.push(row.join(","));
    }
    format!("{}{}", BOM, lines.join("\n"))
}
