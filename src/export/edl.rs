//! Edit-decision-list export (CMX3600-like).
//!
//! The timeline is a deterministic fold over the shot sequence: each shot's
//! duration is accumulated into a running frame counter at a fixed 25 fps,
//! and every shot emits one timed event plus descriptive comment lines.

use crate::project::model::{Project, Shot};

/// Fixed frame rate for the exported timeline.
pub const EDL_FPS: u64 = 25;

/// Maximum comment length taken from a shot description.
const COMMENT_CHARS: usize = 50;

/// Formats an absolute frame count as a zero-padded `HH:MM:SS:FF` timecode.
pub fn frames_to_timecode(total_frames: u64) -> String {
    let hours = total_frames / (3600 * EDL_FPS);
    let minutes = (total_frames % (3600 * EDL_FPS)) / (60 * EDL_FPS);
    let seconds = (total_frames % (60 * EDL_FPS)) / EDL_FPS;
    let frames = total_frames % EDL_FPS;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
}

fn duration_frames(shot: &Shot) -> u64 {
    (shot.duration * EDL_FPS as f64).round() as u64
}

fn comment_line(shot: &Shot) -> String {
    let flat: String = shot
        .description
        .chars()
        .take(COMMENT_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    format!("* COMMENT: {}...", flat)
}

/// Renders a project's shot list as an EDL.
pub fn export_edl(project: &Project) -> String {
    let mut out = format!(
        "TITLE: {}\nFCM: NON-DROP FRAME\n\n",
        project.title.to_uppercase()
    );
    let mut current_frame: u64 = 0;
    for (index, shot) in project.shots.iter().enumerate() {
        let frames = duration_frames(shot);
        let record_in = frames_to_timecode(current_frame);
        let record_out = frames_to_timecode(current_frame + frames);
        let source_out = format!("00:00:{:02}:00", shot.duration.round() as u64);
        out.push_str(&format!(
            "{:03}  AX       V     C        00:00:00:00 {} {} {}\n",
            index + 1,
            source_out,
            record_in,
            record_out
        ));
        out.push_str(&format!(
            "* FROM CLIP NAME: Shot {} - {}\n",
            shot.shot_number, shot.shot_type
        ));
        out.push_str(&comment_line(shot));
        out.push_str("\n\n");
        current_frame += frames;
    }
    out
}
