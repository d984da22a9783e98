//! Export transforms: pure, deterministic functions from a Project to an
//! external representation.
//!
//! - `csv`: spreadsheet table (UTF-8 BOM, quote-doubled fields)
//! - `edl`: CMX3600-like edit-decision-list at a fixed 25 fps
//! - `project_file`: portable `.lenscore` JSON with import round-trip
//! - `prompts`: plain-text prompt sheet

pub mod csv;
pub mod edl;
pub mod project_file;
pub mod prompts;

pub use csv::export_csv;
pub use edl::{export_edl, frames_to_timecode, EDL_FPS};
pub use project_file::{export_project_file, parse_project_file};
pub use prompts::export_prompt_sheet;
