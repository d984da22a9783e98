//! LensCore - Script-to-storyboard authoring engine.
//!
//! This crate turns a free-text script into an editable, persistent shot
//! list and renders it into industry exchange formats:
//!
//! - **Project store**: multi-project CRUD with an active-project pointer,
//!   persisted synchronously after every mutation
//! - **Shot editing**: add, patch, delete and reorder with dense 1-based
//!   renumbering after every structural change
//! - **Generation gateway** (feature `generate`): full-storyboard and
//!   single-shot generation against a remote model behind the `ShotModel` port
//! - **Exports**: CSV, 25 fps EDL, plain-text prompt sheet and a
//!   round-trippable `.lenscore` project file
//!
//! # Example
//!
//! ```rust
//! use lenscore::{export_csv, ProjectStore, Shot};
//!
//! let mut store = ProjectStore::in_memory();
//! let id = store.create_project().unwrap();
//! store.update_project_title(&id, "Harbor at Dusk").unwrap();
//!
//! store.add_shot(Shot::new("s-1", 1).with_duration(3.0)).unwrap();
//! store.add_shot(Shot::new("s-2", 2).with_duration(5.0)).unwrap();
//! store.reorder_shots(1, 0).unwrap();
//!
//! let csv = export_csv(store.active_project().unwrap());
//! assert!(csv.starts_with('\u{feff}'));
//! ```

pub mod error;
pub mod export;
pub mod project;

// Generation gateway (only compiled when the generate feature is enabled)
#[cfg(feature = "generate")]
pub mod generate;

// Re-exports for convenience
pub use error::{StoreError, StoreResult};
pub use export::{
    export_csv, export_edl, export_project_file, export_prompt_sheet, frames_to_timecode,
    parse_project_file, EDL_FPS,
};
pub use project::{
    Character, CharacterPatch, FileSnapshotStore, MemorySnapshotStore, Project, ProjectStore,
    Shot, ShotFields, ShotPatch, SnapshotStore, StoreSnapshot, DEFAULT_PROJECT_TITLE,
};

#[cfg(feature = "generate")]
pub use generate::{
    generate_storyboard, regenerate_shot, GenerateError, MoonshotClient, MoonshotConfig, ShotModel,
};
