//! Project domain module.
//!
//! This module provides:
//! - `model`: value objects (Project, Character, Shot) and partial-update types
//! - `persist`: the durable snapshot trait with file and in-memory adapters
//! - `store`: ProjectStore with CRUD, ordering and generation busy flags

pub mod model;
pub mod persist;
pub mod store;

pub use model::{
    Character, CharacterPatch, Project, Shot, ShotFields, ShotPatch, DEFAULT_PROJECT_TITLE,
};
pub use persist::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreSnapshot};
pub use store::ProjectStore;
