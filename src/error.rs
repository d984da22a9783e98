//! Error types for the project store and export transforms.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the project store and its persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write the durable snapshot.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or project file (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Project not found in the store.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Index out of bounds for shot reordering.
    #[error("Index {index} out of bounds for shot list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Imported data does not look like a project file.
    #[error("Invalid project file: {0}")]
    InvalidProjectFile(String),
}

impl StoreError {
    /// Creates a ProjectNotFound error.
    pub fn project_not_found(id: impl Into<String>) -> Self {
        Self::ProjectNotFound(id.into())
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Creates an InvalidProjectFile error.
    pub fn invalid_project_file(msg: impl Into<String>) -> Self {
        Self::InvalidProjectFile(msg.into())
    }
}
