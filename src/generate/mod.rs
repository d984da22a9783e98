//! Generation gateway: the boundary between the project store and a remote
//! text-generation provider (only compiled with the `generate` feature).
//!
//! This module provides:
//! - `prompt`: system-prompt templates and the character-context builder
//! - `parse`: JSON-block extraction and typed response parsing
//! - `client`: the `ShotModel` port and the Moonshot chat-completions client
//! - `gateway`: the two store-level operations with busy-flag discipline

pub mod client;
pub mod gateway;
pub mod parse;
pub mod prompt;

pub use client::{MoonshotClient, MoonshotConfig, ShotModel};
pub use gateway::{generate_storyboard, regenerate_shot};

use thiserror::Error;

use crate::error::StoreError;

/// Errors surfaced by the generation gateway.
///
/// Validation errors (`NoActiveProject`, `EmptyScript`, `ShotNotFound`,
/// `MissingApiKey`, `Busy`) are raised before any network call. Transport
/// failures (`Http`, `Api`) and parse failures (`MalformedResponse`) are kept
/// distinct; neither ever leaves partial data in the store.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No resolvable active project.
    #[error("No active project")]
    NoActiveProject,

    /// The target shot does not exist in the active project.
    #[error("Shot not found: {0}")]
    ShotNotFound(String),

    /// The active project's script text is blank.
    #[error("Script text is empty")]
    EmptyScript,

    /// A generation or regeneration is already in flight.
    #[error("A generation is already in progress")]
    Busy,

    /// The MOONSHOT_API_KEY credential is not configured.
    #[error("Missing MOONSHOT_API_KEY credential")]
    MissingApiKey,

    /// Transport-level failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The model's response could not be parsed into the expected shape.
    /// Terminal for the call; never retried.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Persisting the merged result failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GenerateError {
    /// Creates a ShotNotFound error.
    pub fn shot_not_found(id: impl Into<String>) -> Self {
        Self::ShotNotFound(id.into())
    }

    /// Creates an Api error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a MalformedResponse error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
