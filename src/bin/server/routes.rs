//! Axum handlers for the two generation endpoints.
//!
//! The server is a stateless proxy: payloads carry the script and character
//! bank explicitly, and responses carry generated shot fields for the caller
//! to merge into its own project state.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use lenscore::generate::ShotModel;
use lenscore::{Character, GenerateError, MoonshotClient, Shot, ShotFields};

// ===== PAYLOADS =====

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub characters: Vec<Character>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub shots: Vec<ShotFields>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub characters: Vec<Character>,
    pub shot_data: Shot,
}

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

fn map_error(err: GenerateError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        GenerateError::EmptyScript => StatusCode::BAD_REQUEST,
        GenerateError::NoActiveProject | GenerateError::ShotNotFound(_) => StatusCode::NOT_FOUND,
        GenerateError::Busy => StatusCode::CONFLICT,
        GenerateError::MissingApiKey | GenerateError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        GenerateError::Http(_) | GenerateError::Api { .. } | GenerateError::MalformedResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    warn!(status = %status, error = %err, "generation request failed");
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ===== HANDLERS =====

/// POST /api/generate-storyboard: full storyboard from a script.
pub async fn generate_storyboard(
    State(client): State<Arc<MoonshotClient>>,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let text = request.text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(map_error(GenerateError::EmptyScript));
    }
    let shots = client
        .generate_shot_list(&text, &request.characters)
        .await
        .map_err(map_error)?;
    Ok(Json(GenerateResponse { shots }))
}

/// POST /api/regenerate-shot: single shot rewritten against its script.
pub async fn regenerate_shot(
    State(client): State<Arc<MoonshotClient>>,
    Json(request): Json<RegenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let script = request.script.unwrap_or_default();
    if script.trim().is_empty() {
        return Err(map_error(GenerateError::EmptyScript));
    }
    let fields = client
        .regenerate_shot(&script, &request.characters, &request.shot_data)
        .await
        .map_err(map_error)?;
    Ok(Json(fields))
}
