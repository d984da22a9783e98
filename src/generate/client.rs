//! The `ShotModel` port and its Moonshot chat-completions implementation.
//!
//! `ShotModel` is the seam the gateway and server depend on; tests substitute
//! a scripted fake, production wires in `MoonshotClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse::{parse_shot_fields, parse_shot_list};
use super::prompt;
use super::GenerateError;
use crate::project::model::{Character, Shot, ShotFields};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "moonshot-v1-8k";

// Sampling parameters per operation. Regeneration runs hotter and shorter
// since it rewrites a single shot.
const GENERATE_TEMPERATURE: f64 = 0.7;
const GENERATE_MAX_TOKENS: u32 = 4000;
const REGENERATE_TEMPERATURE: f64 = 0.8;
const REGENERATE_MAX_TOKENS: u32 = 1500;

/// Abstraction over the remote model, one method per generation operation.
#[async_trait]
pub trait ShotModel: Send + Sync {
    /// Turns a script into a full shot list.
    async fn generate_shot_list(
        &self,
        script: &str,
        characters: &[Character],
    ) -> Result<Vec<ShotFields>, GenerateError>;

    /// Rewrites a single shot against the full script context.
    async fn regenerate_shot(
        &self,
        script: &str,
        characters: &[Character],
        shot: &Shot,
    ) -> Result<ShotFields, GenerateError>;
}

/// Connection settings for the Moonshot API.
#[derive(Debug, Clone)]
pub struct MoonshotConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl MoonshotConfig {
    /// Builds a config with default endpoint and model. Keys pasted with a
    /// doubled prefix (`sk-sk-...`) are normalized.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: normalize_api_key(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Reads MOONSHOT_API_KEY (required), MOONSHOT_BASE_URL and
    /// MOONSHOT_MODEL (optional) from the environment.
    pub fn from_env() -> Result<Self, GenerateError> {
        let api_key = std::env::var("MOONSHOT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerateError::MissingApiKey)?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("MOONSHOT_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("MOONSHOT_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

fn normalize_api_key(key: String) -> String {
    match key.strip_prefix("sk-sk-") {
        Some(rest) => format!("sk-{}", rest),
        None => key,
    }
}

// ===== WIRE TYPES =====

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ===== CLIENT =====

/// HTTP client for the Moonshot chat-completions API.
pub struct MoonshotClient {
    http: reqwest::Client,
    config: MoonshotConfig,
}

impl MoonshotClient {
    pub fn new(config: MoonshotConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Convenience constructor from environment variables.
    pub fn from_env() -> Result<Self, GenerateError> {
        Ok(Self::new(MoonshotConfig::from_env()?))
    }

    async fn chat(
        &self,
        system: String,
        user: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, GenerateError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(url = %url, model = %self.config.model, "chat completion request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerateError::api(status.as_u16(), message));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerateError::malformed("response contained no choices"))
    }
}

#[async_trait]
impl ShotModel for MoonshotClient {
    async fn generate_shot_list(
        &self,
        script: &str,
        characters: &[Character],
    ) -> Result<Vec<ShotFields>, GenerateError> {
        let content = self
            .chat(
                prompt::storyboard_system_prompt(characters),
                script.to_string(),
                GENERATE_TEMPERATURE,
                GENERATE_MAX_TOKENS,
            )
            .await?;
        parse_shot_list(&content)
    }

    async fn regenerate_shot(
        &self,
        script: &str,
        characters: &[Character],
        shot: &Shot,
    ) -> Result<ShotFields, GenerateError> {
        let content = self
            .chat(
                prompt::regenerate_system_prompt(script, characters),
                prompt::regenerate_user_message(shot),
                REGENERATE_TEMPERATURE,
                REGENERATE_MAX_TOKENS,
            )
            .await?;
        parse_shot_fields(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_key_prefix_is_normalized() {
        assert_eq!(MoonshotConfig::new("sk-sk-abc123").api_key, "sk-abc123");
        assert_eq!(MoonshotConfig::new("sk-abc123").api_key, "sk-abc123");
        assert_eq!(MoonshotConfig::new("other").api_key, "other");
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let config = MoonshotConfig::new("sk-x");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);

        let config = config
            .with_base_url("http://localhost:9999/v1")
            .with_model("moonshot-v1-32k");
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "moonshot-v1-32k");
    }
}
