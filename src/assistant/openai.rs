//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AssistantError, ChatClient, ChatMessage};
use crate::config::AssistantConfig;

/// Blocking HTTPS client for a chat-completions endpoint.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Builds a client reading the API key from `cfg.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::MissingApiKey`] when the variable is unset
    /// or blank.
    pub fn from_config(cfg: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AssistantError::MissingApiKey {
                var: cfg.api_key_env.clone(),
            })?;
        Self::with_api_key(cfg, api_key)
    }

    /// Builds a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Transport`] if the HTTP client cannot be built.
    pub fn with_api_key(cfg: &AssistantConfig, api_key: String) -> Result<Self, AssistantError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key,
        })
    }
}

impl ChatClient for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError> {
        info!(model = %self.model, endpoint = %self.endpoint, "requesting chat completion");
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
            })
            .send()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "chat service rejected request");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }
        parse_completion(&body)
    }
}

/// Extracts the first choice's text from a chat-completions response body.
///
/// # Errors
///
/// Returns [`AssistantError::Transport`] for malformed JSON and
/// [`AssistantError::EmptyResponse`] when no non-blank content is present.
pub fn parse_completion(body: &str) -> Result<String, AssistantError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| AssistantError::Transport(format!("malformed response: {e}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|s| !s.trim().is_empty())
        .ok_or(AssistantError::EmptyResponse)
}
