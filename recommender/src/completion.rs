use crate::{
    config::RecommenderConfig,
    error::RecommenderError,
    prompt::{GenerationParams, PromptPair},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn new(model: &str, prompts: &PromptPair, params: GenerationParams) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompts.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompts.user.clone(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

/// Response envelope. Every level is optional because the envelope itself is
/// untrusted; `extract_content` decides what counts as malformed.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Thin client over a chat-completions endpoint. One request per call, no
/// retries, transport-default timeouts.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    config: RecommenderConfig,
    client: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// POST the prompts and return the raw response body on a 2xx.
    pub async fn complete(
        &self,
        prompts: &PromptPair,
        params: GenerationParams,
    ) -> Result<String, RecommenderError> {
        let request = ChatCompletionRequest::new(&self.config.model, prompts, params);

        info!(
            "Sending completion request to {} with model {}",
            self.config.api_url, self.config.model
        );
        info!("Referer: {}, Title: {}", self.config.referer, self.config.app_title);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Completion API timeout");
                } else if e.is_connect() {
                    error!("Failed to connect to completion API");
                }
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Completion API returned error: {} {}", status.as_u16(), body);
            return Err(RecommenderError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Completion API response body: {}", body);
        Ok(body)
    }
}

/// Pull the first choice's message content out of a raw response body.
pub fn extract_content(body: &str) -> Result<String, RecommenderError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        error!("Completion response is not a valid envelope: {}", e);
        e
    })?;

    let choices = envelope
        .choices
        .ok_or_else(|| RecommenderError::MalformedEnvelope("missing choices".to_string()))?;

    let first = choices
        .into_iter()
        .next()
        .ok_or_else(|| RecommenderError::MalformedEnvelope("empty choices".to_string()))?;

    let content = first
        .message
        .ok_or_else(|| RecommenderError::MalformedEnvelope("missing message".to_string()))?
        .content
        .filter(|content| !content.is_empty())
        .ok_or_else(|| RecommenderError::MalformedEnvelope("missing content".to_string()))?;

    Ok(content)
}
