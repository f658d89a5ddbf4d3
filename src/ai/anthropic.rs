use std::env;

use serde::{Deserialize, Serialize};

use crate::ai::provider::{AiError, GenerateOptions, Provider, api_key_env};
use crate::config::AiConfig;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPERATION: &str = "messages";

/// The API requires an explicit output-token bound on every request.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Conversational-API adapter.
#[derive(Debug)]
pub struct AnthropicChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl AnthropicChat {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let provider = Provider::Anthropic;
        let key_env = api_key_env(provider);
        let api_key = match cfg.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            Some(key) => key.to_string(),
            None => env::var(key_env).ok().filter(|key| !key.trim().is_empty()).ok_or_else(
                || AiError::Config {
                    provider,
                    message: format!("api_key is not set and {key_env} is not in the environment"),
                },
            )?,
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AiError::Construction {
                provider,
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            model: cfg.model(),
        })
    }

    pub async fn chat(&self, prompt: &str, options: GenerateOptions) -> Result<String, AiError> {
        let provider = Provider::Anthropic;
        let payload = MessagesRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|source| AiError::Request {
                provider,
                operation: OPERATION,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                provider,
                operation: OPERATION,
                status,
                body,
            });
        }

        let body: MessagesResponse =
            response.json().await.map_err(|source| AiError::Request {
                provider,
                operation: OPERATION,
                source,
            })?;
        extract_text(body)
    }
}

/// Takes the first text content block; replies made only of non-text blocks
/// count as empty.
fn extract_text(body: MessagesResponse) -> Result<String, AiError> {
    body.content
        .into_iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .filter(|text| !text.is_empty())
        .ok_or(AiError::EmptyResponse {
            provider: Provider::Anthropic,
        })
}
