use std::env;

use serde::{Deserialize, Serialize};

use crate::ai::provider::{AiError, GenerateOptions, Provider, api_key_env};
use crate::config::AiConfig;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPERATION: &str = "chat completion";

/// Hosted chat-completion adapter.
#[derive(Debug)]
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiChat {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let provider = Provider::Openai;
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
        let provider = Provider::Openai;
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
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

        let body: ChatCompletionResponse =
            response.json().await.map_err(|source| AiError::Request {
                provider,
                operation: OPERATION,
                source,
            })?;
        extract_text(body)
    }
}

/// Pulls the first choice's message content; an absent or empty content
/// field is an empty-response error, never `Ok("")`.
fn extract_text(body: ChatCompletionResponse) -> Result<String, AiError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(AiError::EmptyResponse {
            provider: Provider::Openai,
        })
}
