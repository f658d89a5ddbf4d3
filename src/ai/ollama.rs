use serde::{Deserialize, Serialize};

use crate::ai::provider::{AiError, GenerateOptions, Provider};
use crate::config::AiConfig;

const OPERATION: &str = "generate";

/// Local model-server adapter.
#[derive(Debug)]
pub struct OllamaChat {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ModelOptions>,
}

#[derive(Debug, Serialize)]
struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaChat {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let provider = Provider::Ollama;
        let host = cfg.host();
        let endpoint = reqwest::Url::parse(&host)
            .and_then(|base| base.join("/api/generate"))
            .map_err(|err| AiError::Config {
                provider,
                message: format!("invalid host '{host}': {err}"),
            })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| AiError::Construction {
                provider,
                message: err.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            model: cfg.model(),
        })
    }

    pub async fn chat(&self, prompt: &str, options: GenerateOptions) -> Result<String, AiError> {
        let provider = Provider::Ollama;
        let model_options = match (options.temperature, options.max_tokens) {
            (None, None) => None,
            (temperature, max_tokens) => Some(ModelOptions {
                temperature,
                num_predict: max_tokens,
            }),
        };
        let payload = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: model_options,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
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

        let body: GenerateResponse =
            response.json().await.map_err(|source| AiError::Request {
                provider,
                operation: OPERATION,
                source,
            })?;
        extract_text(body)
    }
}

fn extract_text(body: GenerateResponse) -> Result<String, AiError> {
    if body.response.is_empty() {
        return Err(AiError::EmptyResponse {
            provider: Provider::Ollama,
        });
    }
    Ok(body.response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_response_passes_through() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response":"hello world","done":true}"#).unwrap();
        assert_eq!(extract_text(body).unwrap(), "hello world");
    }

    #[test]
    fn empty_response_is_an_error_not_an_empty_string() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response":"","done":true}"#).unwrap();
        assert!(matches!(
            extract_text(body),
            Err(AiError::EmptyResponse {
                provider: Provider::Ollama
            })
        ));
    }

    #[test]
    fn request_disables_streaming() {
        let payload = GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            stream: false,
            options: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""stream":false"#));
        assert!(!json.contains("options"));
    }

    #[test]
    fn max_tokens_maps_to_num_predict() {
        let payload = GenerateRequest {
            model: "llama2".to_string(),
            prompt: "hi".to_string(),
            stream: false,
            options: Some(ModelOptions {
                temperature: None,
                num_predict: Some(128),
            }),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""num_predict":128"#));
    }
}
