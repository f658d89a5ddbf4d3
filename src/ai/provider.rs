use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Closed set of supported AI backends. Fixed for the process lifetime once
/// the configuration is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Bedrock,
    Openai,
    Anthropic,
    Ollama,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bedrock => "bedrock",
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        }
    }

    /// Default model used when the config leaves `model` unset.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Bedrock => "anthropic.claude-3-sonnet-20240229-v1:0",
            Self::Openai => "gpt-4",
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::Ollama => "llama2",
        }
    }
}

pub fn api_key_env(provider: Provider) -> &'static str {
    match provider {
        Provider::Openai => "OPENAI_API_KEY",
        Provider::Anthropic => "ANTHROPIC_API_KEY",
        Provider::Bedrock | Provider::Ollama => "",
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation knobs threaded from `generate` down into the adapter call.
/// Absent values fall back to each backend's own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug)]
pub enum AiError {
    /// The `[ai]` config section is absent; the feature is off.
    Disabled,
    /// A required provider-specific field is missing or invalid.
    Config {
        provider: Provider,
        message: String,
    },
    /// The transport client could not be built.
    Construction {
        provider: Provider,
        message: String,
    },
    /// The network call failed before a backend reply was obtained.
    Request {
        provider: Provider,
        operation: &'static str,
        source: reqwest::Error,
    },
    /// The backend replied with a non-success status.
    Api {
        provider: Provider,
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
    /// An AWS SDK dispatch failure.
    Sdk {
        provider: Provider,
        operation: &'static str,
        message: String,
    },
    /// Transport succeeded but the reply held no usable text.
    EmptyResponse { provider: Provider },
    /// The execution scope was cancelled before the call completed.
    Cancelled,
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => {
                write!(f, "AI features are not enabled; add an [ai] section to the config")
            }
            Self::Config { provider, message } => {
                write!(f, "{provider} configuration error: {message}")
            }
            Self::Construction { provider, message } => {
                write!(f, "failed to construct {provider} client: {message}")
            }
            Self::Request {
                provider,
                operation,
                source,
            } => write!(f, "{provider} {operation} failed: {source}"),
            Self::Api {
                provider,
                operation,
                status,
                body,
            } => write!(f, "{provider} {operation} failed: API error {status}: {body}"),
            Self::Sdk {
                provider,
                operation,
                message,
            } => write!(f, "{provider} {operation} failed: {message}"),
            Self::EmptyResponse { provider } => {
                write!(f, "no response from model ({provider})")
            }
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for AiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request { source, .. } => Some(source),
            _ => None,
        }
    }
}
