//! Provider-agnostic AI client.
//!
//! The [`Client`] facade exposes one operation surface (`chat`, `analyze`,
//! `summarize`, `generate`) regardless of which backend the configuration
//! selected. Each backend lives in its own adapter module and is bound
//! exactly once at construction.

/// Conversational-API adapter.
pub mod anthropic;
/// Managed-cloud adapter.
pub mod bedrock;
/// Local model-server adapter.
pub mod ollama;
/// Hosted chat-completion adapter.
pub mod openai;
/// Provider identifiers, generation options, and error taxonomy.
pub mod provider;

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use provider::{AiError, GenerateOptions, Provider};

use crate::config::AiConfig;

pub fn analysis_prompt(text: &str) -> String {
    format!("Analyze the following text and provide insights:\n\n{text}")
}

pub fn summary_prompt(text: &str) -> String {
    format!("Summarize the following text concisely:\n\n{text}")
}

/// The one configured backend. Selected from `AiConfig.provider` at
/// construction, never at call time.
enum Backend {
    Bedrock(bedrock::BedrockChat),
    OpenAi(openai::OpenAiChat),
    Anthropic(anthropic::AnthropicChat),
    Ollama(ollama::OllamaChat),
}

impl Backend {
    async fn chat(
        &self,
        scope: &CancellationToken,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, AiError> {
        run_cancellable(scope, async {
            match self {
                Self::Bedrock(adapter) => adapter.chat(prompt, options).await,
                Self::OpenAi(adapter) => adapter.chat(prompt, options).await,
                Self::Anthropic(adapter) => adapter.chat(prompt, options).await,
                Self::Ollama(adapter) => adapter.chat(prompt, options).await,
            }
        })
        .await
    }

    fn provider(&self) -> Provider {
        match self {
            Self::Bedrock(_) => Provider::Bedrock,
            Self::OpenAi(_) => Provider::Openai,
            Self::Anthropic(_) => Provider::Anthropic,
            Self::Ollama(_) => Provider::Ollama,
        }
    }
}

/// Races a backend call against its execution scope. Cancellation drops the
/// pending call and surfaces its own error class.
async fn run_cancellable<F>(scope: &CancellationToken, call: F) -> Result<String, AiError>
where
    F: Future<Output = Result<String, AiError>>,
{
    tokio::select! {
        biased;
        () = scope.cancelled() => Err(AiError::Cancelled),
        result = call => result,
    }
}

/// Uniform AI operation surface over the bound backend.
///
/// Stateless beyond the binding: no conversation history, no caching. A
/// client built without an `[ai]` config section is valid but disabled —
/// every operation returns [`AiError::Disabled`].
pub struct Client {
    backend: Option<Backend>,
}

impl Client {
    pub async fn new(cfg: Option<&AiConfig>) -> Result<Self, AiError> {
        let Some(cfg) = cfg else {
            return Ok(Self { backend: None });
        };

        let backend = match cfg.provider {
            Provider::Bedrock => Backend::Bedrock(bedrock::BedrockChat::new(cfg).await?),
            Provider::Openai => Backend::OpenAi(openai::OpenAiChat::new(cfg)?),
            Provider::Anthropic => Backend::Anthropic(anthropic::AnthropicChat::new(cfg)?),
            Provider::Ollama => Backend::Ollama(ollama::OllamaChat::new(cfg)?),
        };
        debug!(provider = %cfg.provider, model = %cfg.model(), "AI client constructed");
        Ok(Self {
            backend: Some(backend),
        })
    }

    fn backend(&self) -> Result<&Backend, AiError> {
        self.backend.as_ref().ok_or(AiError::Disabled)
    }

    /// Sends a single user prompt and returns the reply text.
    pub async fn chat(&self, scope: &CancellationToken, prompt: &str) -> Result<String, AiError> {
        let backend = self.backend()?;
        debug!(provider = %backend.provider(), chars = prompt.len(), "chat");
        backend.chat(scope, prompt, GenerateOptions::default()).await
    }

    /// Asks the model for insights about the given text.
    pub async fn analyze(&self, scope: &CancellationToken, text: &str) -> Result<String, AiError> {
        let backend = self.backend()?;
        backend
            .chat(scope, &analysis_prompt(text), GenerateOptions::default())
            .await
    }

    /// Asks the model for a concise summary of the given text.
    pub async fn summarize(&self, scope: &CancellationToken, text: &str) -> Result<String, AiError> {
        let backend = self.backend()?;
        backend
            .chat(scope, &summary_prompt(text), GenerateOptions::default())
            .await
    }

    /// Generates content from a prompt with explicit generation options.
    pub async fn generate(
        &self,
        scope: &CancellationToken,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, AiError> {
        let backend = self.backend()?;
        backend.chat(scope, prompt, options).await
    }
}
