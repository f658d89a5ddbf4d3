use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};

use crate::ai::provider::{AiError, GenerateOptions, Provider};
use crate::config::AiConfig;

const OPERATION: &str = "converse";

/// Managed-cloud adapter over the Bedrock Converse API.
#[derive(Debug)]
pub struct BedrockChat {
    client: aws_sdk_bedrockruntime::Client,
    model: String,
}

impl BedrockChat {
    /// Construction resolves the AWS credential chain for the configured
    /// region; no Bedrock call is made until `chat`.
    pub async fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region()))
            .load()
            .await;
        let client = aws_sdk_bedrockruntime::Client::new(&sdk_config);

        Ok(Self {
            client,
            model: cfg.model(),
        })
    }

    pub async fn chat(&self, prompt: &str, options: GenerateOptions) -> Result<String, AiError> {
        let provider = Provider::Bedrock;
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|err| AiError::Sdk {
                provider,
                operation: OPERATION,
                message: err.to_string(),
            })?;

        let mut request = self
            .client
            .converse()
            .model_id(self.model.clone())
            .messages(message);

        if options.temperature.is_some() || options.max_tokens.is_some() {
            let mut inference = InferenceConfiguration::builder();
            if let Some(temperature) = options.temperature {
                inference = inference.temperature(temperature);
            }
            if let Some(max_tokens) = options.max_tokens {
                inference = inference.max_tokens(max_tokens as i32);
            }
            request = request.inference_config(inference.build());
        }

        let output = request.send().await.map_err(|err| AiError::Sdk {
            provider,
            operation: OPERATION,
            message: format!("{}", DisplayErrorContext(&err)),
        })?;

        first_text(output.output())
    }
}

/// Unwraps the converse union into its message and takes the first text
/// content block; anything else is an empty response.
fn first_text(
    output: Option<&aws_sdk_bedrockruntime::types::ConverseOutput>,
) -> Result<String, AiError> {
    output
        .and_then(|union| union.as_message().ok())
        .and_then(|message| message.content().first())
        .and_then(|block| block.as_text().ok())
        .cloned()
        .filter(|text| !text.is_empty())
        .ok_or(AiError::EmptyResponse {
            provider: Provider::Bedrock,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockruntime::types::ConverseOutput;

    fn message_output(blocks: Vec<ContentBlock>) -> ConverseOutput {
        let mut builder = Message::builder().role(ConversationRole::Assistant);
        for block in blocks {
            builder = builder.content(block);
        }
        ConverseOutput::Message(builder.build().unwrap())
    }

    #[test]
    fn extracts_first_text_block() {
        let output = message_output(vec![
            ContentBlock::Text("hello world".to_string()),
            ContentBlock::Text("second".to_string()),
        ]);
        assert_eq!(first_text(Some(&output)).unwrap(), "hello world");
    }

    #[test]
    fn missing_output_is_an_empty_response() {
        assert!(matches!(
            first_text(None),
            Err(AiError::EmptyResponse {
                provider: Provider::Bedrock
            })
        ));
    }

    #[test]
    fn blank_text_block_is_an_empty_response() {
        let output = message_output(vec![ContentBlock::Text(String::new())]);
        assert!(matches!(
            first_text(Some(&output)),
            Err(AiError::EmptyResponse { .. })
        ));
    }
}
