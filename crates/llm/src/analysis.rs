use tracing::{debug, info};

use tenderlens_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider, Message};

/// Sends a built system prompt plus a document's text to the model and
/// returns its free-text summary. One request per call, no retries.
pub struct Analyzer {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl Analyzer {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Build from config, creating the OpenAI provider.
    pub fn from_config(llm_config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(llm_config)?;
        Ok(Self::new(provider, llm_config.temperature, llm_config.max_tokens))
    }

    /// System role carries the instructions, user role carries the document.
    pub async fn analyze(&self, system_prompt: &str, document_text: &str) -> Result<String, LlmError> {
        info!(
            prompt_chars = system_prompt.len(),
            document_chars = document_text.len(),
            "Requesting analysis"
        );

        let messages = vec![Message::system(system_prompt), Message::user(document_text)];
        let response = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;

        debug!("LLM response: {}", response);
        Ok(response)
    }
}
