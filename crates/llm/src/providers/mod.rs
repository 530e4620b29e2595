pub mod openai;

use tenderlens_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat-completion provider from config.
///
/// Refuses a missing or placeholder API key instead of sending it upstream.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    if !llm_config.is_configured() {
        return Err(LlmError::NotConfigured(
            "OPENAI_API_KEY not set (set it in the environment or the secrets file)".into(),
        ));
    }
    Ok(Box::new(openai::OpenAiProvider::new(
        llm_config.api_key.clone(),
        llm_config.model.clone(),
        llm_config.base_url.clone(),
    )))
}
