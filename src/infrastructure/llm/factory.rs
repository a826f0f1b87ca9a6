use std::sync::Arc;

use tracing::warn;

use super::http_client::HttpClient;
use super::{GeminiProvider, OpenAiProvider, UnconfiguredLlmProvider};
use crate::config::{LlmConfig, LlmProviderKind};
use crate::domain::LlmProvider;

/// Builds the configured LLM provider
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the provider selected in configuration. A missing credential yields a
    /// provider that fails on first use instead of aborting startup.
    pub fn create(config: &LlmConfig, http_client: HttpClient) -> Arc<dyn LlmProvider> {
        let Some(api_key) = config.api_key() else {
            let provider = provider_label(config.provider);
            warn!(
                provider = provider,
                "{} is not set; generation requests will fail",
                config.api_key_env()
            );
            return Arc::new(UnconfiguredLlmProvider::new(provider, config.api_key_env()));
        };

        match (config.provider, config.base_url()) {
            (LlmProviderKind::Gemini, Some(base_url)) => {
                Arc::new(GeminiProvider::with_base_url(http_client, api_key, base_url))
            }
            (LlmProviderKind::Gemini, None) => Arc::new(GeminiProvider::new(http_client, api_key)),
            (LlmProviderKind::OpenAi, Some(base_url)) => {
                Arc::new(OpenAiProvider::with_base_url(http_client, api_key, base_url))
            }
            (LlmProviderKind::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
        }
    }
}

fn provider_label(kind: LlmProviderKind) -> &'static str {
    match kind {
        LlmProviderKind::Gemini => "gemini",
        LlmProviderKind::OpenAi => "openai",
    }
}
