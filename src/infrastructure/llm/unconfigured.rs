use async_trait::async_trait;

use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse};

/// Stand-in used when no credential is configured. Startup succeeds; every call fails with
/// a configuration error naming the missing variable.
#[derive(Debug, Clone)]
pub struct UnconfiguredLlmProvider {
    provider: &'static str,
    missing: &'static str,
}

impl UnconfiguredLlmProvider {
    pub fn new(provider: &'static str, missing: &'static str) -> Self {
        Self { provider, missing }
    }
}

#[async_trait]
impl LlmProvider for UnconfiguredLlmProvider {
    async fn chat(&self, _model: &str, _request: LlmRequest) -> Result<LlmResponse, DomainError> {
        Err(DomainError::configuration(format!(
            "{} is not set; the {} provider is unavailable",
            self.missing, self.provider
        )))
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_fails_on_use() {
        let provider = UnconfiguredLlmProvider::new("gemini", "GEMINI_API_KEY");
        let err = provider
            .chat("gemini-1.5-pro", LlmRequest::builder().user("hi").build())
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert_eq!(provider.provider_name(), "gemini");
    }
}
