use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for LLM providers (Gemini, OpenAI, ...)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a single non-streaming completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use crate::domain::FatalKind;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum MockOutcome {
        Content(String),
        Error(String),
        Fatal(FatalKind, String),
        Unconfigured,
    }

    /// Scriptable provider that records the last request it received
    #[derive(Debug)]
    pub struct MockLlmProvider {
        outcome: MockOutcome,
        last_request: Mutex<Option<LlmRequest>>,
    }

    impl MockLlmProvider {
        pub fn with_content(content: impl Into<String>) -> Self {
            Self::from_outcome(MockOutcome::Content(content.into()))
        }

        pub fn with_error(error: impl Into<String>) -> Self {
            Self::from_outcome(MockOutcome::Error(error.into()))
        }

        pub fn with_fatal(kind: FatalKind, message: impl Into<String>) -> Self {
            Self::from_outcome(MockOutcome::Fatal(kind, message.into()))
        }

        pub fn unconfigured() -> Self {
            Self::from_outcome(MockOutcome::Unconfigured)
        }

        fn from_outcome(outcome: MockOutcome) -> Self {
            Self {
                outcome,
                last_request: Mutex::new(None),
            }
        }

        pub fn last_request(&self) -> Option<LlmRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(
            &self,
            model: &str,
            request: LlmRequest,
        ) -> Result<LlmResponse, DomainError> {
            *self.last_request.lock().unwrap() = Some(request);

            match &self.outcome {
                MockOutcome::Content(content) => {
                    Ok(LlmResponse::new(model, Message::assistant(content.clone())))
                }
                MockOutcome::Error(error) => Err(DomainError::provider("mock", error)),
                MockOutcome::Fatal(kind, message) => {
                    Err(DomainError::provider_fatal("mock", *kind, message))
                }
                MockOutcome::Unconfigured => {
                    Err(DomainError::configuration("mock credential is not set"))
                }
            }
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
