//! LLM provider implementations

mod factory;
mod gemini;
mod http_client;
mod openai;
mod unconfigured;

pub use factory::LlmProviderFactory;
pub use gemini::GeminiProvider;
pub use http_client::{error_for_status, HttpClient, HttpClientTrait, StatusClassifier};
pub use openai::OpenAiProvider;
pub use unconfigured::UnconfiguredLlmProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
