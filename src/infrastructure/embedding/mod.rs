//! Embedding provider implementations

mod openai;

pub use openai::{OpenAiEmbeddingProvider, UnconfiguredEmbeddingProvider};

pub use super::llm::{HttpClient, HttpClientTrait};
