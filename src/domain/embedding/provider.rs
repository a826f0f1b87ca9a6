//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Trait for embedding providers
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::Embedding;

    /// Bag-of-words hashing embedder: texts sharing words get similar vectors
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        fn vectorize(&self, text: &str) -> Vec<f32> {
            let mut vector = vec![0.0f32; self.dimensions];

            for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
                let hash = word
                    .to_lowercase()
                    .bytes()
                    .fold(2166136261u32, |acc, b| (acc ^ b as u32).wrapping_mul(16777619));
                vector[hash as usize % self.dimensions] += 1.0;
            }

            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let data = request
                .inputs()
                .iter()
                .enumerate()
                .map(|(idx, text)| Embedding::new(idx, self.vectorize(text)))
                .collect();

            Ok(EmbeddingResponse::new(request.model(), data))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new(64);
            let request = EmbeddingRequest::batch("mock", vec!["Hello".into(), "World".into()]);

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.embeddings().len(), 2);
            assert_eq!(response.embeddings()[1].vector().len(), 64);
        }

        #[tokio::test]
        async fn test_shared_words_score_higher() {
            let provider = MockEmbeddingProvider::new(256);
            let request = EmbeddingRequest::batch(
                "mock",
                vec![
                    "chlorophyll absorbs light".into(),
                    "light is absorbed by chlorophyll".into(),
                    "the french revolution began in 1789".into(),
                ],
            );

            let vectors = provider.embed(request).await.unwrap().into_vectors();

            assert!(
                cosine_similarity(&vectors[0], &vectors[1])
                    > cosine_similarity(&vectors[0], &vectors[2])
            );
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new(8).with_error("boom");
            let result = provider.embed(EmbeddingRequest::single("mock", "x")).await;

            assert!(result.is_err());
        }
    }
}
