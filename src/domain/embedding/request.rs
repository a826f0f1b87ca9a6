//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to embed a batch of texts with one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    inputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    /// Create a request for multiple texts
    pub fn batch(model: impl Into<String>, inputs: Vec<String>) -> Self {
        Self {
            model: model.into(),
            inputs,
            dimensions: None,
        }
    }

    /// Create a request for a single text
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::batch(model, vec![text.into()])
    }

    /// Ask the provider to truncate vectors to the given size
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request() {
        let request = EmbeddingRequest::single("nomic-embed-text", "chlorophyll");

        assert_eq!(request.model(), "nomic-embed-text");
        assert_eq!(request.inputs(), &["chlorophyll".to_string()]);
        assert_eq!(request.len(), 1);
        assert!(request.dimensions().is_none());
    }

    #[test]
    fn test_batch_with_dimensions() {
        let request = EmbeddingRequest::batch("m", vec!["a".into(), "b".into()]).with_dimensions(256);

        assert_eq!(request.len(), 2);
        assert_eq!(request.dimensions(), Some(256));
        assert!(!request.is_empty());
    }
}
