//! Cross-encoder reranking trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Relevance score for one of the documents passed to the reranker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerankResult {
    /// Position of the document in the input slice
    pub index: usize,
    pub relevance_score: f32,
}

/// Reorders candidate passages by relevance to a query
#[async_trait]
pub trait Reranker: Send + Sync + Debug {
    /// Return at most `top_n` results, most relevant first
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>, DomainError>;

    /// Model or service name reported in status output
    fn name(&self) -> &str;
}
