//! Retrieval service - similarity search followed by reranking

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::retrieval::{Reranker, RetrievedChunk, RetrievedContext, VectorIndex};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_rerank_fallback;

use super::EmbeddingSettings;

/// Number of similarity candidates handed to the reranker
pub const DEFAULT_CANDIDATES: usize = 10;
/// Number of chunks kept for the prompt
pub const DEFAULT_TOP_K: usize = 5;

/// Two-stage retrieval over a `VectorIndex` snapshot
pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    embedding: EmbeddingSettings,
    reranker: Option<Arc<dyn Reranker>>,
    candidates: usize,
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("embedder", &self.embedder.provider_name())
            .field("reranker", &self.reranker_name())
            .field("candidates", &self.candidates)
            .finish()
    }
}

impl RetrievalService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, embedding: EmbeddingSettings) -> Self {
        Self {
            embedder,
            embedding,
            reranker: None,
            candidates: DEFAULT_CANDIDATES,
        }
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates.max(1);
        self
    }

    /// Reranker name, or `none` when reranking is disabled
    pub fn reranker_name(&self) -> &str {
        self.reranker.as_ref().map_or("none", |r| r.name())
    }

    /// Top `top_k` chunks for `query`.
    ///
    /// Takes the best candidates by cosine similarity, then reorders them with the
    /// reranker. A failing reranker degrades to similarity order.
    pub async fn retrieve(
        &self,
        index: &VectorIndex,
        query: &str,
        top_k: usize,
    ) -> Result<RetrievedContext, DomainError> {
        let top_k = top_k.max(1);

        if index.is_empty() {
            return Ok(RetrievedContext::empty());
        }

        let query_vector = self
            .embedder
            .embed(self.embedding.request(vec![query.to_string()]))
            .await?
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| {
                DomainError::provider(self.embedder.provider_name(), "No embedding returned for query")
            })?;

        let hits = index.search(&query_vector, self.candidates.max(top_k))?;
        let candidates: Vec<RetrievedChunk> = hits
            .iter()
            .enumerate()
            .filter_map(|(rank, hit)| {
                index.chunk(hit.position).map(|chunk| RetrievedChunk {
                    content: chunk.content.clone(),
                    metadata: chunk.metadata.clone(),
                    semantic_score: hit.score,
                    rerank_score: None,
                    index: rank,
                })
            })
            .collect();

        debug!(
            document_id = index.document_id(),
            candidates = candidates.len(),
            top_k = top_k,
            "Similarity search complete"
        );

        let selected = match &self.reranker {
            Some(reranker) => self.rerank(reranker.as_ref(), query, candidates, top_k).await,
            None => truncate(candidates, top_k),
        };

        Ok(RetrievedContext::new(selected))
    }

    async fn rerank(
        &self,
        reranker: &dyn Reranker,
        query: &str,
        candidates: Vec<RetrievedChunk>,
        top_k: usize,
    ) -> Vec<RetrievedChunk> {
        if candidates.is_empty() {
            return candidates;
        }

        let documents: Vec<String> = candidates.iter().map(|c| c.content.clone()).collect();

        let results = match reranker.rerank(query, &documents, top_k).await {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                warn!(reranker = reranker.name(), "Reranker returned no results, keeping similarity order");
                record_rerank_fallback(reranker.name());
                return truncate(candidates, top_k);
            }
            Err(e) => {
                warn!(
                    reranker = reranker.name(),
                    error = %e,
                    "Reranking failed, keeping similarity order"
                );
                record_rerank_fallback(reranker.name());
                return truncate(candidates, top_k);
            }
        };

        results
            .into_iter()
            .filter_map(|result| {
                candidates.get(result.index).map(|candidate| RetrievedChunk {
                    rerank_score: Some(result.relevance_score),
                    ..candidate.clone()
                })
            })
            .take(top_k)
            .collect()
    }
}

fn truncate(mut candidates: Vec<RetrievedChunk>, top_k: usize) -> Vec<RetrievedChunk> {
    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{EmbeddingRequest, MockEmbeddingProvider};
    use crate::domain::ingestion::{Chunk, ChunkMetadata};
    use crate::domain::retrieval::MockReranker;

    const PASSAGES: [&str; 6] = [
        "Photosynthesis converts light energy into chemical energy",
        "The French revolution began in 1789",
        "Chlorophyll absorbs light for photosynthesis in leaves",
        "Volcanoes form at plate boundaries",
        "Plants store the energy of photosynthesis as glucose",
        "Jazz originated in New Orleans",
    ];

    async fn index(embedder: &MockEmbeddingProvider) -> VectorIndex {
        let chunks: Vec<Chunk> = PASSAGES
            .iter()
            .enumerate()
            .map(|(i, p)| Chunk::new(*p, ChunkMetadata::new(i, PASSAGES.len(), 0, p.len())))
            .collect();
        let inputs = PASSAGES.iter().map(|p| p.to_string()).collect();
        let vectors = embedder
            .embed(EmbeddingRequest::batch("mock-embed", inputs))
            .await
            .unwrap()
            .into_vectors();

        VectorIndex::build("bio.pdf", "mock-embed", chunks, vectors).unwrap()
    }

    fn retrieval(embedder: MockEmbeddingProvider) -> RetrievalService {
        RetrievalService::new(Arc::new(embedder), EmbeddingSettings::new("mock-embed"))
            .with_candidates(4)
    }

    #[tokio::test]
    async fn test_retrieve_without_reranker_keeps_similarity_order() {
        let index = index(&MockEmbeddingProvider::new(256)).await;
        let service = retrieval(MockEmbeddingProvider::new(256));

        let context = service.retrieve(&index, "photosynthesis energy", 2).await.unwrap();

        assert_eq!(context.len(), 2);
        assert!(context.chunks.iter().all(|c| c.content.contains("hotosynthesis")));
        assert!(context.chunks[0].semantic_score >= context.chunks[1].semantic_score);
        assert_eq!(context.chunks[0].index, 0);
        assert!(context.chunks.iter().all(|c| c.rerank_score.is_none()));
        assert!(context.context.contains("\n\n---\n\n"));
        assert_eq!(service.reranker_name(), "none");
    }

    #[tokio::test]
    async fn test_retrieve_applies_reranker_order() {
        let index = index(&MockEmbeddingProvider::new(256)).await;
        let reranker = Arc::new(MockReranker::new());
        let service = retrieval(MockEmbeddingProvider::new(256)).with_reranker(reranker.clone());

        let plain = retrieval(MockEmbeddingProvider::new(256))
            .retrieve(&index, "photosynthesis energy", 4)
            .await
            .unwrap();
        let reranked = service.retrieve(&index, "photosynthesis energy", 2).await.unwrap();

        assert_eq!(reranker.calls(), 1);
        assert_eq!(reranked.len(), 2);
        // the mock reranker reverses the four candidates
        assert_eq!(reranked.chunks[0].content, plain.chunks[3].content);
        assert_eq!(reranked.chunks[0].index, 3);
        assert!(reranked.chunks.iter().all(|c| c.rerank_score.is_some()));
    }

    #[tokio::test]
    async fn test_reranker_failure_falls_back_to_similarity() {
        let index = index(&MockEmbeddingProvider::new(256)).await;
        let service = retrieval(MockEmbeddingProvider::new(256))
            .with_reranker(Arc::new(MockReranker::new().with_error("quota exceeded")));

        let context = service.retrieve(&index, "photosynthesis energy", 3).await.unwrap();

        assert_eq!(context.len(), 3);
        assert_eq!(
            context.chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(context.chunks.iter().all(|c| c.rerank_score.is_none()));
    }

    #[tokio::test]
    async fn test_top_k_larger_than_index() {
        let index = index(&MockEmbeddingProvider::new(32)).await;
        let service = RetrievalService::new(
            Arc::new(MockEmbeddingProvider::new(32)),
            EmbeddingSettings::new("mock-embed"),
        );

        let context = service.retrieve(&index, "anything", 50).await.unwrap();
        assert_eq!(context.len(), PASSAGES.len());
    }

    #[tokio::test]
    async fn test_empty_index_yields_empty_context() {
        let index = VectorIndex::build("empty", "mock-embed", Vec::new(), Vec::new()).unwrap();
        let service = retrieval(MockEmbeddingProvider::new(8).with_error("never called"));

        let context = service.retrieve(&index, "query", 5).await.unwrap();
        assert!(context.is_empty());
        assert!(context.context.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let index = index(&MockEmbeddingProvider::new(16)).await;
        let service = retrieval(MockEmbeddingProvider::new(16).with_error("down"));

        assert!(service.retrieve(&index, "query", 5).await.is_err());
    }
}
