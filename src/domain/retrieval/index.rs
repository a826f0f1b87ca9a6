//! Exact cosine-similarity vector index over document chunks

use serde::{Deserialize, Serialize};

use crate::domain::embedding::cosine_similarity;
use crate::domain::ingestion::Chunk;
use crate::domain::DomainError;

/// An immutable, searchable set of embedded chunks for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    document_id: String,
    embedding_model: String,
    dimensions: usize,
    #[serde(default)]
    generation: u64,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
}

/// A similarity hit: position of the chunk in the index and its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityHit {
    pub position: usize,
    pub score: f32,
}

impl VectorIndex {
    /// Build a fresh index. Vector count must match chunk count and all vectors must share
    /// one dimension.
    pub fn build(
        document_id: impl Into<String>,
        embedding_model: impl Into<String>,
        chunks: Vec<Chunk>,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, DomainError> {
        if chunks.len() != vectors.len() {
            return Err(DomainError::internal(format!(
                "Embedding count mismatch: {} chunks but {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().position(|v| v.len() != dimensions) {
            return Err(DomainError::internal(format!(
                "Embedding {} has {} dimensions, expected {}",
                bad,
                vectors[bad].len(),
                dimensions
            )));
        }

        Ok(Self {
            document_id: document_id.into(),
            embedding_model: embedding_model.into(),
            dimensions,
            generation: 0,
            chunks,
            vectors,
        })
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Split into `(document_id, embedding_model, chunks, vectors)`
    pub fn into_parts(self) -> (String, String, Vec<Chunk>, Vec<Vec<f32>>) {
        (self.document_id, self.embedding_model, self.chunks, self.vectors)
    }

    pub fn chunk(&self, position: usize) -> Option<&Chunk> {
        self.chunks.get(position)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top `limit` chunks by cosine similarity to `query`. Equal scores keep chunk order.
    pub fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SimilarityHit>, DomainError> {
        if !self.is_empty() && query.len() != self.dimensions {
            return Err(DomainError::validation(format!(
                "Query vector has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut hits: Vec<SimilarityHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| SimilarityHit {
                position,
                score: cosine_similarity(query, vector),
            })
            .collect();

        // sort_by is stable
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::ChunkMetadata;

    fn chunk(content: &str, idx: usize) -> Chunk {
        Chunk::new(content, ChunkMetadata::new(idx, 3, 0, content.len()))
    }

    fn sample() -> VectorIndex {
        VectorIndex::build(
            "doc-1",
            "test-embed",
            vec![chunk("a", 0), chunk("b", 1), chunk("c", 2)],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_build_rejects_count_mismatch() {
        let result = VectorIndex::build("doc", "m", vec![chunk("a", 0)], vec![]);
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let result = VectorIndex::build(
            "doc",
            "m",
            vec![chunk("a", 0), chunk("b", 1)],
            vec![vec![1.0, 0.0], vec![1.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_search_orders_by_score_with_stable_ties() {
        let index = sample();
        let hits = index.search(&[1.0, 0.0], 10).unwrap();

        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 2, 1]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_truncates() {
        let index = sample();
        assert_eq!(index.search(&[0.0, 1.0], 1).unwrap()[0].position, 1);
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        assert!(sample().search(&[1.0, 0.0, 0.0], 2).is_err());
    }

    #[test]
    fn test_serde_preserves_scores() {
        let index = VectorIndex::build(
            "doc",
            "m",
            vec![chunk("x", 0), chunk("y", 1)],
            vec![vec![0.123_456_79, -0.987_654_3], vec![0.333_333_34, 0.1]],
        )
        .unwrap();
        let json = serde_json::to_string(&index).unwrap();
        let restored: VectorIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, index);
        assert_eq!(
            index.search(&[0.5, 0.5], 2).unwrap(),
            restored.search(&[0.5, 0.5], 2).unwrap()
        );
    }
}
