//! Indexing service - chunk, embed and publish a document index

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::document::ExtractedDocument;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::ingestion::{finalize_chunks, ChunkingConfig, ChunkingStrategy};
use crate::domain::retrieval::{IndexRegistry, VectorIndex};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_index_build;

/// Embedding model settings used when indexing and querying
#[derive(Debug, Clone)]
pub struct EmbeddingSettings {
    pub model: String,
    pub dimensions: Option<usize>,
    pub batch_size: usize,
}

impl EmbeddingSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            dimensions: None,
            batch_size: 96,
        }
    }

    pub fn with_dimensions(mut self, dimensions: Option<usize>) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub(crate) fn request(&self, inputs: Vec<String>) -> EmbeddingRequest {
        let request = EmbeddingRequest::batch(&self.model, inputs);
        match self.dimensions {
            Some(dimensions) => request.with_dimensions(dimensions),
            None => request,
        }
    }
}

/// Builds a fresh `VectorIndex` for a document and publishes it to the registry
pub struct IndexingService {
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    embedding: EmbeddingSettings,
    registry: Arc<IndexRegistry>,
}

impl std::fmt::Debug for IndexingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingService")
            .field("chunker", &self.chunker.name())
            .field("chunking", &self.chunking)
            .field("embedder", &self.embedder.provider_name())
            .field("embedding", &self.embedding)
            .finish()
    }
}

impl IndexingService {
    pub fn new(
        chunker: Arc<dyn ChunkingStrategy>,
        chunking: ChunkingConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        embedding: EmbeddingSettings,
        registry: Arc<IndexRegistry>,
    ) -> Self {
        Self {
            chunker,
            chunking,
            embedder,
            embedding,
            registry,
        }
    }

    pub fn chunking(&self) -> &ChunkingConfig {
        &self.chunking
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding.model
    }

    /// Chunk and embed `document` into a new index without publishing it
    pub async fn build(
        &self,
        document_id: &str,
        document: &ExtractedDocument,
    ) -> Result<VectorIndex, DomainError> {
        if document.is_blank() {
            return Err(DomainError::validation(format!(
                "Document '{}' contains no extractable text",
                document_id
            )));
        }

        let mut chunks = self.chunker.chunk(document.text(), &self.chunking)?;
        finalize_chunks(&mut chunks, document_id);
        debug!(
            document_id = document_id,
            chunker = self.chunker.name(),
            chunks = chunks.len(),
            "Document chunked"
        );

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.embedding.batch_size) {
            let inputs: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let expected = inputs.len();

            let response = self
                .embedder
                .embed(self.embedding.request(inputs))
                .await?
                .into_vectors();

            if response.len() != expected {
                return Err(DomainError::provider(
                    self.embedder.provider_name(),
                    format!("Expected {} embeddings, got {}", expected, response.len()),
                ));
            }

            vectors.extend(response);
        }

        VectorIndex::build(document_id, &self.embedding.model, chunks, vectors)
    }

    /// Build and publish; the new snapshot replaces any previous one for the document
    pub async fn index(
        &self,
        document_id: &str,
        document: &ExtractedDocument,
    ) -> Result<Arc<VectorIndex>, DomainError> {
        let start = Instant::now();
        let index = self.build(document_id, document).await?;
        let chunks = index.len();

        let snapshot = self.registry.publish(index).await;
        record_index_build(chunks, start.elapsed());

        info!(
            document_id = document_id,
            chunks = chunks,
            generation = snapshot.generation(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Document indexed"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::infrastructure::ingestion::RecursiveChunker;

    fn service(registry: Arc<IndexRegistry>, embedder: MockEmbeddingProvider) -> IndexingService {
        IndexingService::new(
            Arc::new(RecursiveChunker::new()),
            ChunkingConfig::new(120, 20).with_min_chunk_size(5),
            Arc::new(embedder),
            EmbeddingSettings::new("mock-embed").with_batch_size(2),
            registry,
        )
    }

    fn biology() -> ExtractedDocument {
        ExtractedDocument::from_pages([
            "Photosynthesis takes place in the chloroplasts of plant cells.\n\nLight reactions produce ATP and NADPH.",
            "The Calvin cycle fixes carbon dioxide into sugars.\n\nRubisco is the key enzyme of carbon fixation.",
        ])
    }

    #[tokio::test]
    async fn test_index_publishes_snapshot() {
        let registry = Arc::new(IndexRegistry::new());
        let service = service(registry.clone(), MockEmbeddingProvider::new(32));

        let snapshot = service.index("bio.pdf", &biology()).await.unwrap();

        assert!(snapshot.len() > 2);
        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.dimensions(), 32);
        assert!(snapshot.chunks().iter().all(|c| c.metadata.source == "bio.pdf"));
        assert_eq!(registry.active().await.unwrap().document_id(), "bio.pdf");
    }

    #[tokio::test]
    async fn test_reindex_replaces_snapshot() {
        let registry = Arc::new(IndexRegistry::new());
        let service = service(registry.clone(), MockEmbeddingProvider::new(16));

        let first = service.index("bio.pdf", &biology()).await.unwrap();
        let second = service
            .index("bio.pdf", &ExtractedDocument::plain("Mitosis has four phases."))
            .await
            .unwrap();

        assert_eq!(second.generation(), first.generation() + 1);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get("bio.pdf").await.unwrap().len(), second.len());
        // readers holding the old snapshot keep it intact
        assert!(first.len() > second.len());
    }

    #[tokio::test]
    async fn test_blank_document_is_rejected() {
        let registry = Arc::new(IndexRegistry::new());
        let service = service(registry.clone(), MockEmbeddingProvider::new(8));

        let err = service
            .index("empty.pdf", &ExtractedDocument::from_pages(["   "]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_embedding_failure_publishes_nothing() {
        let registry = Arc::new(IndexRegistry::new());
        let service = service(
            registry.clone(),
            MockEmbeddingProvider::new(8).with_error("embedding backend down"),
        );

        assert!(service.index("bio.pdf", &biology()).await.is_err());
        assert!(registry.is_empty().await);
        assert_eq!(registry.current_generation(), 0);
    }
}
