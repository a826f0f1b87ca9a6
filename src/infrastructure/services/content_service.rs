//! Content service - request-level orchestration of loading, indexing, retrieval and generation

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::SourceMode;
use crate::domain::document::PageRange;
use crate::domain::generation::{ContentType, GeneratedArtifact, GenerationSettings};
use crate::domain::retrieval::{IndexRegistry, RetrievedContext, VectorIndex};
use crate::domain::DomainError;
use crate::infrastructure::vector_store::FileVectorStore;

use super::{
    DocumentService, GenerationInput, GenerationService, IndexingService, Provenance,
    RetrievalService, GENERATED_FROM_FULL_TEXT, GENERATED_FROM_RAG,
};

/// Query used for retrieval when a request names a document but gives no text
pub const DEFAULT_QUERY: &str = "the key concepts covered in the material";

/// Request-independent knobs
#[derive(Debug, Clone)]
pub struct ContentOptions {
    pub mode: SourceMode,
    pub top_k: usize,
    pub default_page_range: String,
    pub default_vector_store_path: String,
}

/// A `/generate` request after JSON decoding
#[derive(Debug, Clone, Default)]
pub struct GenerateCommand {
    pub text: String,
    pub content_type: Option<String>,
    pub bloom_level: Option<String>,
    pub material_meta: Option<Value>,
    pub pdf_id: Option<String>,
    pub bucket_name: Option<String>,
    pub settings: Option<Value>,
}

/// Result of downloading, extracting and indexing one document
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub index: Arc<VectorIndex>,
    pub text_length: usize,
    pub pages: usize,
}

/// Ties the generator pipeline together for the HTTP handlers
pub struct ContentService {
    documents: Arc<DocumentService>,
    indexing: Arc<IndexingService>,
    retrieval: Arc<RetrievalService>,
    generation: Arc<GenerationService>,
    registry: Arc<IndexRegistry>,
    vector_store: FileVectorStore,
    options: ContentOptions,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("documents", &self.documents)
            .field("retrieval", &self.retrieval)
            .field("generation", &self.generation)
            .field("options", &self.options)
            .finish()
    }
}

/// Non-empty trimmed value of an optional string
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ContentService {
    pub fn new(
        documents: Arc<DocumentService>,
        indexing: Arc<IndexingService>,
        retrieval: Arc<RetrievalService>,
        generation: Arc<GenerationService>,
        registry: Arc<IndexRegistry>,
        vector_store: FileVectorStore,
        options: ContentOptions,
    ) -> Self {
        Self {
            documents,
            indexing,
            retrieval,
            generation,
            registry,
            vector_store,
            options,
        }
    }

    pub fn options(&self) -> &ContentOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> {
        &self.registry
    }

    pub fn indexing(&self) -> &IndexingService {
        &self.indexing
    }

    pub fn retrieval(&self) -> &RetrievalService {
        &self.retrieval
    }

    /// Download, extract and index a document, replacing its previous snapshot
    pub async fn process_document(
        &self,
        pdf_id: &str,
        bucket: Option<&str>,
    ) -> Result<ProcessedDocument, DomainError> {
        let document = self.documents.load(pdf_id, bucket).await?;
        let index = self.indexing.index(pdf_id.trim(), &document).await?;

        Ok(ProcessedDocument {
            index,
            text_length: document.len(),
            pages: document.page_count(),
        })
    }

    /// Retrieve context for `query` from the named document or the active one
    pub async fn query(
        &self,
        query: &str,
        top_k: Option<usize>,
        pdf_id: Option<&str>,
    ) -> Result<RetrievedContext, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("query must not be empty"));
        }

        let index = self
            .registry
            .resolve(non_blank(pdf_id))
            .await
            .ok_or_else(|| DomainError::index_unavailable("No PDF processed yet"))?;

        self.retrieval
            .retrieve(&index, query, top_k.unwrap_or(self.options.top_k))
            .await
    }

    /// Produce an artifact for a `/generate` request
    pub async fn generate(&self, command: GenerateCommand) -> Result<GeneratedArtifact, DomainError> {
        let pdf_id = non_blank(command.pdf_id.as_deref());
        let bucket = non_blank(command.bucket_name.as_deref());
        let text = command.text.trim();

        if text.is_empty() && pdf_id.is_none() {
            return Err(DomainError::validation(
                "text must not be empty when no pdf_id is given",
            ));
        }

        let query = if text.is_empty() { DEFAULT_QUERY } else { text };
        let content_type = ContentType::parse(command.content_type.as_deref().unwrap_or_default());
        let settings = GenerationSettings::from_json(
            command.settings.as_ref(),
            &self.options.default_page_range,
        );

        let (source, mut provenance) = match self.options.mode {
            SourceMode::Rag => self.retrieved_source(query, pdf_id, bucket).await?,
            SourceMode::FullText => self.full_text_source(pdf_id, bucket, &settings).await?,
        };
        provenance.material_meta = command.material_meta;

        let outcome = self
            .generation
            .generate(&GenerationInput {
                content_type,
                query: query.to_string(),
                source,
                bloom_level: command.bloom_level,
                settings,
                provenance,
            })
            .await?;

        Ok(outcome.artifact)
    }

    async fn retrieved_source(
        &self,
        query: &str,
        pdf_id: Option<&str>,
        bucket: Option<&str>,
    ) -> Result<(String, Provenance), DomainError> {
        let index = match pdf_id {
            Some(id) => match self.registry.get(id).await {
                Some(index) => Some(index),
                None => {
                    info!(document_id = id, "Indexing document on demand");
                    Some(self.process_document(id, bucket).await?.index)
                }
            },
            None => self.registry.active().await,
        };

        let context = match &index {
            Some(index) => match self.retrieval.retrieve(index, query, self.options.top_k).await {
                Ok(context) => context,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        document_id = index.document_id(),
                        error = %e,
                        "Retrieval failed, generating without context"
                    );
                    RetrievedContext::empty()
                }
            },
            None => RetrievedContext::empty(),
        };

        let provenance = Provenance {
            generated_from: GENERATED_FROM_RAG.to_string(),
            material_meta: None,
            retrieved_chunks: context.len(),
            rag_enabled: index.is_some(),
            reranking: self.retrieval.reranker_name().to_string(),
        };

        Ok((context.context, provenance))
    }

    async fn full_text_source(
        &self,
        pdf_id: Option<&str>,
        bucket: Option<&str>,
        settings: &GenerationSettings,
    ) -> Result<(String, Provenance), DomainError> {
        let source = match pdf_id {
            Some(id) => {
                let document = self.documents.load(id, bucket).await?;
                if document.is_blank() {
                    return Err(DomainError::validation(format!(
                        "Document '{}' contains no extractable text",
                        id
                    )));
                }
                document
                    .select_pages(&PageRange::parse(&settings.page_range))
                    .to_string()
            }
            None => String::new(),
        };

        let provenance = Provenance {
            generated_from: GENERATED_FROM_FULL_TEXT.to_string(),
            material_meta: None,
            retrieved_chunks: 0,
            rag_enabled: false,
            reranking: "none".to_string(),
        };

        Ok((source, provenance))
    }

    /// Persist the named or active snapshot below the vector store directory
    pub async fn save_vector_store(
        &self,
        path: Option<&str>,
        pdf_id: Option<&str>,
    ) -> Result<(String, Arc<VectorIndex>), DomainError> {
        let path = non_blank(path).unwrap_or(&self.options.default_vector_store_path);
        let index = self
            .registry
            .resolve(non_blank(pdf_id))
            .await
            .ok_or_else(|| DomainError::index_unavailable("No vectorstore to save"))?;

        self.vector_store.save(&index, path).await?;
        Ok((path.to_string(), index))
    }

    /// Load a persisted snapshot and publish it as the active index
    pub async fn load_vector_store(
        &self,
        path: Option<&str>,
    ) -> Result<(String, Arc<VectorIndex>), DomainError> {
        let path = non_blank(path).unwrap_or(&self.options.default_vector_store_path);
        let index = self.vector_store.load(path).await?;
        let snapshot = self.registry.publish(index).await;

        Ok((path.to_string(), snapshot))
    }

    /// Directory a vector store path resolves to
    pub fn vector_store_dir(&self, path: &str) -> Result<PathBuf, DomainError> {
        self.vector_store.resolve(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MockDocumentStore;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::ingestion::ChunkingConfig;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::retrieval::MockReranker;
    use crate::domain::FatalKind;
    use crate::infrastructure::extraction::PdfTextExtractor;
    use crate::infrastructure::ingestion::RecursiveChunker;
    use crate::infrastructure::services::{EmbeddingSettings, GenerationDefaults};
    use bytes::Bytes;
    use serde_json::json;

    const NOTES: &str = "Photosynthesis happens in chloroplasts.\n\nThe light reactions split water and release oxygen.\n\nThe Calvin cycle builds glucose from carbon dioxide.";

    struct Fixture {
        service: ContentService,
        llm: Arc<MockLlmProvider>,
        _dir: tempfile::TempDir,
    }

    fn fixture(mode: SourceMode, llm: MockLlmProvider, store: MockDocumentStore) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(IndexRegistry::new());
        let embedder = Arc::new(MockEmbeddingProvider::new(64));
        let embedding = EmbeddingSettings::new("mock-embed");
        let llm = Arc::new(llm);

        let service = ContentService::new(
            Arc::new(DocumentService::new(
                Arc::new(store),
                Arc::new(PdfTextExtractor::new()),
                "uploadFiles",
            )),
            Arc::new(IndexingService::new(
                Arc::new(RecursiveChunker::new()),
                ChunkingConfig::new(80, 10).with_min_chunk_size(5),
                embedder.clone(),
                embedding.clone(),
                registry.clone(),
            )),
            Arc::new(
                RetrievalService::new(embedder, embedding).with_reranker(Arc::new(MockReranker::new())),
            ),
            Arc::new(GenerationService::new(
                llm.clone(),
                GenerationDefaults {
                    model: "gemini-1.5-pro".to_string(),
                    temperature: 0.7,
                    max_tokens: None,
                    service_name: "learnify-generator".to_string(),
                },
            )),
            registry,
            FileVectorStore::new(dir.path()),
            ContentOptions {
                mode,
                top_k: 2,
                default_page_range: "all".to_string(),
                default_vector_store_path: "vectorstore".to_string(),
            },
        );

        Fixture {
            service,
            llm,
            _dir: dir,
        }
    }

    fn notes_store(times: usize) -> MockDocumentStore {
        let mut store = MockDocumentStore::new();
        store
            .expect_download()
            .times(times)
            .returning(|_, _| Ok(Bytes::from_static(NOTES.as_bytes())));
        store
    }

    fn prompt_of(llm: &MockLlmProvider) -> String {
        llm.last_request().unwrap().messages[1].content_text().to_string()
    }

    #[tokio::test]
    async fn test_generate_requires_text_or_document() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("unused"), MockDocumentStore::new());

        let err = fx
            .service
            .generate(GenerateCommand {
                text: "   ".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(fx.llm.last_request().is_none());
    }

    #[tokio::test]
    async fn test_generate_without_index_uses_empty_context() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("offline"), MockDocumentStore::new());

        let artifact = fx
            .service
            .generate(GenerateCommand {
                text: "Explain photosynthesis".to_string(),
                content_type: Some("quiz".to_string()),
                settings: Some(json!({"num_questions": 2})),
                ..Default::default()
            })
            .await
            .unwrap();

        let metadata = artifact.metadata();
        assert!(metadata.fallback);
        assert!(!metadata.rag_enabled);
        assert_eq!(metadata.retrieved_chunks, 0);
        assert_eq!(artifact.item_count(), Some(2));
        assert!(prompt_of(&fx.llm).contains("No source material was provided"));
    }

    #[tokio::test]
    async fn test_generate_indexes_document_on_demand_once() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("offline"), notes_store(1));

        for _ in 0..2 {
            let artifact = fx
                .service
                .generate(GenerateCommand {
                    text: "light reactions".to_string(),
                    content_type: Some("summary".to_string()),
                    pdf_id: Some("bio.txt".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();

            assert!(artifact.metadata().rag_enabled);
            assert_eq!(artifact.metadata().retrieved_chunks, 2);
            assert_eq!(artifact.metadata().reranking, "mock-rerank");
        }

        assert_eq!(fx.service.registry().current_generation(), 1);
        assert!(prompt_of(&fx.llm).contains("\n\n---\n\n"));
    }

    #[tokio::test]
    async fn test_unknown_type_follows_assignment_path() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("offline"), MockDocumentStore::new());

        let artifact = fx
            .service
            .generate(GenerateCommand {
                text: "Cell biology".to_string(),
                content_type: Some("essay".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(artifact.content_type(), ContentType::Assignment);
        assert_eq!(artifact.metadata().bloom_level, "apply");
        assert!(prompt_of(&fx.llm).contains("grading rubric"));
    }

    #[tokio::test]
    async fn test_full_text_mode_stuffs_selected_pages() {
        let fx = fixture(SourceMode::FullText, MockLlmProvider::with_error("offline"), notes_store(1));

        let artifact = fx
            .service
            .generate(GenerateCommand {
                text: "Explain photosynthesis".to_string(),
                content_type: Some("quiz".to_string()),
                pdf_id: Some("bio.txt".to_string()),
                settings: Some(json!({"page_range": "1"})),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(artifact.metadata().generated_from, "Full-text content (fallback)");
        assert_eq!(artifact.metadata().page_range, "1");
        assert!(prompt_of(&fx.llm).contains("--- Page 1 ---"));
        assert!(fx.service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_fatal_generation_error_propagates() {
        let fx = fixture(
            SourceMode::Rag,
            MockLlmProvider::with_fatal(FatalKind::Authentication, "bad key"),
            MockDocumentStore::new(),
        );

        let err = fx
            .service
            .generate(GenerateCommand {
                text: "Explain photosynthesis".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_query_before_indexing_is_unavailable() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("unused"), MockDocumentStore::new());

        let err = fx.service.query("oxygen", None, None).await.unwrap_err();

        assert!(matches!(err, DomainError::IndexUnavailable { .. }));
        assert!(fx.service.registry().is_empty().await);
        assert_eq!(fx.service.registry().current_generation(), 0);
    }

    #[tokio::test]
    async fn test_process_then_query() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("unused"), notes_store(1));

        let processed = fx.service.process_document("bio.txt", None).await.unwrap();
        assert!(processed.index.len() >= 3);
        assert_eq!(processed.pages, 1);

        let context = fx.service.query("oxygen water", Some(1), None).await.unwrap();
        assert_eq!(context.len(), 1);
    }

    #[tokio::test]
    async fn test_save_then_load_reproduces_retrieval() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("unused"), notes_store(1));
        fx.service.process_document("bio.txt", None).await.unwrap();

        let before = fx.service.query("glucose", Some(3), None).await.unwrap();
        let (path, _) = fx.service.save_vector_store(None, None).await.unwrap();
        assert_eq!(path, "vectorstore");

        let (_, snapshot) = fx.service.load_vector_store(Some("vectorstore")).await.unwrap();
        assert_eq!(snapshot.generation(), 2);

        let after = fx.service.query("glucose", Some(3), None).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_save_without_index_is_unavailable() {
        let fx = fixture(SourceMode::Rag, MockLlmProvider::with_error("unused"), MockDocumentStore::new());

        let err = fx.service.save_vector_store(None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::IndexUnavailable { .. }));
    }
}
