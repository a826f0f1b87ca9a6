//! Infrastructure services

mod content_service;
mod document_service;
mod generation_service;
mod indexing_service;
mod retrieval_service;

pub use content_service::{
    ContentOptions, ContentService, GenerateCommand, ProcessedDocument, DEFAULT_QUERY,
};
pub use document_service::DocumentService;
pub use generation_service::{
    GenerationDefaults, GenerationInput, GenerationOutcome, GenerationService, Provenance,
    GENERATED_FROM_FULL_TEXT, GENERATED_FROM_RAG,
};
pub use indexing_service::{EmbeddingSettings, IndexingService};
pub use retrieval_service::{RetrievalService, DEFAULT_CANDIDATES, DEFAULT_TOP_K};
