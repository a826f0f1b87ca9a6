//! Domain layer - core types, traits and pure logic

pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod llm;
pub mod retrieval;

pub use document::{DocumentStore, ExtractedDocument, PageRange, PageSpan, TextExtractor};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::{DomainError, FatalKind};
pub use generation::{
    ArtifactMetadata, ContentType, GeneratedArtifact, GenerationSettings, PromptBuilder,
    PromptInput, SummaryLength,
};
pub use ingestion::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, ChunkingType};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmResponseFormat,
    Message, MessageRole, Usage,
};
pub use retrieval::{
    IndexRegistry, RerankResult, Reranker, RetrievedChunk, RetrievedContext, VectorIndex,
};
