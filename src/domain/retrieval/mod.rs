//! Vector retrieval domain: indexes, snapshot registry, reranking

pub mod context;
pub mod index;
pub mod registry;
pub mod reranker;

pub use context::{RetrievedChunk, RetrievedContext, CONTEXT_SEPARATOR};
pub use index::{SimilarityHit, VectorIndex};
pub use registry::IndexRegistry;
pub use reranker::{RerankResult, Reranker};

#[cfg(test)]
pub use reranker::mock::MockReranker;
