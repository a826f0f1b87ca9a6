//! Retrieval results handed to the prompt builder

use serde::Serialize;

use crate::domain::ingestion::ChunkMetadata;

/// Separator placed between chunk contents in the prompt context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// A chunk selected for the prompt context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub semantic_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f32>,
    /// Rank in the similarity stage
    pub index: usize,
}

/// Ordered chunks plus their joined text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievedContext {
    pub context: String,
    pub chunks: Vec<RetrievedChunk>,
}

impl RetrievedContext {
    pub fn new(chunks: Vec<RetrievedChunk>) -> Self {
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        Self { context, chunks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
