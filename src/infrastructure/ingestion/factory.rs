//! Factory for creating chunkers

use std::sync::Arc;

use crate::domain::ingestion::{ChunkingStrategy, ChunkingType};

use super::chunkers::{FixedSizeChunker, RecursiveChunker};

/// Factory for creating chunking strategies
#[derive(Debug, Default)]
pub struct ChunkerFactory;

impl ChunkerFactory {
    /// Create a chunker for the given type
    pub fn create(chunking_type: ChunkingType) -> Arc<dyn ChunkingStrategy> {
        match chunking_type {
            ChunkingType::FixedSize => Arc::new(FixedSizeChunker::new()),
            ChunkingType::Recursive => Arc::new(RecursiveChunker::new()),
        }
    }

    /// Get a list of all available chunking types
    pub fn available_types() -> Vec<ChunkingType> {
        vec![ChunkingType::FixedSize, ChunkingType::Recursive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::ChunkingConfig;

    #[test]
    fn test_chunker_factory_fixed_size() {
        let chunker = ChunkerFactory::create(ChunkingType::FixedSize);
        assert_eq!(chunker.name(), "fixed_size");
    }

    #[test]
    fn test_chunker_factory_recursive() {
        let chunker = ChunkerFactory::create(ChunkingType::Recursive);
        assert_eq!(chunker.name(), "recursive");
    }

    #[test]
    fn test_every_type_chunks_text() {
        let text = "Photosynthesis converts light into chemical energy. ".repeat(20);
        let config = ChunkingConfig::new(200, 40).with_min_chunk_size(10);

        for chunking_type in ChunkerFactory::available_types() {
            let chunks = ChunkerFactory::create(chunking_type)
                .chunk(&text, &config)
                .unwrap();
            assert!(chunks.len() > 1, "{} produced a single chunk", chunking_type.as_str());
        }
    }
}
