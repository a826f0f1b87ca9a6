//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Available chunking strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingType {
    /// Fixed-size windows with overlap, cut at word boundaries
    #[default]
    FixedSize,
    /// Separator hierarchy (paragraph, line, sentence, word, character) with overlap
    Recursive,
}

impl ChunkingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedSize => "fixed_size",
            Self::Recursive => "recursive",
        }
    }
}

/// Configuration for chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in bytes
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in bytes
    pub chunk_overlap: usize,
    /// Chunks shorter than this are dropped (unless nothing else remains)
    pub min_chunk_size: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            min_chunk_size: 20,
        }
    }

    pub fn with_min_chunk_size(mut self, min_size: usize) -> Self {
        self.min_chunk_size = min_size;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::validation(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        if self.min_chunk_size > self.chunk_size {
            return Err(DomainError::validation(
                "min_chunk_size must be less than or equal to chunk_size",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

/// Where a chunk came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub char_start: usize,
    pub char_end: usize,
    /// Document identifier the chunk was cut from
    pub source: String,
}

impl ChunkMetadata {
    pub fn new(chunk_index: usize, total_chunks: usize, char_start: usize, char_end: usize) -> Self {
        Self {
            chunk_index,
            total_chunks,
            char_start,
            char_end,
            source: String::new(),
        }
    }
}

/// A bounded contiguous slice of source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    pub fn index(&self) -> usize {
        self.metadata.chunk_index
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunks
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Tag every chunk with its source and the final chunk count
pub fn finalize_chunks(chunks: &mut [Chunk], source: &str) {
    let total = chunks.len();

    for (idx, chunk) in chunks.iter_mut().enumerate() {
        chunk.metadata.chunk_index = idx;
        chunk.metadata.total_chunks = total;
        chunk.metadata.source = source.to_string();
    }
}

/// Helper functions for chunking
pub mod helpers {
    /// Largest char boundary at or before `pos`
    pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let mut pos = pos;
        while !text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    /// Smallest char boundary at or after `pos`
    pub fn ceil_char_boundary(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let mut pos = pos;
        while !text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    /// Find the nearest word boundary before a position
    pub fn find_word_boundary_before(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let bytes = text.as_bytes();
        let mut boundary = pos;

        while boundary > 0 && !bytes[boundary - 1].is_ascii_whitespace() {
            boundary -= 1;
        }

        if boundary == 0 {
            floor_char_boundary(text, pos)
        } else {
            boundary
        }
    }

    /// Find the nearest word boundary after a position
    pub fn find_word_boundary_after(text: &str, pos: usize) -> usize {
        if pos >= text.len() {
            return text.len();
        }

        let bytes = text.as_bytes();
        let mut boundary = pos;

        while boundary < text.len() && !bytes[boundary].is_ascii_whitespace() {
            boundary += 1;
        }

        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).validate().is_ok());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
        assert!(ChunkingConfig::new(10, 2).with_min_chunk_size(11).validate().is_err());
    }

    #[test]
    fn test_finalize_chunks() {
        let mut chunks = vec![
            Chunk::new("a", ChunkMetadata::new(7, 0, 0, 1)),
            Chunk::new("b", ChunkMetadata::new(9, 0, 1, 2)),
        ];

        finalize_chunks(&mut chunks, "biology.pdf");

        assert_eq!(chunks[1].index(), 1);
        assert_eq!(chunks[0].metadata.total_chunks, 2);
        assert_eq!(chunks[0].metadata.source, "biology.pdf");
    }

    #[test]
    fn test_find_word_boundaries() {
        let text = "hello world test";
        assert_eq!(helpers::find_word_boundary_before(text, 8), 6);
        assert_eq!(helpers::find_word_boundary_after(text, 3), 5);
        assert_eq!(helpers::find_word_boundary_after(text, 6), 11);
    }

    #[test]
    fn test_char_boundaries_on_multibyte_text() {
        let text = "añb";
        assert_eq!(helpers::floor_char_boundary(text, 2), 1);
        assert_eq!(helpers::ceil_char_boundary(text, 2), 3);
        assert_eq!(helpers::find_word_boundary_before("ñññ", 3), 2);
    }

    #[test]
    fn test_chunking_type_serde() {
        let parsed: ChunkingType = serde_json::from_str("\"recursive\"").unwrap();
        assert_eq!(parsed, ChunkingType::Recursive);
        assert_eq!(ChunkingType::default().as_str(), "fixed_size");
    }
}
