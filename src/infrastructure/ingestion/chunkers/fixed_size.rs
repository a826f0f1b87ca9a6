//! Fixed-size chunking strategy

use crate::domain::ingestion::{
    chunker::helpers, Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy,
};
use crate::domain::DomainError;

/// Splits text into windows of at most `chunk_size` bytes, stepping forward by
/// `chunk_size - chunk_overlap`
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    /// Whether to respect word boundaries
    respect_word_boundaries: bool,
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedSizeChunker {
    pub fn new() -> Self {
        Self {
            respect_word_boundaries: true,
        }
    }

    /// Set whether to respect word boundaries
    pub fn with_word_boundaries(mut self, respect: bool) -> Self {
        self.respect_word_boundaries = respect;
        self
    }

    fn find_chunk_end(&self, content: &str, start: usize, target_end: usize) -> usize {
        if target_end >= content.len() {
            return content.len();
        }

        if !self.respect_word_boundaries {
            let end = helpers::floor_char_boundary(content, target_end);
            return if end <= start {
                helpers::ceil_char_boundary(content, start + 1)
            } else {
                end
            };
        }

        let boundary = helpers::find_word_boundary_before(content, target_end);

        if boundary <= start {
            helpers::find_word_boundary_after(content, target_end)
        } else {
            boundary
        }
    }

    /// Move a window start forward to the beginning of a word
    fn align_start(&self, content: &str, start: usize) -> usize {
        let start = helpers::ceil_char_boundary(content, start);

        if !self.respect_word_boundaries || start == 0 || start >= content.len() {
            return start;
        }

        let bytes = content.as_bytes();
        if bytes[start - 1].is_ascii_whitespace() {
            return start;
        }

        let mut pos = helpers::find_word_boundary_after(content, start);
        while pos < content.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }
}

impl ChunkingStrategy for FixedSizeChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        if content.len() <= config.chunk_size {
            return Ok(vec![Chunk::new(
                content,
                ChunkMetadata::new(0, 1, 0, content.len()),
            )]);
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let step = config.chunk_size - config.chunk_overlap;

        while start < content.len() {
            let target_end = (start + config.chunk_size).min(content.len());
            let end = self.find_chunk_end(content, start, target_end);

            let window = &content[start..end];
            let leading = window.len() - window.trim_start().len();
            let chunk_content = window.trim();

            if !chunk_content.is_empty() && chunk_content.len() >= config.min_chunk_size {
                let char_start = start + leading;
                chunks.push(Chunk::new(
                    chunk_content,
                    ChunkMetadata::new(chunks.len(), 0, char_start, char_start + chunk_content.len()),
                ));
            }

            if end >= content.len() {
                break;
            }

            let next = self.align_start(content, start + step);
            start = if next <= start || next >= end { end } else { next };
        }

        if chunks.is_empty() {
            chunks.push(Chunk::new(
                content,
                ChunkMetadata::new(0, 1, 0, content.len()),
            ));
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.metadata.total_chunks = total;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "fixed_size"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_empty_content() {
        let chunks = FixedSizeChunker::new()
            .chunk("   \n\t  ", &ChunkingConfig::default())
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_content() {
        let chunks = FixedSizeChunker::new()
            .chunk("Hello, World!", &ChunkingConfig::new(1000, 200))
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello, World!");
        assert_eq!(chunks[0].metadata.total_chunks, 1);
    }

    #[test]
    fn test_chunks_respect_size_and_words() {
        let text = words(200);
        let config = ChunkingConfig::new(100, 20).with_min_chunk_size(1);
        let chunks = FixedSizeChunker::new().chunk(&text, &config).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 100);
            assert!(chunk.content.starts_with("word"));
            assert_eq!(&text[chunk.metadata.char_start..chunk.metadata.char_end], chunk.content);
        }
        assert!(chunks.last().unwrap().content.ends_with("word199"));
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = words(100);
        let config = ChunkingConfig::new(120, 40).with_min_chunk_size(1);
        let chunks = FixedSizeChunker::new().chunk(&text, &config).unwrap();

        for pair in chunks.windows(2) {
            assert!(pair[1].metadata.char_start < pair[0].metadata.char_end);
        }
    }

    #[test]
    fn test_multibyte_text_does_not_split_chars() {
        let text = "é".repeat(300);
        let config = ChunkingConfig::new(51, 10).with_min_chunk_size(1);
        let chunks = FixedSizeChunker::new()
            .with_word_boundaries(false)
            .chunk(&text, &config)
            .unwrap();

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.content.chars().all(|ch| ch == 'é')));
    }

    #[test]
    fn test_invalid_config() {
        let result = FixedSizeChunker::new().chunk("text", &ChunkingConfig::new(10, 10));
        assert!(result.is_err());
    }
}
