//! Recursive chunking strategy

use std::collections::VecDeque;
use std::ops::Range;

use crate::domain::ingestion::{
    chunker::helpers, Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy,
};
use crate::domain::DomainError;

/// Separators tried in order; the empty separator splits by characters
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Splits on the coarsest separator that yields pieces within `chunk_size`, then merges
/// adjacent pieces back into chunks, carrying up to `chunk_overlap` bytes of trailing
/// pieces into the next chunk
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    separators: Vec<String>,
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self::with_separators(DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_separators(separators: Vec<String>) -> Self {
        Self { separators }
    }

    /// Contiguous byte ranges covering `range`, each at most `chunk_size` long
    fn split(&self, text: &str, range: Range<usize>, level: usize, chunk_size: usize) -> Vec<Range<usize>> {
        if range.len() <= chunk_size {
            return vec![range];
        }

        let Some(separator) = self.separators.get(level).filter(|s| !s.is_empty()) else {
            return split_by_chars(text, range, chunk_size);
        };

        let slice = &text[range.clone()];
        let mut pieces = Vec::new();
        let mut piece_start = range.start;

        for (offset, matched) in slice.match_indices(separator.as_str()) {
            let piece_end = range.start + offset + matched.len();
            if piece_end > piece_start {
                pieces.push(piece_start..piece_end);
            }
            piece_start = piece_end;
        }

        if piece_start < range.end {
            pieces.push(piece_start..range.end);
        }

        if pieces.len() <= 1 {
            return self.split(text, range, level + 1, chunk_size);
        }

        pieces
            .into_iter()
            .flat_map(|piece| self.split(text, piece, level + 1, chunk_size))
            .collect()
    }
}

fn split_by_chars(text: &str, range: Range<usize>, chunk_size: usize) -> Vec<Range<usize>> {
    let mut result = Vec::new();
    let mut start = range.start;

    while start < range.end {
        let mut end = helpers::floor_char_boundary(text, (start + chunk_size).min(range.end));
        if end <= start {
            end = helpers::ceil_char_boundary(text, start + 1);
        }
        result.push(start..end);
        start = end;
    }

    result
}

/// Merge consecutive pieces into windows of at most `chunk_size`, keeping trailing pieces
/// of at most `chunk_overlap` bytes as the head of the next window
fn merge(pieces: Vec<Range<usize>>, config: &ChunkingConfig) -> Vec<Range<usize>> {
    let mut windows = Vec::new();
    let mut current: VecDeque<Range<usize>> = VecDeque::new();
    let mut total = 0;

    for piece in pieces {
        let len = piece.len();

        if total + len > config.chunk_size && !current.is_empty() {
            if let (Some(first), Some(last)) = (current.front(), current.back()) {
                windows.push(first.start..last.end);
            }

            while total > config.chunk_overlap || (total + len > config.chunk_size && total > 0) {
                match current.pop_front() {
                    Some(dropped) => total -= dropped.len(),
                    None => break,
                }
            }
        }

        total += len;
        current.push_back(piece);
    }

    if let (Some(first), Some(last)) = (current.front(), current.back()) {
        windows.push(first.start..last.end);
    }

    windows
}

impl ChunkingStrategy for RecursiveChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let content = content.trim();

        if content.is_empty() {
            return Ok(vec![]);
        }

        let pieces = self.split(content, 0..content.len(), 0, config.chunk_size);

        let mut chunks: Vec<Chunk> = Vec::new();
        for window in merge(pieces, config) {
            let raw = &content[window.clone()];
            let leading = raw.len() - raw.trim_start().len();
            let text = raw.trim();

            if text.is_empty() || text.len() < config.min_chunk_size {
                continue;
            }

            let start = window.start + leading;
            chunks.push(Chunk::new(
                text,
                ChunkMetadata::new(chunks.len(), 0, start, start + text.len()),
            ));
        }

        if chunks.is_empty() {
            chunks.push(Chunk::new(content, ChunkMetadata::new(0, 1, 0, content.len())));
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.metadata.total_chunks = total;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "recursive"
    }
}
