//! Document chunking domain types and traits

pub mod chunker;

pub use chunker::{
    finalize_chunks, Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, ChunkingType,
};
