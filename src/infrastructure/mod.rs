//! Infrastructure layer - adapters for external services and local persistence

pub mod embedding;
pub mod extraction;
pub mod ingestion;
pub mod llm;
pub mod object_store;
pub mod observability;
pub mod rerank;
pub mod services;
pub mod vector_store;
