//! Text extraction contract

use std::fmt::Debug;

use super::ExtractedDocument;
use crate::domain::DomainError;

/// Converts raw document bytes into page-tagged text.
///
/// Implementations are synchronous and CPU bound; callers run them on a blocking thread.
pub trait TextExtractor: Send + Sync + Debug {
    /// Extract text, failing with `DomainError::Extraction` on unreadable input
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, DomainError>;

    /// Get the extractor name
    fn name(&self) -> &'static str;
}
