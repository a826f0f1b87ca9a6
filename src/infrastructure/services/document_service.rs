//! Document service - download and text extraction

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::document::{DocumentStore, ExtractedDocument, TextExtractor};
use crate::domain::DomainError;

/// Loads a stored document and turns it into page-tagged text
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    extractor: Arc<dyn TextExtractor>,
    default_bucket: String,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("store", &self.store.store_name())
            .field("extractor", &self.extractor.name())
            .field("default_bucket", &self.default_bucket)
            .finish()
    }
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn TextExtractor>,
        default_bucket: impl Into<String>,
    ) -> Self {
        Self {
            store,
            extractor,
            default_bucket: default_bucket.into(),
        }
    }

    pub fn default_bucket(&self) -> &str {
        &self.default_bucket
    }

    /// Download `document_id` from `bucket` (or the default bucket) and extract its text
    pub async fn load(
        &self,
        document_id: &str,
        bucket: Option<&str>,
    ) -> Result<ExtractedDocument, DomainError> {
        let document_id = document_id.trim();
        if document_id.is_empty() {
            return Err(DomainError::validation("pdf_id must not be empty"));
        }

        let bucket = bucket
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(&self.default_bucket);

        let bytes = self.store.download(bucket, document_id).await?;
        debug!(
            document_id = document_id,
            bucket = bucket,
            bytes = bytes.len(),
            "Document downloaded"
        );

        let extractor = self.extractor.clone();
        let document = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| DomainError::internal(format!("Extraction task failed: {}", e)))??;

        info!(
            document_id = document_id,
            pages = document.page_count(),
            text_length = document.len(),
            "Document extracted"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::MockDocumentStore;
    use crate::infrastructure::extraction::PdfTextExtractor;
    use bytes::Bytes;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_load_uses_default_bucket() {
        let mut store = MockDocumentStore::new();
        store
            .expect_download()
            .with(eq("uploadFiles"), eq("notes.txt"))
            .times(1)
            .returning(|_, _| Ok(Bytes::from_static(b"Osmosis moves water across membranes")));

        let service = DocumentService::new(
            Arc::new(store),
            Arc::new(PdfTextExtractor::new()),
            "uploadFiles",
        );

        let document = service.load("notes.txt", None).await.unwrap();
        assert_eq!(document.page_count(), 1);
        assert!(document.text().contains("Osmosis"));
    }

    #[tokio::test]
    async fn test_load_honours_explicit_bucket() {
        let mut store = MockDocumentStore::new();
        store
            .expect_download()
            .with(eq("lectures"), eq("week1.txt"))
            .times(1)
            .returning(|_, _| Ok(Bytes::from_static(b"Week one")));

        let service = DocumentService::new(
            Arc::new(store),
            Arc::new(PdfTextExtractor::new()),
            "uploadFiles",
        );

        assert!(service.load("week1.txt", Some("lectures")).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_propagates_not_found() {
        let mut store = MockDocumentStore::new();
        store
            .expect_download()
            .returning(|_, id| Err(DomainError::not_found(format!("Document '{}' not found", id))));

        let service = DocumentService::new(
            Arc::new(store),
            Arc::new(PdfTextExtractor::new()),
            "uploadFiles",
        );

        let err = service.load("missing.pdf", None).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_pdf() {
        let mut store = MockDocumentStore::new();
        store
            .expect_download()
            .returning(|_, _| Ok(Bytes::from_static(b"%PDF-1.7 truncated garbage")));

        let service = DocumentService::new(
            Arc::new(store),
            Arc::new(PdfTextExtractor::new()),
            "uploadFiles",
        );

        let err = service.load("broken.pdf", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Extraction { .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_blank_id() {
        let service = DocumentService::new(
            Arc::new(MockDocumentStore::new()),
            Arc::new(PdfTextExtractor::new()),
            "uploadFiles",
        );

        let err = service.load("  ", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
