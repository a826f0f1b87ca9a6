//! PDF text extraction backed by `pdf-extract`

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::domain::document::{ExtractedDocument, TextExtractor};
use crate::domain::DomainError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Page-aware extractor. Inputs without a PDF header that are valid UTF-8 are treated as
/// a single page of plain text.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(bytes: &[u8]) -> Result<Vec<String>, DomainError> {
        // pdf-extract panics on some malformed inputs
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(DomainError::extraction(format!("Failed to read PDF: {}", e))),
            Err(_) => Err(DomainError::extraction("Failed to read PDF: malformed document")),
        }
    }
}

fn is_pdf(bytes: &[u8]) -> bool {
    // the header may be preceded by a little garbage
    bytes
        .iter()
        .take(1024)
        .position(|&b| b == b'%')
        .is_some_and(|pos| bytes[pos..].starts_with(PDF_MAGIC))
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedDocument, DomainError> {
        if bytes.is_empty() {
            return Err(DomainError::extraction("Document is empty"));
        }

        if !is_pdf(bytes) {
            let text = std::str::from_utf8(bytes).map_err(|_| {
                DomainError::extraction("Document is neither a PDF nor UTF-8 text")
            })?;
            debug!(bytes = bytes.len(), "Treating non-PDF input as plain text");
            return Ok(ExtractedDocument::plain(text));
        }

        let pages = Self::extract_pdf(bytes)?;
        debug!(pages = pages.len(), "Extracted PDF text");

        Ok(ExtractedDocument::from_pages(pages))
    }

    fn name(&self) -> &'static str {
        "pdf-extract"
    }
}
