//! Source documents: loading, extraction and page ranges

mod extracted;
mod extractor;
mod page_range;
mod store;

pub use extracted::{ExtractedDocument, PageSpan};
pub use extractor::TextExtractor;
pub use page_range::PageRange;
pub use store::DocumentStore;

#[cfg(test)]
pub use store::MockDocumentStore;
