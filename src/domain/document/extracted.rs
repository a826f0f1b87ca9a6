//! Extracted document text with page boundaries

use serde::Serialize;

use super::PageRange;

/// Byte span of one page inside the tagged document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSpan {
    /// 1-based page number
    pub number: usize,
    pub start: usize,
    pub end: usize,
}

/// Plain text of a document, tagged with `--- Page N ---` markers.
///
/// Held only for the duration of one request.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    text: String,
    pages: Vec<PageSpan>,
    has_content: bool,
}

impl ExtractedDocument {
    /// Build a document from per-page text
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut spans = Vec::new();
        let mut has_content = false;

        for (idx, page) in pages.into_iter().enumerate() {
            let page = page.as_ref().trim();
            has_content |= !page.is_empty();

            if !text.is_empty() {
                text.push_str("\n\n");
            }

            let start = text.len();
            text.push_str(&page_marker(idx + 1));
            text.push('\n');
            text.push_str(page);

            spans.push(PageSpan {
                number: idx + 1,
                start,
                end: text.len(),
            });
        }

        Self {
            text,
            pages: spans,
            has_content,
        }
    }

    /// Build a single-page document from plain text
    pub fn plain(text: impl AsRef<str>) -> Self {
        Self::from_pages([text])
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pages(&self) -> &[PageSpan] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when no page carries any non-whitespace text
    pub fn is_blank(&self) -> bool {
        !self.has_content
    }

    /// Text of the pages selected by `range`.
    ///
    /// Spans are clamped to the real page count; ranges that select nothing and
    /// non-numeric labels return the whole document.
    pub fn select_pages(&self, range: &PageRange) -> &str {
        let PageRange::Span { start, end } = *range else {
            return &self.text;
        };

        let first = self.pages.iter().find(|p| p.number >= start && p.number <= end);
        let last = self.pages.iter().rev().find(|p| p.number >= start && p.number <= end);

        match (first, last) {
            (Some(first), Some(last)) => &self.text[first.start..last.end],
            _ => &self.text,
        }
    }
}

fn page_marker(number: usize) -> String {
    format!("--- Page {} ---", number)
}
