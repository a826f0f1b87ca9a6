//! Page range labels such as `1-10` or `all`

use once_cell::sync::Lazy;
use regex::Regex;

static SPAN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*(?:-\s*(\d+))?\s*$").expect("page range pattern is valid")
});

/// Interpretation of a page range label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRange {
    All,
    Span { start: usize, end: usize },
    /// Free text that is echoed but never applied
    Label(String),
}

impl PageRange {
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Self::All;
        }

        let Some(caps) = SPAN_PATTERN.captures(trimmed) else {
            return Self::Label(trimmed.to_string());
        };

        let start = caps[1].parse::<usize>().ok();
        let end = caps
            .get(2)
            .map_or(start, |m| m.as_str().parse::<usize>().ok());

        match (start, end) {
            (Some(start), Some(end)) if start <= end => Self::Span {
                start: start.max(1),
                end: end.max(1),
            },
            _ => Self::Label(trimmed.to_string()),
        }
    }
}
