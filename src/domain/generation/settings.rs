//! Free-form generation settings, normalised

use serde_json::Value;

use super::{ContentType, SummaryLength};

pub const DEFAULT_NUM_QUESTIONS: usize = 5;
pub const MAX_NUM_QUESTIONS: usize = 50;

/// Recognised settings with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub num_questions: usize,
    pub page_range: String,
    pub length: SummaryLength,
    pub bloom_level: Option<String>,
}

impl GenerationSettings {
    pub fn new(default_page_range: impl Into<String>) -> Self {
        Self {
            num_questions: DEFAULT_NUM_QUESTIONS,
            page_range: default_page_range.into(),
            length: SummaryLength::default(),
            bloom_level: None,
        }
    }

    /// Read the recognised keys out of a request's `settings` object. Unknown keys and
    /// values of the wrong shape are ignored.
    pub fn from_json(settings: Option<&Value>, default_page_range: &str) -> Self {
        let mut parsed = Self::new(default_page_range);

        let Some(map) = settings.and_then(Value::as_object) else {
            return parsed;
        };

        if let Some(n) = map.get("num_questions").and_then(positive_integer) {
            parsed.num_questions = n.min(MAX_NUM_QUESTIONS);
        }

        match map.get("page_range") {
            Some(Value::String(s)) if !s.trim().is_empty() => parsed.page_range = s.trim().to_string(),
            Some(Value::Number(n)) => parsed.page_range = n.to_string(),
            _ => {}
        }

        if let Some(length) = map.get("length").and_then(Value::as_str) {
            parsed.length = SummaryLength::parse(length);
        }

        if let Some(level) = map.get("bloom_level").and_then(Value::as_str) {
            if !level.trim().is_empty() {
                parsed.bloom_level = Some(level.trim().to_string());
            }
        }

        parsed
    }

    /// Cognitive level: explicit request field, then settings, then the type's default
    pub fn resolve_bloom_level(&self, explicit: Option<&str>, content_type: ContentType) -> String {
        explicit
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.bloom_level.as_deref())
            .unwrap_or_else(|| content_type.default_bloom_level())
            .to_string()
    }
}

fn positive_integer(value: &Value) -> Option<usize> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };

    (n > 0).then_some(n as usize)
}
