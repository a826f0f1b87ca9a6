//! Kinds of generated content and their defaults

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller asked to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Quiz,
    Assignment,
    Summary,
}

impl ContentType {
    /// Parse a request's `type` field. Anything unrecognised is treated as an assignment.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "quiz" => Self::Quiz,
            "summary" => Self::Summary,
            _ => Self::Assignment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Assignment => "assignment",
            Self::Summary => "summary",
        }
    }

    /// Cognitive level used when the request names none
    pub fn default_bloom_level(&self) -> &'static str {
        match self {
            Self::Quiz => "remember",
            Self::Assignment | Self::Summary => "apply",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested summary length class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Unknown values fall back to medium
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Size guidance given to the model
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Short => "1-2 paragraphs, focus on main points only",
            Self::Medium => "3-4 paragraphs, include key details and examples",
            Self::Long => "5+ paragraphs, comprehensive coverage with detailed analysis",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
