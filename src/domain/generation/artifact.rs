//! Generated artifacts and their provenance metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::ContentType;

/// Answer letters, in the order the choices must be labelled
pub const CHOICE_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// Model output that cannot be used as an artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Schema(String),
}

impl ArtifactError {
    fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }
}

/// Provenance and request echo attached to every artifact. Always built by the service;
/// anything the model writes under `metadata` is discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactMetadata {
    pub bloom_level: String,
    pub page_range: String,
    pub generated_from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tasks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fallback: bool,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_meta: Option<Value>,
    pub retrieved_chunks: usize,
    pub rag_enabled: bool,
    pub reranking: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl Default for ArtifactMetadata {
    fn default() -> Self {
        Self {
            bloom_level: String::new(),
            page_range: String::new(),
            generated_from: String::new(),
            total_questions: None,
            total_tasks: None,
            length: None,
            error: None,
            fallback: false,
            source: String::new(),
            material_meta: None,
            retrieved_chunks: 0,
            rag_enabled: false,
            reranking: String::new(),
            model: None,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub answer: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizArtifact {
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_deserializing)]
    pub metadata: ArtifactMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentTask {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub task_number: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bloom_level: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub points: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentArtifact {
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, deserialize_with = "string_list")]
    pub rubric: Vec<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub estimated_time: String,
    #[serde(default, deserialize_with = "string_list")]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub assignment_tasks: Vec<AssignmentTask>,
    #[serde(skip_deserializing)]
    pub metadata: ArtifactMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryArtifact {
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "string_list")]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub bloom_level: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub page_range: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub word_count: String,
    #[serde(skip_deserializing)]
    pub metadata: ArtifactMetadata,
}

/// One generated artifact, serialised without a type tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedArtifact {
    Quiz(QuizArtifact),
    Assignment(AssignmentArtifact),
    Summary(SummaryArtifact),
}

impl GeneratedArtifact {
    /// Parse a model's JSON payload as the given content type and check it against the
    /// artifact schema. Quiz answers are normalised to an upper-case letter.
    pub fn parse(content_type: ContentType, payload: &str) -> Result<Self, ArtifactError> {
        let mut artifact = match content_type {
            ContentType::Quiz => Self::Quiz(serde_json::from_str(payload)?),
            ContentType::Assignment => Self::Assignment(serde_json::from_str(payload)?),
            ContentType::Summary => Self::Summary(serde_json::from_str(payload)?),
        };

        if let Self::Quiz(quiz) = &mut artifact {
            for question in &mut quiz.questions {
                question.answer = question.answer.trim().to_ascii_uppercase();
            }
        }

        artifact.validate()?;
        Ok(artifact)
    }

    /// Structural checks serde cannot express
    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            Self::Quiz(quiz) => {
                if quiz.questions.is_empty() {
                    return Err(ArtifactError::schema("quiz has no questions"));
                }
                for (i, q) in quiz.questions.iter().enumerate() {
                    let n = i + 1;
                    if q.question.trim().is_empty() {
                        return Err(ArtifactError::schema(format!("question {} has no text", n)));
                    }
                    if q.choices.len() != CHOICE_LABELS.len() {
                        return Err(ArtifactError::schema(format!(
                            "question {} has {} choices, expected 4",
                            n,
                            q.choices.len()
                        )));
                    }
                    if !CHOICE_LABELS.contains(&q.answer.as_str()) {
                        return Err(ArtifactError::schema(format!(
                            "question {} answer '{}' is not one of A-D",
                            n, q.answer
                        )));
                    }
                }
            }
            Self::Assignment(assignment) => {
                if assignment.title.trim().is_empty() {
                    return Err(ArtifactError::schema("assignment has no title"));
                }
                if let Some(task) = assignment
                    .assignment_tasks
                    .iter()
                    .find(|t| t.description.trim().is_empty())
                {
                    return Err(ArtifactError::schema(format!(
                        "assignment task {} has no description",
                        task.task_number
                    )));
                }
            }
            Self::Summary(summary) => {
                if summary.content.trim().is_empty() {
                    return Err(ArtifactError::schema("summary has no content"));
                }
            }
        }

        Ok(())
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Quiz(_) => ContentType::Quiz,
            Self::Assignment(_) => ContentType::Assignment,
            Self::Summary(_) => ContentType::Summary,
        }
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        match self {
            Self::Quiz(a) => &a.metadata,
            Self::Assignment(a) => &a.metadata,
            Self::Summary(a) => &a.metadata,
        }
    }

    pub fn set_metadata(&mut self, metadata: ArtifactMetadata) {
        match self {
            Self::Quiz(a) => a.metadata = metadata,
            Self::Assignment(a) => a.metadata = metadata,
            Self::Summary(a) => a.metadata = metadata,
        }
    }

    /// Number of questions or tasks, for quiz and assignment artifacts
    pub fn item_count(&self) -> Option<usize> {
        match self {
            Self::Quiz(a) => Some(a.questions.len()),
            Self::Assignment(a) => Some(a.assignment_tasks.len()),
            Self::Summary(_) => None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().map(|n| n as u32).unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}
