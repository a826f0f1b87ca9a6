//! Content generation domain: artifact types, prompts and fallbacks

pub mod artifact;
pub mod content_type;
pub mod fallback;
pub mod json_extract;
pub mod prompt;
pub mod schema;
pub mod settings;

pub use artifact::{
    ArtifactError, ArtifactMetadata, AssignmentArtifact, AssignmentTask, GeneratedArtifact,
    QuizArtifact, QuizQuestion, SummaryArtifact, CHOICE_LABELS,
};
pub use content_type::{ContentType, SummaryLength};
pub use fallback::fallback_artifact;
pub use json_extract::extract_json_payload;
pub use prompt::{PromptBuilder, PromptInput};
pub use schema::{json_schema, schema_name};
pub use settings::GenerationSettings;
