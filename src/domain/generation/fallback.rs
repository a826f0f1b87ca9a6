//! Deterministic placeholder artifacts used when generation fails

use super::{
    AssignmentArtifact, AssignmentTask, ArtifactMetadata, ContentType, GeneratedArtifact,
    GenerationSettings, QuizArtifact, QuizQuestion, SummaryArtifact,
};

/// Build the placeholder artifact for a request. Same shape as a generated one; the caller
/// marks it as a fallback in its metadata.
pub fn fallback_artifact(
    content_type: ContentType,
    query: &str,
    bloom_level: &str,
    settings: &GenerationSettings,
) -> GeneratedArtifact {
    let page_range = settings.page_range.as_str();

    match content_type {
        ContentType::Quiz => GeneratedArtifact::Quiz(QuizArtifact {
            questions: (1..=settings.num_questions)
                .map(|i| QuizQuestion {
                    question: format!(
                        "Based on the material from pages {page_range}, {query} (Question {i})"
                    ),
                    choices: ["A: Option 1", "B: Option 2", "C: Option 3", "D: Option 4"]
                        .map(String::from)
                        .to_vec(),
                    answer: "A".to_string(),
                    level: bloom_level.to_string(),
                    explanation: format!("Generated from source material on pages {page_range}"),
                })
                .collect(),
            metadata: ArtifactMetadata::default(),
        }),
        ContentType::Assignment => GeneratedArtifact::Assignment(AssignmentArtifact {
            title: format!("Assignment: {query}"),
            instructions: format!(
                "Analyze and discuss the concepts from the provided material focusing on pages {page_range}."
            ),
            rubric: ["Understanding", "Analysis", "Critical Thinking"]
                .map(String::from)
                .to_vec(),
            estimated_time: "2-3 hours".to_string(),
            learning_objectives: Vec::new(),
            assignment_tasks: (1..=settings.num_questions)
                .map(|i| AssignmentTask {
                    task_number: i as u32,
                    description: format!("Task {i}: Analyze concepts from pages {page_range}"),
                    bloom_level: bloom_level.to_string(),
                    points: "10 points".to_string(),
                })
                .collect(),
            metadata: ArtifactMetadata::default(),
        }),
        ContentType::Summary => GeneratedArtifact::Summary(SummaryArtifact {
            title: format!("Summary: {query}"),
            content: format!(
                "Based on the provided material from pages {page_range}: {query}. This is a {} summary of the source material.",
                settings.length
            ),
            key_points: ["Key concept 1", "Key concept 2", "Key concept 3"]
                .map(String::from)
                .to_vec(),
            length: settings.length.to_string(),
            bloom_level: bloom_level.to_string(),
            page_range: page_range.to_string(),
            word_count: "~200 words".to_string(),
            metadata: ArtifactMetadata::default(),
        }),
    }
}
