//! Prompt templates for each content type

use super::{ContentType, SummaryLength};

/// Everything a template interpolates
#[derive(Debug, Clone)]
pub struct PromptInput<'a> {
    pub content_type: ContentType,
    pub query: &'a str,
    /// Retrieved context or the full document text
    pub source: &'a str,
    pub item_count: usize,
    pub page_range: &'a str,
    pub length: SummaryLength,
    pub bloom_level: &'a str,
}

/// Builds the single LLM prompt for a generation request
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render the template for `input.content_type`. Pure and deterministic.
    pub fn build(&self, input: &PromptInput<'_>) -> String {
        match input.content_type {
            ContentType::Quiz => quiz_prompt(input),
            ContentType::Assignment => assignment_prompt(input),
            ContentType::Summary => summary_prompt(input),
        }
    }
}

fn source_section(source: &str) -> String {
    if source.trim().is_empty() {
        "No source material was provided; rely on the query.".to_string()
    } else {
        source.to_string()
    }
}

fn quiz_prompt(input: &PromptInput<'_>) -> String {
    let PromptInput {
        query,
        item_count,
        page_range,
        bloom_level,
        ..
    } = *input;

    format!(
        r#"Using the source material below, write a quiz.

=== SOURCE MATERIAL ===
{source}
=== END SOURCE MATERIAL ===

Requirements:
- Write {item_count} multiple-choice questions
- Bloom's Taxonomy level: {bloom_level}
- Give each question 4 choices (A, B, C, D), each prefixed with its letter, e.g. "A: ..."
- Give the letter of the correct answer and a short explanation
- Test understanding of the material, not trivia
- Draw on content from pages {page_range}
- Keep every question at the {bloom_level} cognitive level

=== QUERY ===
{query}
=== END QUERY ===

Respond with JSON only, matching this shape:
{{
  "questions": [
    {{
      "question": "...",
      "choices": ["A: ...", "B: ...", "C: ...", "D: ..."],
      "answer": "A",
      "level": "{bloom_level}",
      "explanation": "..."
    }}
  ]
}}"#,
        source = source_section(input.source),
    )
}

fn assignment_prompt(input: &PromptInput<'_>) -> String {
    let PromptInput {
        query,
        item_count,
        page_range,
        bloom_level,
        ..
    } = *input;

    format!(
        r#"Using the source material below, write an assignment.

=== SOURCE MATERIAL ===
{source}
=== END SOURCE MATERIAL ===

Requirements:
- Write a detailed assignment with a title and clear instructions
- Bloom's Taxonomy level: {bloom_level}
- Provide a grading rubric
- State the estimated completion time and the learning objectives
- Design {item_count} assignment tasks, each with a point value
- Draw on content from pages {page_range}
- Keep every task at the {bloom_level} cognitive level

=== QUERY ===
{query}
=== END QUERY ===

Respond with JSON only, matching this shape:
{{
  "title": "...",
  "instructions": "...",
  "rubric": ["criterion 1", "criterion 2"],
  "estimated_time": "...",
  "learning_objectives": ["objective 1", "objective 2"],
  "assignment_tasks": [
    {{
      "task_number": 1,
      "description": "...",
      "bloom_level": "{bloom_level}",
      "points": "..."
    }}
  ]
}}"#,
        source = source_section(input.source),
    )
}

fn summary_prompt(input: &PromptInput<'_>) -> String {
    let PromptInput {
        query,
        page_range,
        length,
        bloom_level,
        ..
    } = *input;

    format!(
        r#"Using the source material below, write a summary.

=== SOURCE MATERIAL ===
{source}
=== END SOURCE MATERIAL ===

Requirements:
- Bloom's Taxonomy level: {bloom_level}
- Length: {length} ({guidance})
- Cover the key concepts and main ideas from pages {page_range}
- Use clear, concise language and a logical order
- Match the depth of the summary to the {bloom_level} cognitive level

=== QUERY ===
{query}
=== END QUERY ===

Respond with JSON only, matching this shape:
{{
  "title": "Summary: ...",
  "content": "...",
  "key_points": ["point 1", "point 2"],
  "length": "{length}",
  "bloom_level": "{bloom_level}",
  "page_range": "{page_range}",
  "word_count": "..."
}}"#,
        source = source_section(input.source),
        guidance = length.guidance(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(content_type: ContentType) -> PromptInput<'static> {
        PromptInput {
            content_type,
            query: "Explain photosynthesis",
            source: "--- Page 1 ---\nPlants convert light into chemical energy.",
            item_count: 3,
            page_range: "1-2",
            length: SummaryLength::Long,
            bloom_level: content_type.default_bloom_level(),
        }
    }

    #[test]
    fn test_quiz_prompt_keywords() {
        let prompt = PromptBuilder::new().build(&input(ContentType::Quiz));

        assert!(prompt.contains("multiple-choice questions"));
        assert!(prompt.contains("4 choices (A, B, C, D)"));
        assert!(prompt.contains("Write 3 multiple-choice questions"));
        assert!(prompt.contains("remember"));
        assert!(prompt.contains("pages 1-2"));
        assert!(prompt.contains("Explain photosynthesis"));
        assert!(prompt.contains("chemical energy"));
    }

    #[test]
    fn test_assignment_prompt_keywords() {
        let prompt = PromptBuilder::new().build(&input(ContentType::Assignment));

        assert!(prompt.contains("grading rubric"));
        assert!(prompt.contains("3 assignment tasks"));
        assert!(prompt.contains("level: apply"));
    }

    #[test]
    fn test_summary_prompt_keywords() {
        let prompt = PromptBuilder::new().build(&input(ContentType::Summary));

        assert!(prompt.contains("key concepts"));
        assert!(prompt.contains("Length: long"));
        assert!(prompt.contains("5+ paragraphs"));
        assert!(prompt.contains("apply"));
    }

    #[test]
    fn test_unrecognised_type_uses_assignment_template() {
        let mut parsed = input(ContentType::parse("worksheet"));
        parsed.bloom_level = "apply";
        let expected = input(ContentType::Assignment);

        assert_eq!(
            PromptBuilder::new().build(&parsed),
            PromptBuilder::new().build(&expected)
        );
    }

    #[test]
    fn test_empty_source_is_marked() {
        let mut empty = input(ContentType::Quiz);
        empty.source = "  ";
        assert!(PromptBuilder::new().build(&empty).contains("No source material"));
    }

    #[test]
    fn test_user_text_is_verbatim() {
        let mut braces = input(ContentType::Summary);
        braces.query = "What is {x}?";
        assert!(PromptBuilder::new().build(&braces).contains("What is {x}?"));
    }
}
