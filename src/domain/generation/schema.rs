//! JSON schemas requested from the model for structured output

use serde_json::{json, Value};

use super::ContentType;

/// Schema name sent alongside the schema
pub fn schema_name(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Quiz => "quiz",
        ContentType::Assignment => "assignment",
        ContentType::Summary => "summary",
    }
}

/// Output schema for a content type. Metadata is not part of it; the service adds it.
pub fn json_schema(content_type: ContentType) -> Value {
    match content_type {
        ContentType::Quiz => json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": {"type": "string"},
                            "choices": {
                                "type": "array",
                                "items": {"type": "string"},
                                "minItems": 4,
                                "maxItems": 4
                            },
                            "answer": {"type": "string"},
                            "level": {"type": "string"},
                            "explanation": {"type": "string"}
                        },
                        "required": ["question", "choices", "answer", "level", "explanation"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["questions"],
            "additionalProperties": false
        }),
        ContentType::Assignment => json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "instructions": {"type": "string"},
                "rubric": {"type": "array", "items": {"type": "string"}},
                "estimated_time": {"type": "string"},
                "learning_objectives": {"type": "array", "items": {"type": "string"}},
                "assignment_tasks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "task_number": {"type": "integer"},
                            "description": {"type": "string"},
                            "bloom_level": {"type": "string"},
                            "points": {"type": "string"}
                        },
                        "required": ["task_number", "description", "bloom_level", "points"],
                        "additionalProperties": false
                    }
                }
            },
            "required": [
                "title",
                "instructions",
                "rubric",
                "estimated_time",
                "learning_objectives",
                "assignment_tasks"
            ],
            "additionalProperties": false
        }),
        ContentType::Summary => json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "content": {"type": "string"},
                "key_points": {"type": "array", "items": {"type": "string"}},
                "length": {"type": "string"},
                "bloom_level": {"type": "string"},
                "page_range": {"type": "string"},
                "word_count": {"type": "string"}
            },
            "required": [
                "title",
                "content",
                "key_points",
                "length",
                "bloom_level",
                "page_range",
                "word_count"
            ],
            "additionalProperties": false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_require_core_fields() {
        let quiz = json_schema(ContentType::Quiz);
        assert_eq!(quiz["required"][0], "questions");

        let summary = json_schema(ContentType::Summary);
        assert!(summary["required"]
            .as_array()
            .unwrap()
            .contains(&Value::from("word_count")));

        assert_eq!(schema_name(ContentType::Assignment), "assignment");
    }
}
