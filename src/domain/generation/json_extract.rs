//! Locate the JSON payload in free-form model output

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";
const LINE_FENCE: &str = "\n```";

/// Return the JSON payload of a model response.
///
/// Takes the first ```` ```json ```` block, else the first ```` ``` ```` block, else the whole
/// trimmed text. A block closes at the first fence opening a line, so backticks inside JSON
/// strings survive; inline closers are accepted only when no such fence exists. A fence without
/// a closing marker yields everything after the opening one.
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        return fenced_body(&text[start + JSON_FENCE.len()..]);
    }

    if let Some(start) = text.find(FENCE) {
        return fenced_body(&text[start + FENCE.len()..]);
    }

    text.trim()
}

fn fenced_body(rest: &str) -> &str {
    match rest.find(LINE_FENCE).or_else(|| rest.find(FENCE)) {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        assert_eq!(extract_json_payload("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_json_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n[1, 2]\n```";
        assert_eq!(extract_json_payload(text), "[1, 2]");
    }

    #[test]
    fn test_json_fence_preferred_over_earlier_bare_fence() {
        let text = "```\nnot this\n```\n```json\n{\"b\": 2}\n```";
        assert_eq!(extract_json_payload(text), "{\"b\": 2}");
    }

    #[test]
    fn test_unterminated_fence() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_payload(text), "{\"a\": 1}");
    }

    #[test]
    fn test_json_fence_inside_markdown_fence() {
        let text = "```markdown\n```json\n{\"title\": \"Cells\"}\n```\n```";
        assert_eq!(extract_json_payload(text), "{\"title\": \"Cells\"}");
    }

    #[test]
    fn test_backticks_inside_json_string() {
        let text = "```json\n{\"content\": \"Run ```cargo test``` first\"}\n```";
        let payload = extract_json_payload(text);

        assert_eq!(payload, "{\"content\": \"Run ```cargo test``` first\"}");
        assert!(serde_json::from_str::<serde_json::Value>(payload).is_ok());
    }

    #[test]
    fn test_single_line_fence() {
        assert_eq!(extract_json_payload("```json {\"a\": 1} ```"), "{\"a\": 1}");
    }

    #[test]
    fn test_prose_without_json() {
        let text = "  I'm sorry, the provided text does not contain enough material for a quiz.\n";
        let payload = extract_json_payload(text);

        assert_eq!(
            payload,
            "I'm sorry, the provided text does not contain enough material for a quiz."
        );
        assert!(serde_json::from_str::<serde_json::Value>(payload).is_err());
    }
}
