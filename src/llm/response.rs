use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::models::{Category, CategoryFailure, CategoryOutcome, CategoryResult};

/// Extract the first balanced `{...}` span from free-form model output.
///
/// The scan is string-aware: braces inside JSON string literals (and escaped
/// quotes inside them) do not affect nesting. Returns None when no balanced
/// object is found.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse raw model output into a typed category result.
///
/// Never fails: output without a parseable JSON object degrades to
/// `CategoryResult::Failure` carrying the raw text. Within a parsed response,
/// each `messages` entry resolves independently: a structured payload wins
/// over error markers on the same entry, entries with markers but no payload
/// become per-message failures, and entries with neither stay absent.
pub fn parse_category_response<T: DeserializeOwned>(
    category: Category,
    raw: &str,
) -> CategoryResult<T> {
    let Some(span) = extract_json_object(raw) else {
        warn!("No JSON object found in {} response", category);
        return CategoryResult::Failure(CategoryFailure::unparseable(
            raw,
            "no JSON object found in response",
        ));
    };

    let value: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not parse JSON response for {}: {}", category, e);
            return CategoryResult::Failure(CategoryFailure::unparseable(raw, e.to_string()));
        }
    };

    let entries = match value.get("messages").and_then(Value::as_array) {
        Some(entries) => entries,
        // A parsed object without a messages array carries no per-message
        // data; the merger leaves every position absent.
        None => return CategoryResult::Success { messages: vec![] },
    };

    let messages = entries
        .iter()
        .map(|entry| resolve_entry(category, entry))
        .collect();

    CategoryResult::Success { messages }
}

fn resolve_entry<T: DeserializeOwned>(category: Category, entry: &Value) -> CategoryOutcome<T> {
    if let Some(payload_value) = entry.get(category.as_str()) {
        match serde_json::from_value::<T>(payload_value.clone()) {
            Ok(payload) => return CategoryOutcome::Present(payload),
            Err(e) => {
                // Payload key present but malformed: a per-message failure,
                // keeping whatever the model produced.
                return CategoryOutcome::Failed(CategoryFailure::unparseable(
                    payload_value.to_string(),
                    format!("malformed {} payload: {}", category, e),
                ));
            }
        }
    }

    let error = entry.get("error").and_then(Value::as_str);
    let raw_response = entry.get("raw_response").and_then(Value::as_str);
    if error.is_some() || raw_response.is_some() {
        return CategoryOutcome::Failed(CategoryFailure {
            raw_response: raw_response.map(str::to_string),
            error: error.map(str::to_string),
        });
    }

    CategoryOutcome::Absent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RubricPayload, SentimentPayload};

    #[test]
    fn test_extract_simple_object() {
        let text = "Here is the result:\n{\"a\": 1}\nthanks";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_nested_object() {
        let text = "{\"outer\": {\"inner\": {}}} trailing {\"second\": 2}";
        assert_eq!(extract_json_object(text), Some("{\"outer\": {\"inner\": {}}}"));
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let text = r#"{"label": "a } inside", "next": "\" {"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_no_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("unbalanced { forever"), None);
    }

    #[test]
    fn test_parse_sentiment_success() {
        let raw = r#"Sure! {"messages": [
            {"speaker": "Speaker A", "text": "hi", "sentiment": {"label": "positive", "explanation": "greeting"}},
            {"speaker": "Speaker B", "text": "why", "sentiment": {"label": "neutral"}}
        ]}"#;
        let result: CategoryResult<SentimentPayload> =
            parse_category_response(Category::Sentiment, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].payload().unwrap().label, "positive");
        assert_eq!(messages[1].payload().unwrap().label, "neutral");
    }

    #[test]
    fn test_parse_unparseable_returns_failure() {
        let raw = "I cannot produce JSON for this transcript.";
        let result: CategoryResult<SentimentPayload> =
            parse_category_response(Category::Sentiment, raw);
        let CategoryResult::Failure(failure) = result else {
            panic!("expected failure");
        };
        assert_eq!(failure.raw_response.as_deref(), Some(raw));
        assert!(failure.error.is_some());
    }

    #[test]
    fn test_parse_invalid_json_returns_failure() {
        let raw = r#"{"messages": [}"#;
        let result: CategoryResult<SentimentPayload> =
            parse_category_response(Category::Sentiment, raw);
        assert!(result.is_failure());
    }

    #[test]
    fn test_parse_missing_messages_is_empty_success() {
        let raw = r#"{"summary": "all fine"}"#;
        let result: CategoryResult<SentimentPayload> =
            parse_category_response(Category::Sentiment, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        assert!(messages.is_empty());
    }

    #[test]
    fn test_entry_payload_wins_over_error_marker() {
        let raw = r#"{"messages": [
            {"sentiment": {"label": "negative"}, "error": "ignored"}
        ]}"#;
        let result: CategoryResult<SentimentPayload> =
            parse_category_response(Category::Sentiment, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        assert_eq!(messages[0].payload().unwrap().label, "negative");
    }

    #[test]
    fn test_entry_error_marker_becomes_per_message_failure() {
        let raw = r#"{"messages": [
            {"speaker": "Speaker A", "error": "could not judge"}
        ]}"#;
        let result: CategoryResult<RubricPayload> = parse_category_response(Category::Fast, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        let CategoryOutcome::Failed(failure) = &messages[0] else {
            panic!("expected per-message failure");
        };
        assert_eq!(failure.error.as_deref(), Some("could not judge"));
    }

    #[test]
    fn test_entry_without_payload_or_marker_is_absent() {
        let raw = r#"{"messages": [{"speaker": "Speaker A", "text": "hi"}]}"#;
        let result: CategoryResult<RubricPayload> =
            parse_category_response(Category::DearMan, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        assert!(messages[0].is_absent());
    }

    #[test]
    fn test_parse_rubric_breakdown() {
        let raw = r#"{"messages": [
            {"dear_man": {"score": 3, "breakdown": {
                "describe": {"adhered": true, "explanation": "factual"},
                "express": {"adhered": false}
            }}}
        ]}"#;
        let result: CategoryResult<RubricPayload> =
            parse_category_response(Category::DearMan, raw);
        let CategoryResult::Success { messages } = result else {
            panic!("expected success");
        };
        let payload = messages[0].payload().unwrap();
        assert_eq!(payload.score, 3.0);
        assert!(payload.breakdown["describe"].adhered);
        assert!(!payload.breakdown["express"].adhered);
    }
}
