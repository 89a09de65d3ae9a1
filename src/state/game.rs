//! Helpers over question payloads shared by gameplay, lifelines and practice mode.

use tracing::warn;

use crate::dao::models::{QuestionEntity, QuestionId};

const TOKEN_SEPARATORS: [char; 3] = [':', '.', ')'];

/// Decode a serialized JSON string array of options.
///
/// Absent payloads decode to an empty list; malformed ones too, with a warning.
pub fn parse_options(question_id: QuestionId, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(options) => options,
        Err(err) => {
            warn!(question_id, error = %err, "malformed options payload; treating as empty");
            Vec::new()
        }
    }
}

/// Options of a question, in stored order.
pub fn question_options(question: &QuestionEntity) -> Vec<String> {
    parse_options(question.id, question.options.as_deref())
}

/// Localized options of a question, or `None` when the question has none stored.
pub fn localized_options(question: &QuestionEntity) -> Option<Vec<String>> {
    question
        .localized_options
        .as_deref()
        .map(|raw| parse_options(question.id, Some(raw)))
}

/// Short label identifying an option: `"B"` for `"B: Paris"` or `"B) Paris"`.
///
/// Falls back to the first whitespace-delimited word when no separator is present.
pub fn leading_token(option: &str) -> &str {
    let trimmed = option.trim();
    match trimmed.find(TOKEN_SEPARATORS) {
        Some(end) => trimmed[..end].trim(),
        None => trimmed.split_whitespace().next().unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_token_handles_separators() {
        assert_eq!(leading_token("A: Tokyo"), "A");
        assert_eq!(leading_token(" B ) Kyoto"), "B");
        assert_eq!(leading_token("C. Osaka"), "C");
        assert_eq!(leading_token("Nagoya city"), "Nagoya");
        assert_eq!(leading_token("   "), "");
    }

    #[test]
    fn options_decode_or_fall_back_to_empty() {
        assert_eq!(
            parse_options(1, Some(r#"["A: x","B: y"]"#)),
            vec!["A: x".to_string(), "B: y".to_string()]
        );
        assert!(parse_options(1, Some("not json")).is_empty());
        assert!(parse_options(1, Some(r#"{"a":1}"#)).is_empty());
        assert!(parse_options(1, None).is_empty());
    }
}
