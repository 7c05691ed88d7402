//! Response normalization: raw provider text in, validated planning out.
//!
//! Applied uniformly to every vendor's reply. All vendor quirks the
//! normalizer has to absorb are textual (markdown fencing); structural quirks
//! (content-block wrapping) are already gone by the time the clients hand
//! text over.

use planner_core::planning::{GeneratedPlanning, ProviderKind};

use crate::error::AiError;

/// Parse and validate a raw provider reply.
///
/// Failures are terminal: no retry, no partial recovery, no field-level
/// salvage. The offending raw content is logged here for diagnostics and is
/// never carried in the returned error.
pub fn normalize(raw: &str, provider: ProviderKind) -> Result<GeneratedPlanning, AiError> {
    let cleaned = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!(%provider, raw, "AI response is not valid JSON");
        AiError::InvalidFormat(format!("response is not valid JSON: {e}"))
    })?;

    GeneratedPlanning::from_value(&value).map_err(|reason| {
        tracing::error!(%provider, raw, %reason, "AI response failed schema validation");
        AiError::InvalidFormat(reason)
    })
}

/// Remove markdown code fencing some vendors wrap JSON in.
///
/// Only replies that open with a fence are touched; for those, every
/// ```` ```json ```` and ```` ``` ```` marker in the text is removed.
/// Idempotent: stripping already-stripped text is a no-op.
fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```json") {
        trimmed.replace("```json", "").replace("```", "").trim().to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROVIDER: ProviderKind = ProviderKind::Openai;

    fn valid_json() -> String {
        json!({
            "weeklyAbstract": "Recursion and sorting.",
            "learningObjectives": ["Understand recursion"],
            "questions": [
                {"questionText": "What is a base case?", "difficulty": "easy", "estimatedTime": 5}
            ],
            "assessmentMethods": [
                {"methodName": "Quick Quiz", "description": "Short quiz.", "duration": 10}
            ]
        })
        .to_string()
    }

    #[test]
    fn test_unfenced_reply_normalizes() {
        let planning = normalize(&valid_json(), PROVIDER).expect("should normalize");
        assert_eq!(planning.questions.len(), 1);
    }

    #[test]
    fn test_fenced_reply_matches_unfenced() {
        let plain = normalize(&valid_json(), PROVIDER).expect("should normalize");

        let fenced = format!("```json\n{}\n```", valid_json());
        let from_fenced = normalize(&fenced, PROVIDER).expect("should normalize");
        assert_eq!(plain, from_fenced);

        let bare_fence = format!("```\n{}\n```", valid_json());
        let from_bare = normalize(&bare_fence, PROVIDER).expect("should normalize");
        assert_eq!(plain, from_bare);
    }

    #[test]
    fn test_fence_stripping_idempotent() {
        let fenced = format!("```json\n{}\n```", valid_json());
        let once = strip_code_fences(&fenced);
        let twice = strip_code_fences(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unparseable_reply_is_format_error() {
        let err = normalize("I'm sorry, I can't produce JSON here.", PROVIDER).unwrap_err();
        assert!(matches!(err, AiError::InvalidFormat(_)));
    }

    #[test]
    fn test_schema_violations_are_format_errors() {
        // Empty abstract.
        let mut v: serde_json::Value = serde_json::from_str(&valid_json()).unwrap();
        v["weeklyAbstract"] = json!("");
        assert!(matches!(
            normalize(&v.to_string(), PROVIDER),
            Err(AiError::InvalidFormat(_))
        ));

        // Empty questions array.
        let mut v: serde_json::Value = serde_json::from_str(&valid_json()).unwrap();
        v["questions"] = json!([]);
        assert!(matches!(
            normalize(&v.to_string(), PROVIDER),
            Err(AiError::InvalidFormat(_))
        ));

        // Question missing estimatedTime.
        let mut v: serde_json::Value = serde_json::from_str(&valid_json()).unwrap();
        v["questions"][0].as_object_mut().unwrap().remove("estimatedTime");
        assert!(matches!(
            normalize(&v.to_string(), PROVIDER),
            Err(AiError::InvalidFormat(_))
        ));

        // Assessment duration as a string.
        let mut v: serde_json::Value = serde_json::from_str(&valid_json()).unwrap();
        v["assessmentMethods"][0]["duration"] = json!("10");
        assert!(matches!(
            normalize(&v.to_string(), PROVIDER),
            Err(AiError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let padded = format!("\n\n  {}  \n", valid_json());
        assert!(normalize(&padded, PROVIDER).is_ok());
    }
}
