use crate::error::{Result, TallyError};
use crate::gemini::types::{GenerateContentResponse, Part};

/// Pull the amount out of `candidates[0].content.parts[0].text`.
///
/// The text is trimmed; a missing or blank value is an `EmptyExtraction`,
/// never an empty success.
pub fn decode_total(response: &GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(Part::text)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(TallyError::EmptyExtraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("deserialize")
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let body = response(json!({
            "candidates": [{"content": {"parts": [{"text": "\n  1,234.56 \n"}]}}]
        }));
        assert_eq!(decode_total(&body).expect("decode"), "1,234.56");
    }

    #[test]
    fn test_decode_uses_first_candidate_and_part() {
        let body = response(json!({
            "candidates": [
                {"content": {"parts": [{"text": "99.00"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        }));
        assert_eq!(decode_total(&body).expect("decode"), "99.00");
    }

    #[test]
    fn test_missing_candidates_is_empty_extraction() {
        let body = response(json!({"promptFeedback": {"blockReason": "OTHER"}}));
        let error = decode_total(&body).expect_err("should fail");
        assert!(matches!(error, TallyError::EmptyExtraction));
        assert_eq!(
            error.to_string(),
            "Could not extract the total amount from the invoice."
        );
    }

    #[test]
    fn test_empty_candidate_list_is_empty_extraction() {
        let body = response(json!({"candidates": []}));
        assert!(matches!(
            decode_total(&body),
            Err(TallyError::EmptyExtraction)
        ));
    }

    #[test]
    fn test_candidate_without_content_is_empty_extraction() {
        let body = response(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(matches!(
            decode_total(&body),
            Err(TallyError::EmptyExtraction)
        ));
    }

    #[test]
    fn test_blank_text_is_empty_extraction() {
        let body = response(json!({
            "candidates": [{"content": {"parts": [{"text": "   \n"}]}}]
        }));
        assert!(matches!(
            decode_total(&body),
            Err(TallyError::EmptyExtraction)
        ));
    }

    #[test]
    fn test_non_text_first_part_is_empty_extraction() {
        let body = response(json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                {"text": "12.00"}
            ]}}]
        }));
        assert!(matches!(
            decode_total(&body),
            Err(TallyError::EmptyExtraction)
        ));
    }

    #[test]
    fn test_unexpected_shapes_are_empty_extraction() {
        for value in [
            json!({"candidates": [{"content": {"parts": null}}]}),
            json!({"candidates": [{"content": {"parts": {}}}]}),
            json!({"candidates": [{"content": "12.00"}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 12}]}}]}),
            json!({"candidates": [1, 2]}),
            json!({"candidates": "none"}),
        ] {
            let body = response(value.clone());
            assert!(
                matches!(decode_total(&body), Err(TallyError::EmptyExtraction)),
                "body: {value}"
            );
        }
    }
}
