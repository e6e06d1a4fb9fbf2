//! Wire types for the `generateContent` endpoint.
//!
//! Only the fields this crate reads are modelled; everything else in a
//! response is ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Falls back to the type's default when the value has an unexpected shape.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, deserialize_with = "or_default")]
    pub parts: Vec<Part>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default, deserialize_with = "or_default")]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, deserialize_with = "or_default")]
    pub content: Option<Content>,
    #[serde(default, deserialize_with = "or_default")]
    pub finish_reason: Option<String>,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl GenerateContentRequest {
    /// Single user turn: the instruction followed by the inline image.
    pub fn with_inline_image(instruction: &str, mime_type: &str, base64_data: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: instruction.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64_data,
                        },
                    },
                ],
                role: None,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request =
            GenerateContentRequest::with_inline_image("Find the total", "image/png", "AAAA".into());

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "Find the total"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_response_parses_text_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": " 42.10 \n"}]},
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 12}
        }))
        .expect("deserialize");

        let candidates = response.candidates.expect("candidates");
        let candidate = &candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let content = candidate.content.as_ref().expect("content");
        assert_eq!(content.parts[0].text(), Some(" 42.10 \n"));
    }

    #[test]
    fn test_response_tolerates_unknown_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"functionCall": {"name": "noop"}}]}}]
        }))
        .expect("deserialize");

        let candidates = response.candidates.expect("candidates");
        let part = &candidates[0].content.as_ref().expect("content").parts[0];
        assert!(matches!(part, Part::Other(_)));
        assert!(part.text().is_none());
    }

    #[test]
    fn test_null_parts_decode_as_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": null}}]
        }))
        .expect("deserialize");

        let candidates = response.candidates.expect("candidates");
        assert!(candidates[0].content.as_ref().expect("content").parts.is_empty());
    }

    #[test]
    fn test_odd_finish_reason_keeps_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "5.00"}]}, "finishReason": 7}]
        }))
        .expect("deserialize");

        let candidates = response.candidates.expect("candidates");
        assert!(candidates[0].finish_reason.is_none());
        let content = candidates[0].content.as_ref().expect("content");
        assert_eq!(content.parts[0].text(), Some("5.00"));
    }

    #[test]
    fn test_error_body_parses_message() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        }))
        .expect("deserialize");

        let detail = body.error.expect("error detail");
        assert_eq!(detail.code, Some(400));
        assert_eq!(detail.message.as_deref(), Some("API key not valid."));
        assert_eq!(detail.status.as_deref(), Some("INVALID_ARGUMENT"));
    }
}
