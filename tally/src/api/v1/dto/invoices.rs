use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body for `POST /v1/invoices:extract`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    /// Identifier of this extraction, also attached to its log span.
    pub extraction_id: String,
    /// The total amount exactly as the model returned it, whitespace trimmed.
    pub total: String,
    /// Media type the image was sent with.
    pub media_type: String,
    #[schema(value_type = String)]
    pub extracted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_response_uses_camel_case() {
        let response = ExtractionResponse {
            extraction_id: "abc".to_string(),
            total: "12.50".to_string(),
            media_type: "image/png".to_string(),
            extracted_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["extractionId"], "abc");
        assert_eq!(json["total"], "12.50");
        assert_eq!(json["mediaType"], "image/png");
        assert!(json["extractedAt"].is_string());
    }
}
