//! Invoice extraction handler for the v1 API.

use std::path::Path;

use axum::extract::{Multipart, State};
use chrono::Utc;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::v1::dto::ExtractionResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::error::TallyError;
use crate::extraction::{detect_media_type, ExtractionOutcome, ImagePayload};

const BUSY_MESSAGE: &str = "An extraction is already in progress";

/// `POST /api/v1/invoices:extract`
///
/// Accepts a multipart form with a single `file` field holding the invoice
/// image and returns the total read from it. Only one extraction runs at a
/// time; a second request with a file while one is running gets 409.
#[utoipa::path(
    post,
    path = "/api/v1/invoices:extract",
    tag = "invoices",
    operation_id = "invoices.extract",
    request_body(content_type = "multipart/form-data", content = String, description = "Invoice image in the `file` field"),
    responses(
        (status = 200, description = "Total extracted", body = ExtractionResponse),
        (status = 400, description = "No file selected or not an image", body = ApiError),
        (status = 409, description = "Another extraction is running", body = ApiError),
        (status = 422, description = "The model returned no total", body = ApiError),
        (status = 429, description = "Inference API rate limit persisted after retries", body = ApiError),
        (status = 501, description = "Inference is not configured", body = ApiError),
        (status = 502, description = "Inference API failed", body = ApiError),
    )
)]
pub async fn extract_invoice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<ExtractionResponse> {
    let mut image: Option<ImagePayload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Invalid multipart body: {e}"),
                );
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let declared = field.content_type().map(str::to_string);

        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(e) => {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Failed to read file: {e}"),
                );
            }
        };

        // Browsers send an empty, unnamed part when no file was chosen.
        if bytes.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
            continue;
        }

        let media_type = resolve_media_type(declared.as_deref(), &bytes, file_name.as_deref());
        image = match ImagePayload::new(bytes.to_vec(), media_type) {
            Ok(payload) => Some(payload),
            Err(e) => return e.into(),
        };
    }

    // A missing file is reported even while the gate is busy.
    let Some(image) = image else {
        return TallyError::NoFileSelected.into();
    };

    let Some(_permit) = state.gate.try_enter() else {
        tracing::warn!("Rejected extraction request while another is running");
        return ApiResponse::error(ErrorCode::Conflict, BUSY_MESSAGE);
    };

    let extraction_id = Uuid::new_v4();
    let media_type = image.media_type().to_string();

    match state.extractor.run_with_id(extraction_id, Some(image)).await {
        ExtractionOutcome::Success { text } => ApiResponse::success(ExtractionResponse {
            extraction_id: extraction_id.to_string(),
            total: text,
            media_type,
            extracted_at: Utc::now(),
        }),
        ExtractionOutcome::Failure { kind, message } => ApiResponse::error(kind.into(), message),
    }
}

fn resolve_media_type(declared: Option<&str>, bytes: &[u8], file_name: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && !ct.eq_ignore_ascii_case("application/octet-stream") => {
            ct.to_string()
        }
        _ => detect_media_type(bytes, file_name.map(Path::new))
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_image_type_wins() {
        assert_eq!(
            resolve_media_type(Some("image/webp"), b"anything", Some("a.png")),
            "image/webp"
        );
    }

    #[test]
    fn octet_stream_is_sniffed() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(
            resolve_media_type(Some("application/octet-stream"), &jpeg, None),
            "image/jpeg"
        );
        assert_eq!(resolve_media_type(None, b"???", Some("scan.png")), "image/png");
    }

    #[test]
    fn unknown_content_stays_octet_stream() {
        assert_eq!(
            resolve_media_type(None, b"plain text", Some("notes.txt")),
            "application/octet-stream"
        );
    }
}
