use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally API",
        version = "1.0.0",
        description = "Reads the total amount from an invoice image using a hosted multimodal model.",
    ),
    paths(
        handlers::health::health_check,
        handlers::invoices::extract_invoice,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        dto::invoices::ExtractionResponse,
        handlers::health::HealthData,
        handlers::health::InferenceStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "invoices", description = "Invoice total extraction"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
