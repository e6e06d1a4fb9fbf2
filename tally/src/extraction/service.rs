use std::path::Path;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::GeminiConfig;
use crate::error::{Result, TallyError};
use crate::gemini::GeminiClient;

use super::{ExtractionOutcome, ExtractionRequest, ImagePayload, InferenceBackend};

enum ExtractorBackend {
    Api { backend: Arc<dyn InferenceBackend> },
    Unavailable { reason: String },
}

/// Top-level "extract total" operation.
///
/// The selected image is passed in by the caller on every invocation; the
/// extractor keeps no per-call state.
pub struct InvoiceExtractor {
    backend: ExtractorBackend,
}

impl InvoiceExtractor {
    pub fn new(config: &GeminiConfig) -> Self {
        match GeminiClient::new(config) {
            Ok(client) => {
                info!(
                    model = %config.model,
                    endpoint = %client.redacted_endpoint(),
                    max_attempts = client.retry_policy().attempts(),
                    "Gemini inference backend initialized"
                );
                Self::with_backend(Arc::new(client))
            }
            Err(e) => {
                let reason = format!("Gemini backend unavailable: {e}");
                warn!("{}", reason);
                Self::unavailable(reason)
            }
        }
    }

    pub fn with_backend(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend: ExtractorBackend::Api { backend },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: ExtractorBackend::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, ExtractorBackend::Unavailable { .. })
    }

    pub fn model(&self) -> Option<&str> {
        match &self.backend {
            ExtractorBackend::Api { backend } => Some(backend.model()),
            ExtractorBackend::Unavailable { .. } => None,
        }
    }

    /// Run one extraction and return the trimmed total.
    ///
    /// A missing image fails with `NoFileSelected` before any backend is
    /// consulted.
    pub async fn extract_total(&self, image: Option<ImagePayload>) -> Result<String> {
        let image = image.ok_or(TallyError::NoFileSelected)?;

        let backend = match &self.backend {
            ExtractorBackend::Api { backend } => backend,
            ExtractorBackend::Unavailable { reason } => {
                return Err(TallyError::Unavailable(reason.clone()));
            }
        };

        let request = ExtractionRequest::new(image);
        backend.extract(&request).await
    }

    /// Run one extraction and fold every error into a single outcome.
    pub async fn run(&self, image: Option<ImagePayload>) -> ExtractionOutcome {
        self.run_with_id(Uuid::new_v4(), image).await
    }

    /// Same as [`run`](Self::run) with a caller-chosen id on the log span.
    pub async fn run_with_id(
        &self,
        extraction_id: Uuid,
        image: Option<ImagePayload>,
    ) -> ExtractionOutcome {
        let span = info_span!(
            "extraction",
            %extraction_id,
            media_type = image.as_ref().map(|i| i.media_type().to_string()).unwrap_or_default(),
            bytes = image.as_ref().map(|i| i.bytes().len()).unwrap_or(0),
        );

        async move {
            let result = self.extract_total(image).await;
            match &result {
                Ok(text) => {
                    info!(total = %text, "Extraction succeeded");
                }
                Err(error) => {
                    tracing::error!(
                        kind = ?error.kind(),
                        upstream_status = ?error.upstream_status(),
                        error = %error,
                        "Extraction failed"
                    );
                }
            }
            ExtractionOutcome::from(result)
        }
        .instrument(span)
        .await
    }

    /// Load `path` (if any) and run one extraction. Read failures are
    /// reported as an outcome like any other error.
    pub async fn run_file(&self, path: Option<&Path>, media_type: Option<&str>) -> ExtractionOutcome {
        let image = match path {
            Some(path) => match ImagePayload::load(path, media_type).await {
                Ok(image) => Some(image),
                Err(error) => {
                    tracing::error!(path = %path.display(), error = %error, "Failed to load invoice image");
                    return ExtractionOutcome::from_error(&error);
                }
            },
            None => None,
        };

        self.run(image).await
    }
}
