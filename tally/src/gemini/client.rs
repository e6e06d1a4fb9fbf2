use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::GeminiConfig;
use crate::error::{Result, TallyError};
use crate::extraction::{decode_total, read_to_base64, ExtractionRequest, InferenceBackend};
use crate::retry::{retry_with_backoff, RetryPolicy};

use super::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| TallyError::Unavailable("API key required for Gemini".to_string()))?;

        let endpoint = build_endpoint(&config.base_url, &config.model, &api_key)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TallyError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            retry: config.retry_policy(),
        })
    }

    /// Endpoint without the credential, safe to log.
    pub fn redacted_endpoint(&self) -> String {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.to_string()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub async fn generate(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        retry_with_backoff(&self.retry, TallyError::is_retryable, move |attempt| {
            self.send_once(body, attempt)
        })
        .await
    }

    async fn send_once(
        &self,
        body: &GenerateContentRequest,
        attempt: u32,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!(
            attempt = attempt + 1,
            endpoint = %self.redacted_endpoint(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TallyError::RateLimited);
        }

        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(upstream_error(status, &bytes));
        }

        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            TallyError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        // Any JSON that lacks the expected shape decodes to an empty response.
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.redacted_endpoint())
            .field("model", &self.model)
            .field("retry", &self.retry)
            .finish()
    }
}

#[async_trait]
impl InferenceBackend for GeminiClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String> {
        let image = request.image();
        let data = read_to_base64(image.bytes()).await?;
        let body =
            GenerateContentRequest::with_inline_image(request.instruction(), image.media_type(), data);

        let response = self.generate(&body).await?;
        decode_total(&response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn build_endpoint(base_url: &str, model: &str, api_key: &str) -> Result<Url> {
    let mut endpoint = Url::parse(&format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    ))?;
    endpoint.query_pairs_mut().append_pair("key", api_key);
    Ok(endpoint)
}

// reqwest embeds the request URL (and so the key) in its Display output.
fn transport_error(error: reqwest::Error) -> TallyError {
    let error = error.without_url();
    if error.is_timeout() {
        TallyError::Transport(format!("Request to inference API timed out: {error}"))
    } else if error.is_connect() {
        TallyError::Transport(format!("Could not connect to inference API: {error}"))
    } else {
        TallyError::Transport(format!("Request to inference API failed: {error}"))
    }
}

fn upstream_error(status: StatusCode, body: &[u8]) -> TallyError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("API failed with status {}", status.as_u16()));

    TallyError::Upstream {
        status: status.as_u16(),
        message,
    }
}
