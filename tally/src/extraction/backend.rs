use async_trait::async_trait;

use crate::error::Result;

use super::ExtractionRequest;

/// A remote model that turns an [`ExtractionRequest`] into the decoded,
/// trimmed total. Implementations own their retry behaviour.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<String>;

    /// Model identifier, for health reporting and logs.
    fn model(&self) -> &str;
}
