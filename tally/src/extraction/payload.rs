use std::fmt;
use std::path::Path;

use crate::error::{ErrorKind, Result, TallyError};

use super::encoding::detect_media_type;

pub const EXTRACTION_INSTRUCTION: &str = "Analyze this invoice image and provide only the final total amount. Do not include any other text, currency symbols, or explanations. Just the numerical value.";

/// Image bytes plus the media type declared (or detected) for them.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    media_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Result<Self> {
        let media_type = media_type.into().trim().to_lowercase();

        if bytes.is_empty() {
            return Err(TallyError::InvalidPayload(
                "The selected file is empty.".to_string(),
            ));
        }

        if media_type.is_empty() {
            return Err(TallyError::InvalidPayload(
                "The selected file has no media type.".to_string(),
            ));
        }

        if !media_type.starts_with("image/") {
            return Err(TallyError::InvalidPayload(format!(
                "Unsupported media type '{media_type}'. Please upload an image file."
            )));
        }

        Ok(Self { bytes, media_type })
    }

    /// Read an image from disk. The media type is taken from `media_type`
    /// when given, otherwise sniffed from the content and then the extension.
    pub async fn load(path: &Path, media_type: Option<&str>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;

        let media_type = match media_type {
            Some(declared) => declared.to_string(),
            None => detect_media_type(&bytes, Some(path)).ok_or_else(|| {
                TallyError::InvalidPayload(format!(
                    "Could not determine the image type of {}",
                    path.display()
                ))
            })?,
        };

        Self::new(bytes, media_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One call's worth of input. Consumes the payload it is built from.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    instruction: &'static str,
    image: ImagePayload,
}

impl ExtractionRequest {
    pub fn new(image: ImagePayload) -> Self {
        Self {
            instruction: EXTRACTION_INSTRUCTION,
            image,
        }
    }

    pub fn instruction(&self) -> &str {
        self.instruction
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Success { text: String },
    Failure { kind: ErrorKind, message: String },
}

impl ExtractionOutcome {
    pub fn from_error(error: &TallyError) -> Self {
        ExtractionOutcome::Failure {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success { .. })
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ExtractionOutcome::Success { .. } => None,
            ExtractionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String>> for ExtractionOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => ExtractionOutcome::Success { text },
            Err(error) => ExtractionOutcome::from_error(&error),
        }
    }
}
