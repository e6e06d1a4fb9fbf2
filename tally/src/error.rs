use serde::Serialize;
use thiserror::Error;

pub const NO_FILE_SELECTED_MESSAGE: &str = "Please upload an invoice image first.";
pub const EMPTY_EXTRACTION_MESSAGE: &str = "Could not extract the total amount from the invoice.";

/// Coarse classification of a failed extraction, shared by every presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoFileSelected,
    InvalidPayload,
    TransportError,
    RateLimited,
    EmptyExtraction,
    Unavailable,
}

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Please upload an invoice image first.")]
    NoFileSelected,

    #[error("{0}")]
    InvalidPayload(String),

    #[error("{0}")]
    Transport(String),

    /// Non-success status other than 429. `message` is already the
    /// user-facing text (server message or generic status line).
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// A success status whose body is not JSON.
    #[error("{0}")]
    MalformedResponse(String),

    #[error("Rate limited by the inference API")]
    RateLimited,

    #[error("Could not extract the total amount from the invoice.")]
    EmptyExtraction,

    #[error("Inference unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TallyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::NoFileSelected => ErrorKind::NoFileSelected,
            TallyError::InvalidPayload(_) | TallyError::Io(_) => ErrorKind::InvalidPayload,
            TallyError::Transport(_)
            | TallyError::MalformedResponse(_)
            | TallyError::Upstream { .. } => ErrorKind::TransportError,
            TallyError::RateLimited => ErrorKind::RateLimited,
            TallyError::EmptyExtraction => ErrorKind::EmptyExtraction,
            TallyError::Unavailable(_) | TallyError::UrlParse(_) | TallyError::Internal(_) => {
                ErrorKind::Unavailable
            }
        }
    }

    /// HTTP status of an upstream error response, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            TallyError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only network-level failures and rate limiting are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TallyError::Transport(_) | TallyError::RateLimited)
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            TallyError::NoFileSelected.to_string(),
            NO_FILE_SELECTED_MESSAGE
        );
        assert_eq!(
            TallyError::EmptyExtraction.to_string(),
            EMPTY_EXTRACTION_MESSAGE
        );
        let upstream = TallyError::Upstream {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(upstream.to_string(), "boom");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(TallyError::NoFileSelected.kind(), ErrorKind::NoFileSelected);
        assert_eq!(TallyError::RateLimited.kind(), ErrorKind::RateLimited);
        assert_eq!(
            TallyError::Transport("reset".into()).kind(),
            ErrorKind::TransportError
        );
        assert_eq!(
            TallyError::Upstream {
                status: 400,
                message: "bad".into()
            }
            .kind(),
            ErrorKind::TransportError
        );
        assert_eq!(TallyError::EmptyExtraction.kind(), ErrorKind::EmptyExtraction);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(TallyError::from(io).kind(), ErrorKind::InvalidPayload);
        assert_eq!(
            TallyError::Unavailable("no key".into()).kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn test_only_transport_and_rate_limit_are_retryable() {
        assert!(TallyError::RateLimited.is_retryable());
        assert!(TallyError::Transport("timeout".into()).is_retryable());

        assert!(!TallyError::NoFileSelected.is_retryable());
        assert!(!TallyError::EmptyExtraction.is_retryable());
        assert!(!TallyError::InvalidPayload("empty".into()).is_retryable());
        assert!(!TallyError::MalformedResponse("not json".into()).is_retryable());
        assert!(!TallyError::Upstream {
            status: 500,
            message: "boom".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_malformed_response_is_a_transport_failure() {
        let error = TallyError::MalformedResponse("expected value".into());
        assert_eq!(error.kind(), ErrorKind::TransportError);
        assert_eq!(error.to_string(), "expected value");
    }

    #[test]
    fn test_upstream_status() {
        let upstream = TallyError::Upstream {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(upstream.upstream_status(), Some(503));
        assert_eq!(TallyError::RateLimited.upstream_status(), None);
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_value(ErrorKind::EmptyExtraction).expect("serialize");
        assert_eq!(json, "empty_extraction");
        let json = serde_json::to_value(ErrorKind::NoFileSelected).expect("serialize");
        assert_eq!(json, "no_file_selected");
    }
}
