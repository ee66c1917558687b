//! Error types for a JSON round trip.
//!
//! # Design
//! Each variant maps to one stage of the exchange: building the request,
//! moving bytes over the network, judging the status, and reading/decoding
//! the body. `FetchError::kind` folds them into the four coarse kinds
//! callers usually branch on. Nothing is retried; every error is returned
//! as-is to the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Coarse classification of a `FetchError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built.
    Construction,
    /// Connect, TLS, send, or timeout failure.
    Transport,
    /// A response arrived with a status outside `200..300`.
    UnexpectedStatus,
    /// The response body could not be read or decoded.
    Decode,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Malformed URL, header name, or header value.
    #[error("failed to create request: {0}")]
    Construction(String),

    #[error("failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[source] ureq::Error),

    /// The body of the response is discarded and never decoded.
    #[error("invalid response: status code {status}")]
    UnexpectedStatus { status: u16 },

    #[error("failed to read response body: {0}")]
    ReadBody(#[source] ureq::Error),

    #[error("failed to unmarshal JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Construction(_) | FetchError::Serialize(_) => ErrorKind::Construction,
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            FetchError::ReadBody(_) | FetchError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// True when the round trip was abandoned because the timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(ureq::Error::Timeout(_)) | FetchError::ReadBody(ureq::Error::Timeout(_))
        )
    }

    /// The status code carried by `UnexpectedStatus`.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_reports_code() {
        let err = FetchError::UnexpectedStatus { status: 404 };
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "invalid response: status code 404");
        assert!(!err.is_timeout());
    }

    #[test]
    fn decode_error_keeps_parser_diagnostic() {
        let source = serde_json::from_slice::<serde_json::Value>(b"not-json").unwrap_err();
        let err = FetchError::Decode(source);
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("failed to unmarshal JSON: "));
        assert!(err.to_string().contains("line 1 column"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn serialize_failure_is_a_construction_error() {
        let source = serde_json::to_vec(&std::collections::HashMap::from([(vec![1u8], 1)])).unwrap_err();
        assert_eq!(FetchError::Serialize(source).kind(), ErrorKind::Construction);
        assert_eq!(FetchError::Construction("bad uri".into()).kind(), ErrorKind::Construction);
    }

    #[test]
    fn timeout_is_a_transport_error() {
        let err = FetchError::Transport(ureq::Error::Timeout(ureq::Timeout::Global));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.is_timeout());
    }
}
