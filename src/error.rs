//! Error taxonomy for the scorefetch pipeline.
//!
//! Errors are tagged by stage so callers can branch on kind:
//!
//! - [`Error::Configuration`] — missing input or credentials, raised before
//!   any network call
//! - [`Error::Resolution`] — PURL lookup failures
//! - [`Error::Fetch`] — scorecard retrieval failures (REST or BigQuery)
//! - [`Error::Serialization`] — output encoding or write failures

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing required input or credentials. Always raised before any
    /// network call is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// PURL lookup failed (transport, unexpected status, or decode).
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Scorecard retrieval failed (transport, unexpected status, or decode).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Output encoding or write failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_kind() {
        let err = Error::Configuration("credentials file is required".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: credentials file is required"
        );

        let err = Error::Fetch("unexpected status code 500".to_string());
        assert!(err.to_string().starts_with("fetch error:"));
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
