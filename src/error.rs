//! Unified SDK error types.

use thiserror::Error;

use crate::config::ConfigKey;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    /// A required default could not be resolved from the request options or
    /// the partner configuration. Raised before any transport call.
    #[error("Configuration missing: no {0} in request options or partner config")]
    ConfigurationMissing(ConfigKey),

    #[error("Missing path parameter `{0}`")]
    MissingPathParam(&'static str),

    #[error("{operation}: missing required fields {fields:?}")]
    MissingFields {
        operation: &'static str,
        fields: Vec<&'static str>,
    },

    /// Amounts are integers in minor currency units; floats are never sent.
    #[error("Non-integer number at `{0}`")]
    NonIntegerNumber(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Merchant credentials are required to build an HTTP client")]
    MissingCredentials,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Query encoding error: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

/// Errors raised by a [`SigningTransport`](crate::transport::SigningTransport).
///
/// The request assembler never inspects these; they surface unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Response signature verification failed: {0}")]
    SignatureVerification(String),

    #[error("Missing response header `{0}`")]
    MissingHeader(&'static str),
}

impl TransportError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            #[cfg(feature = "http")]
            TransportError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
