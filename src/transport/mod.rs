//! Transport layer — the seam between assembled requests and the wire.
//!
//! The client hands a [`ResolvedRequest`] to a [`SigningTransport`], which
//! signs it, sends it and returns the raw [`ApiResponse`]. Assembly never
//! depends on what happens here; the default implementation is
//! [`HttpTransport`](http::HttpTransport) behind the `http` feature.

pub mod auth;
#[cfg(feature = "http")]
pub mod http;

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::{SdkError, TransportError};
use crate::request::ResolvedRequest;

/// Signs and sends a resolved request.
///
/// Implementations must send [`ResolvedRequest::http_body`] byte-for-byte as
/// the HTTP body, since that is the exact string the signature covers.
pub trait SigningTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a ResolvedRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send + 'a;
}

/// A successful response as received, before any typed decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        auth::find_header(&self.headers, name)
    }

    /// 204 responses (close order, unfreeze with nothing left) carry no body.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Decode the body into a wire type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, SdkError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
