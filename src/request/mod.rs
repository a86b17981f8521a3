//! Request assembly — from caller parameters to a [`ResolvedRequest`].
//!
//! Assembly is a pure function of the operation, the caller's [`Params`], the
//! per-call [`RequestOptions`](crate::config::RequestOptions) and the shared
//! [`PartnerConfig`](crate::config::PartnerConfig). Nothing the caller passes
//! in is mutated; path-embedded identifiers are extracted from a copy.

pub mod assemble;
pub mod fields;
pub mod params;
pub mod payload;

pub use assemble::assemble;
pub use fields::{DefaultField, Operation, OperationDescriptor, Placement, Requirement};
pub use params::Params;

use std::fmt;

/// Content type announced for GET lookups. No body is sent; it only fixes
/// the query encoding convention.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header carrying the platform certificate serial number.
pub const PLATFORM_SERIAL_HEADER: &str = "Wechatpay-Serial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The encoded parameters. Which variant is populated follows the method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Form-encoded query string, possibly empty. Not itself signed as a body.
    Query(String),
    /// JSON body, sent as-is and used as the signing input.
    Body(String),
}

/// A fully assembled request, ready for the signing transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    operation: &'static str,
    method: Method,
    path: String,
    payload: Payload,
    extra_headers: Vec<(String, String)>,
}

impl ResolvedRequest {
    pub(crate) fn new(
        operation: &'static str,
        method: Method,
        path: String,
        payload: Payload,
        extra_headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            operation,
            method,
            path,
            payload,
            extra_headers,
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The non-empty query string of a GET lookup.
    pub fn query(&self) -> Option<&str> {
        match &self.payload {
            Payload::Query(q) if !q.is_empty() => Some(q),
            _ => None,
        }
    }

    /// Input handed to the signer for a POST body.
    pub fn signable_body(&self) -> Option<&str> {
        match &self.payload {
            Payload::Body(b) => Some(b),
            Payload::Query(_) => None,
        }
    }

    /// Bytes sent as the HTTP body. Always the same string as
    /// [`signable_body`](Self::signable_body).
    pub fn http_body(&self) -> Option<&str> {
        self.signable_body()
    }

    /// Path plus `?query` when there is one. This is the URL that gets signed.
    pub fn url_path(&self) -> String {
        match self.query() {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    /// Case-insensitive lookup of an extra header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
