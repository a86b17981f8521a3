//! `HttpTransport` — reqwest-backed [`SigningTransport`].
//!
//! Every request gets a fresh `Authorization` header. Non-2xx responses are
//! turned into [`TransportError::Status`] with the platform's
//! `{"code": .., "message": ..}` envelope parsed when present. Nothing is
//! retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::auth::{self, MerchantCredentials, ResponseVerifier};
use super::{ApiResponse, SigningTransport};
use crate::error::TransportError;
use crate::request::{Method, ResolvedRequest};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("wechatpay-partner-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Signs requests with merchant credentials and sends them with reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
    credentials: MerchantCredentials,
    verifier: Option<Arc<dyn ResponseVerifier>>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("verifies_responses", &self.verifier.is_some())
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, credentials: MerchantCredentials) -> Result<Self, TransportError> {
        Self::with_options(base_url, credentials, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    pub fn with_options(
        base_url: &str,
        credentials: MerchantCredentials,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
            verifier: None,
        })
    }

    /// Check the platform signature on every successful response.
    pub fn with_verifier(mut self, verifier: Arc<dyn ResponseVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &ResolvedRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.url_path());
        let authorization = self.credentials.authorize(request)?;

        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut req = self
            .client
            .request(method, &url)
            .header("Authorization", authorization)
            .header("Accept", "application/json");

        for (name, value) in request.extra_headers() {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.http_body() {
            req = req
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect::<Vec<_>>();
        let body = resp.text().await?;

        if !(200..300).contains(&status) {
            let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
            let (code, message) = match envelope {
                Some(ErrorEnvelope { code, message }) => {
                    (code, message.unwrap_or_else(|| body.clone()))
                }
                None => (None, body),
            };
            tracing::warn!(
                operation = request.operation(),
                status,
                code = code.as_deref().unwrap_or(""),
                "API returned an error: {}",
                message
            );
            return Err(TransportError::Status {
                status,
                code,
                message,
            });
        }

        if let Some(verifier) = &self.verifier {
            if let Err(e) = auth::verify_response(verifier.as_ref(), &headers, &body) {
                tracing::warn!(operation = request.operation(), "{}", e);
                return Err(e);
            }
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl SigningTransport for HttpTransport {
    fn execute<'a>(
        &'a self,
        request: &'a ResolvedRequest,
    ) -> impl std::future::Future<Output = Result<ApiResponse, TransportError>> + Send + 'a {
        self.send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::auth::RequestSigner;

    struct FixedSigner;

    impl RequestSigner for FixedSigner {
        fn sign(&self, _message: &[u8]) -> Result<String, TransportError> {
            Ok("sig".into())
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let credentials = MerchantCredentials::new("1900009191", "SERIAL", Arc::new(FixedSigner));
        let transport = HttpTransport::new("https://api.mch.weixin.qq.com/", credentials).unwrap();
        assert_eq!(transport.base_url(), "https://api.mch.weixin.qq.com");
    }

    #[test]
    fn test_error_envelope_parses_code_and_message() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"code":"PARAM_ERROR","message":"invalid sub_mchid"}"#).unwrap();
        assert_eq!(envelope.code.as_deref(), Some("PARAM_ERROR"));
        assert_eq!(envelope.message.as_deref(), Some("invalid sub_mchid"));
    }

    #[test]
    fn test_debug_omits_signer() {
        let credentials = MerchantCredentials::new("1900009191", "SERIAL", Arc::new(FixedSigner));
        let transport = HttpTransport::new("https://api.mch.weixin.qq.com", credentials).unwrap();
        let debug = format!("{transport:?}");
        assert!(debug.contains("verifies_responses: false"));
    }
}
