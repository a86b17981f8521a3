//! Request signing and response verification for the v3 API.
//!
//! ## Request
//!
//! The signed message is five newline-terminated lines:
//!
//! ```text
//! POST
//! /v3/pay/partner/transactions/native
//! 1554208460
//! 593BEC0C930BF1AFEB40B4A08C8FB242
//! {"sp_appid":"wx8888888888888888",...}
//! ```
//!
//! The body line is empty for GET. The resulting signature goes into the
//! `Authorization` header under the `WECHATPAY2-SHA256-RSA2048` schema.
//!
//! ## Response
//!
//! The platform signs `timestamp\nnonce\nbody\n` and reports the values in the
//! `Wechatpay-Timestamp`, `Wechatpay-Nonce`, `Wechatpay-Signature` and
//! `Wechatpay-Serial` headers.
//!
//! The RSA primitives live behind [`RequestSigner`] / [`ResponseVerifier`];
//! key material and certificate handling are the caller's concern.

use std::fmt;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::TransportError;
use crate::request::ResolvedRequest;

/// Authorization schema name.
pub const AUTH_SCHEMA: &str = "WECHATPAY2-SHA256-RSA2048";

pub const HEADER_TIMESTAMP: &str = "Wechatpay-Timestamp";
pub const HEADER_NONCE: &str = "Wechatpay-Nonce";
pub const HEADER_SIGNATURE: &str = "Wechatpay-Signature";
pub const HEADER_SERIAL: &str = "Wechatpay-Serial";

const NONCE_LEN: usize = 32;

/// Produces a base64 SHA256-with-RSA signature with the merchant's API key.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, message: &[u8]) -> Result<String, TransportError>;
}

/// Checks a platform signature against the certificate named by `serial_no`.
pub trait ResponseVerifier: Send + Sync {
    fn verify(&self, serial_no: &str, message: &[u8], signature: &str)
        -> Result<(), TransportError>;
}

/// Identity used to sign outgoing requests.
#[derive(Clone)]
pub struct MerchantCredentials {
    merchant_id: String,
    serial_no: String,
    signer: Arc<dyn RequestSigner>,
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("serial_no", &self.serial_no)
            .finish_non_exhaustive()
    }
}

impl MerchantCredentials {
    /// `serial_no` is the serial of the merchant API certificate whose
    /// private key `signer` holds.
    pub fn new(
        merchant_id: impl Into<String>,
        serial_no: impl Into<String>,
        signer: Arc<dyn RequestSigner>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            serial_no: serial_no.into(),
            signer,
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn serial_no(&self) -> &str {
        &self.serial_no
    }

    /// `Authorization` header value for `request`, signed now with a fresh nonce.
    pub fn authorize(&self, request: &ResolvedRequest) -> Result<String, TransportError> {
        let timestamp = chrono::Utc::now().timestamp();
        self.authorize_at(request, timestamp, &generate_nonce())
    }

    pub fn authorize_at(
        &self,
        request: &ResolvedRequest,
        timestamp: i64,
        nonce: &str,
    ) -> Result<String, TransportError> {
        let message = request_sign_message(
            request.method().as_str(),
            &request.url_path(),
            timestamp,
            nonce,
            request.signable_body().unwrap_or(""),
        );
        let signature = self.signer.sign(message.as_bytes())?;
        Ok(authorization_header(
            &self.merchant_id,
            nonce,
            &signature,
            timestamp,
            &self.serial_no,
        ))
    }
}

/// 32 random alphanumeric characters.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

pub fn request_sign_message(
    method: &str,
    url_path: &str,
    timestamp: i64,
    nonce: &str,
    body: &str,
) -> String {
    format!("{method}\n{url_path}\n{timestamp}\n{nonce}\n{body}\n")
}

pub fn response_sign_message(timestamp: &str, nonce: &str, body: &str) -> String {
    format!("{timestamp}\n{nonce}\n{body}\n")
}

pub fn authorization_header(
    merchant_id: &str,
    nonce: &str,
    signature: &str,
    timestamp: i64,
    serial_no: &str,
) -> String {
    format!(
        "{AUTH_SCHEMA} mchid=\"{merchant_id}\",nonce_str=\"{nonce}\",signature=\"{signature}\",timestamp=\"{timestamp}\",serial_no=\"{serial_no}\""
    )
}

/// Verify a response with the platform signature headers it carries.
pub fn verify_response(
    verifier: &dyn ResponseVerifier,
    headers: &[(String, String)],
    body: &str,
) -> Result<(), TransportError> {
    let header = |name: &'static str| {
        find_header(headers, name).ok_or(TransportError::MissingHeader(name))
    };
    let timestamp = header(HEADER_TIMESTAMP)?;
    let nonce = header(HEADER_NONCE)?;
    let signature = header(HEADER_SIGNATURE)?;
    let serial = header(HEADER_SERIAL)?;

    let message = response_sign_message(timestamp, nonce, body);
    verifier.verify(serial, message.as_bytes(), signature)
}

pub(crate) fn find_header<'h>(headers: &'h [(String, String)], name: &str) -> Option<&'h str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PartnerConfig, RequestOptions};
    use crate::request::{assemble, Operation, Params};
    use std::sync::Mutex;

    /// Records what it was asked to sign.
    #[derive(Default)]
    struct EchoSigner {
        seen: Mutex<Vec<String>>,
    }

    impl RequestSigner for EchoSigner {
        fn sign(&self, message: &[u8]) -> Result<String, TransportError> {
            let text = String::from_utf8_lossy(message).into_owned();
            self.seen.lock().unwrap().push(text);
            Ok("c2lnbmF0dXJl".to_string())
        }
    }

    struct ExpectSignature(&'static str);

    impl ResponseVerifier for ExpectSignature {
        fn verify(
            &self,
            _serial_no: &str,
            _message: &[u8],
            signature: &str,
        ) -> Result<(), TransportError> {
            if signature == self.0 {
                Ok(())
            } else {
                Err(TransportError::SignatureVerification("mismatch".into()))
            }
        }
    }

    fn close_order_request() -> ResolvedRequest {
        let params = Params::new()
            .set("sub_mchid", "16000008")
            .set("out_trade_no", "N3344445");
        assemble(
            Operation::CloseOrder,
            &params,
            &RequestOptions::new(),
            &PartnerConfig::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_nonce_is_32_alphanumerics() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(nonce, generate_nonce());
    }

    #[test]
    fn test_authorize_signs_body_and_formats_header() {
        let signer = Arc::new(EchoSigner::default());
        let credentials = MerchantCredentials::new("1900009191", "1DDE55AD98ED71D6EDD4A4A16996DE7B47773A8C", signer.clone());

        let header = credentials
            .authorize_at(&close_order_request(), 1554208460, "593BEC0C930BF1AFEB40B4A08C8FB242")
            .unwrap();

        assert_eq!(
            header,
            "WECHATPAY2-SHA256-RSA2048 mchid=\"1900009191\",nonce_str=\"593BEC0C930BF1AFEB40B4A08C8FB242\",signature=\"c2lnbmF0dXJl\",timestamp=\"1554208460\",serial_no=\"1DDE55AD98ED71D6EDD4A4A16996DE7B47773A8C\""
        );
        let seen = signer.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            "POST\n/v3/pay/partner/transactions/out-trade-no/N3344445/close\n1554208460\n593BEC0C930BF1AFEB40B4A08C8FB242\n{\"sub_mchid\":\"16000008\"}\n"
        );
    }

    #[test]
    fn test_get_signs_url_with_query_and_empty_body() {
        let signer = Arc::new(EchoSigner::default());
        let credentials = MerchantCredentials::new("1230000109", "SERIAL", signer.clone());
        let params = Params::new()
            .set("sub_mchid", "16000008")
            .set("transaction_id", "4323400972202104305133344444");
        let request = assemble(
            Operation::query_order_for(&params),
            &params,
            &RequestOptions::new().with_merchant_id("1230000109"),
            &PartnerConfig::new(),
        )
        .unwrap();

        credentials.authorize_at(&request, 1, "n").unwrap();

        let seen = signer.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            "GET\n/v3/pay/partner/transactions/id/4323400972202104305133344444?sub_mchid=16000008&sp_mchid=1230000109\n1\nn\n\n"
        );
    }

    #[test]
    fn test_verify_response_reads_headers_case_insensitively() {
        let headers = vec![
            ("wechatpay-timestamp".to_string(), "1554209980".to_string()),
            ("wechatpay-nonce".to_string(), "c5ac7061fccab6bf3e254dcf98995b8c".to_string()),
            ("wechatpay-signature".to_string(), "good".to_string()),
            ("wechatpay-serial".to_string(), "5157F09EFDC096DE15EBE81A47057A7232F1B8E1".to_string()),
        ];
        assert!(verify_response(&ExpectSignature("good"), &headers, "{}").is_ok());
        assert!(matches!(
            verify_response(&ExpectSignature("other"), &headers, "{}"),
            Err(TransportError::SignatureVerification(_))
        ));
    }

    #[test]
    fn test_verify_response_requires_headers() {
        let err = verify_response(&ExpectSignature("good"), &[], "{}").unwrap_err();
        assert!(matches!(err, TransportError::MissingHeader(HEADER_TIMESTAMP)));
    }

    #[test]
    fn test_credentials_debug_hides_signer() {
        let credentials = MerchantCredentials::new("1900009191", "SERIAL", Arc::new(EchoSigner::default()));
        let debug = format!("{credentials:?}");
        assert!(debug.contains("1900009191"));
        assert!(!debug.contains("signer"));
    }
}
