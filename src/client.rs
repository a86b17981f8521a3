//! High-level client — `PartnerClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared configuration and the single
//! assemble-then-send path every operation goes through.

use std::sync::Arc;

use crate::config::{PartnerConfig, RequestOptions};
use crate::domain::profitsharing::client::Profitsharing;
use crate::domain::transaction::client::Transactions;
use crate::error::SdkError;
use crate::request::{self, Operation, Params, ResolvedRequest};
use crate::transport::{ApiResponse, SigningTransport};

#[cfg(feature = "http")]
use crate::transport::auth::{MerchantCredentials, ResponseVerifier};
#[cfg(feature = "http")]
use crate::transport::http::{HttpTransport, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
#[cfg(feature = "http")]
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::profitsharing::client::Profitsharing as ProfitsharingClient;
pub use crate::domain::transaction::client::Transactions as TransactionsClient;

/// The primary entry point.
///
/// Provides nested sub-client accessors for each domain:
/// `client.transactions()`, `client.profitsharing()`.
pub struct PartnerClient<T> {
    pub(crate) config: Arc<PartnerConfig>,
    pub(crate) transport: Arc<T>,
    pub(crate) validate_required: bool,
}

#[cfg(feature = "http")]
impl PartnerClient<HttpTransport> {
    pub fn builder() -> PartnerClientBuilder {
        PartnerClientBuilder::default()
    }
}

impl<T: SigningTransport> PartnerClient<T> {
    /// Build a client over any transport. Required-field validation is off.
    pub fn with_transport(config: PartnerConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
            validate_required: false,
        }
    }

    /// Reject requests missing a field the remote service requires, before
    /// anything is sent.
    pub fn validate_required(mut self, enabled: bool) -> Self {
        self.validate_required = enabled;
        self
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn transactions(&self) -> Transactions<'_, T> {
        Transactions { client: self }
    }

    pub fn profitsharing(&self) -> Profitsharing<'_, T> {
        Profitsharing { client: self }
    }

    pub fn config(&self) -> &PartnerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `operation` without sending it.
    pub fn assemble(
        &self,
        operation: Operation,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ResolvedRequest, SdkError> {
        let descriptor = operation.descriptor();

        if self.validate_required {
            let missing = descriptor.missing_required(params);
            if !missing.is_empty() {
                return Err(SdkError::MissingFields {
                    operation: descriptor.name,
                    fields: missing,
                });
            }
        }

        let unrecognized = descriptor.unrecognized(params);
        if !unrecognized.is_empty() {
            tracing::debug!(
                operation = descriptor.name,
                fields = ?unrecognized,
                "Passing through fields the API does not document"
            );
        }

        request::assemble(operation, params, options, &self.config)
    }

    /// Assemble `operation` and hand it to the transport.
    ///
    /// Assembly failures return before the transport is touched.
    pub async fn execute(
        &self,
        operation: Operation,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        let request = self.assemble(operation, params, options)?;
        let response = self.transport.execute(&request).await?;
        tracing::debug!(
            operation = request.operation(),
            status = response.status,
            "Request completed"
        );
        Ok(response)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PartnerClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerClient")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("validate_required", &self.validate_required)
            .finish()
    }
}

impl<T> Clone for PartnerClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
            validate_required: self.validate_required,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "http")]
pub struct PartnerClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    config: PartnerConfig,
    credentials: Option<MerchantCredentials>,
    verifier: Option<Arc<dyn ResponseVerifier>>,
    validate_required: bool,
}

#[cfg(feature = "http")]
impl Default for PartnerClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            config: PartnerConfig::default(),
            credentials: None,
            verifier: None,
            validate_required: false,
        }
    }
}

#[cfg(feature = "http")]
impl PartnerClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Account defaults injected into requests.
    pub fn config(mut self, config: PartnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credentials(mut self, credentials: MerchantCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn ResponseVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn validate_required(mut self, enabled: bool) -> Self {
        self.validate_required = enabled;
        self
    }

    pub fn build(self) -> Result<PartnerClient<HttpTransport>, SdkError> {
        let credentials = self.credentials.ok_or(SdkError::MissingCredentials)?;
        let mut transport = HttpTransport::with_options(
            &self.base_url,
            credentials,
            self.timeout,
            &self.user_agent,
        )?;
        if let Some(verifier) = self.verifier {
            transport = transport.with_verifier(verifier);
        }

        Ok(PartnerClient::with_transport(self.config, transport)
            .validate_required(self.validate_required))
    }
}
