//! # WeChat Pay partner SDK
//!
//! A typed Rust client for the WeChat Pay v3 service-provider (partner) API:
//! transaction creation, order lookup and close, and profit-sharing.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Configuration, errors, domain enums and wire types
//! 2. **Request assembly** — Per-operation field rules, default injection,
//!    canonical query / body encoding
//! 3. **Transport** — `SigningTransport` trait, request signing, reqwest-backed `HttpTransport`
//! 4. **High-Level Client** — `PartnerClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wechatpay_partner::prelude::*;
//!
//! let client = PartnerClient::builder()
//!     .config(PartnerConfig::from_env())
//!     .credentials(MerchantCredentials::new("1230000109", serial_no, signer))
//!     .build()?;
//!
//! let params = Params::new()
//!     .set("sub_mchid", "1900000109")
//!     .set("out_trade_no", "1217752501201407033233368018");
//! client.transactions().close_order(&params, &RequestOptions::new()).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Account defaults and per-call overrides.
pub mod config;

/// Domain modules (vertical slices): enums, wire types, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Request assembly ────────────────────────────────────────────────

/// Operation descriptors, parameter maps and the assembler.
pub mod request;

// ── Layer 3: Transport ───────────────────────────────────────────────────────

/// Signing transport trait and the HTTP implementation.
pub mod transport;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `PartnerClient` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigKey, PartnerConfig, RequestOptions};

    // Domain types — transaction
    pub use crate::domain::transaction::wire::{
        Amount, CreateTransactionRequest, CreateTransactionResponse, Payer, SceneInfo,
        SettleInfo, TradeState, TransactionDetail,
    };
    pub use crate::domain::transaction::Channel;

    // Domain types — profit-sharing
    pub use crate::domain::profitsharing::{
        AddReceiverRequest, OrderState, ProfitsharingOrder, ProfitsharingRequest, Receiver,
        ReceiverResponse, ReceiverType, RelationType, ReturnOrder, ReturnRequest, SplitResult,
        SplittableAmount,
    };

    // Errors
    pub use crate::error::{SdkError, SdkResult, TransportError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Request assembly
    pub use crate::request::{Method, Operation, Params, Payload, ResolvedRequest};

    // Transport
    pub use crate::transport::auth::{MerchantCredentials, RequestSigner, ResponseVerifier};
    pub use crate::transport::{ApiResponse, SigningTransport};
    #[cfg(feature = "http")]
    pub use crate::transport::http::HttpTransport;

    // Client + sub-clients
    pub use crate::client::{PartnerClient, ProfitsharingClient, TransactionsClient};
    #[cfg(feature = "http")]
    pub use crate::client::PartnerClientBuilder;
}
