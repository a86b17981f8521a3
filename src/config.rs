//! Account-level defaults and their resolution order.
//!
//! [`PartnerConfig`] holds the service provider's default app id and merchant
//! id. It is built once at startup, handed to the client, and only ever read
//! afterwards. Per-call [`RequestOptions`] take priority over it.

use std::fmt;

use crate::error::SdkError;

/// Environment variable read by [`PartnerConfig::from_env`] for the app id.
pub const ENV_APP_ID: &str = "WECHATPAY_APP_ID";

/// Environment variable read by [`PartnerConfig::from_env`] for the merchant id.
pub const ENV_MERCHANT_ID: &str = "WECHATPAY_MCH_ID";

/// Which account-level default a field resolves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    AppId,
    MerchantId,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppId => "app id",
            Self::MerchantId => "merchant id",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default account identifiers shared by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerConfig {
    default_app_id: Option<String>,
    default_merchant_id: Option<String>,
}

impl PartnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read defaults from `WECHATPAY_APP_ID` / `WECHATPAY_MCH_ID`.
    ///
    /// Unset or empty variables leave the corresponding default absent.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            default_app_id: read(ENV_APP_ID),
            default_merchant_id: read(ENV_MERCHANT_ID),
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.default_app_id = Some(app_id.into());
        self
    }

    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.default_merchant_id = Some(merchant_id.into());
        self
    }

    pub fn app_id(&self) -> Option<&str> {
        self.default_app_id.as_deref()
    }

    pub fn merchant_id(&self) -> Option<&str> {
        self.default_merchant_id.as_deref()
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::AppId => self.app_id(),
            ConfigKey::MerchantId => self.merchant_id(),
        }
    }

    /// The explicit value when given, otherwise the configured default.
    pub fn resolve(&self, explicit: Option<&str>, key: ConfigKey) -> Option<String> {
        explicit.or_else(|| self.get(key)).map(str::to_string)
    }

    /// Like [`resolve`](Self::resolve), but absence is an error.
    pub fn require(&self, explicit: Option<&str>, key: ConfigKey) -> Result<String, SdkError> {
        self.resolve(explicit, key)
            .ok_or(SdkError::ConfigurationMissing(key))
    }
}

/// Per-call overrides. Borrowed for the duration of one call, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub app_id: Option<String>,
    pub merchant_id: Option<String>,
    /// Serial number of the platform certificate used to encrypt sensitive
    /// receiver fields. Sent as `Wechatpay-Serial` where the API needs it.
    pub platform_serial_no: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_merchant_id(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = Some(merchant_id.into());
        self
    }

    pub fn with_platform_serial_no(mut self, serial_no: impl Into<String>) -> Self {
        self.platform_serial_no = Some(serial_no.into());
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::AppId => self.app_id.as_deref(),
            ConfigKey::MerchantId => self.merchant_id.as_deref(),
        }
    }
}
