//! Transactions — create, query and close partner orders.

pub mod client;
pub mod wire;

use std::fmt;
use std::str::FromStr;

/// Endpoint family shared by every create-transaction channel.
pub const TRANSACTIONS_PATH: &str = "/v3/pay/partner/transactions";

/// Payment channel for transaction creation.
///
/// Every channel shares one endpoint family and differs only in the path
/// suffix. Mini-programs pay through the JSAPI endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Native,
    Jsapi,
    App,
    H5,
    MiniProgram,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Native,
        Channel::Jsapi,
        Channel::App,
        Channel::H5,
        Channel::MiniProgram,
    ];

    /// Path segment under [`TRANSACTIONS_PATH`].
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Jsapi | Self::MiniProgram => "jsapi",
            Self::App => "app",
            Self::H5 => "h5",
        }
    }

    /// Full create-transaction path for this channel.
    pub fn path(&self) -> String {
        format!("{TRANSACTIONS_PATH}/{}", self.suffix())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Jsapi => "jsapi",
            Self::App => "app",
            Self::H5 => "h5",
            Self::MiniProgram => "miniprogram",
        }
    }

    pub(crate) fn operation_name(&self) -> &'static str {
        match self {
            Self::Native => "create_transaction_native",
            Self::Jsapi => "create_transaction_jsapi",
            Self::App => "create_transaction_app",
            Self::H5 => "create_transaction_h5",
            Self::MiniProgram => "create_transaction_miniprogram",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "jsapi" | "js" => Ok(Self::Jsapi),
            "app" => Ok(Self::App),
            "h5" => Ok(Self::H5),
            "miniprogram" | "mini_program" => Ok(Self::MiniProgram),
            other => Err(format!("unknown payment channel: {other}")),
        }
    }
}
