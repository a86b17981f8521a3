//! Per-operation field declarations.
//!
//! Each [`Operation`] maps to a static [`OperationDescriptor`]: method, path
//! template, which keys travel in the path, which keys the remote service
//! recognizes and requires, and which account defaults get injected.

use std::borrow::Cow;

use crate::config::ConfigKey;
use crate::domain::transaction::Channel;
use crate::request::{Method, Params};

/// Where an injected default lands relative to the caller's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Before every caller field, in declaration order.
    Leading,
    /// After every caller field.
    Trailing,
}

/// Whether an unresolvable default is an error or simply left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    IfPresent,
}

/// One account-level default injected into an operation's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultField {
    pub name: &'static str,
    pub key: ConfigKey,
    pub placement: Placement,
    pub requirement: Requirement,
}

impl DefaultField {
    const fn leading(name: &'static str, key: ConfigKey) -> Self {
        Self {
            name,
            key,
            placement: Placement::Leading,
            requirement: Requirement::Required,
        }
    }

    const fn trailing(name: &'static str, key: ConfigKey, requirement: Requirement) -> Self {
        Self {
            name,
            key,
            placement: Placement::Trailing,
            requirement,
        }
    }
}

/// Static description of one API action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub method: Method,
    /// Path with `{field}` placeholders for path-embedded identifiers.
    pub path_template: Cow<'static, str>,
    /// Keys extracted from the parameters into the path, in template order.
    pub path_params: &'static [&'static str],
    /// Competing identifiers dropped without being sent.
    pub discarded: &'static [&'static str],
    /// Keys the remote service recognizes.
    pub fields: &'static [&'static str],
    /// Keys the remote service rejects the request without.
    pub required: &'static [&'static str],
    pub defaults: &'static [DefaultField],
    /// Forward [`RequestOptions::platform_serial_no`](crate::config::RequestOptions)
    /// as the `Wechatpay-Serial` header.
    pub forwards_platform_serial: bool,
    /// GET only: encode the remaining parameters as the query string. When
    /// off, the URL is the filled path alone.
    pub sends_query: bool,
}

impl OperationDescriptor {
    /// Required keys absent from `params`, in declaration order.
    pub fn missing_required(&self, params: &Params) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|key| !params.contains(key))
            .collect()
    }

    /// Caller keys this operation does not recognize.
    pub fn unrecognized<'p>(&self, params: &'p Params) -> Vec<&'p str> {
        params
            .keys()
            .filter(|key| !self.fields.contains(key) && !self.path_params.contains(key))
            .filter(|key| !self.defaults.iter().any(|d| d.name == *key))
            .collect()
    }
}

/// Every API action the client can assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTransaction(Channel),
    QueryOrderById,
    QueryOrderByOutTradeNo,
    CloseOrder,
    RequestProfitsharing,
    QueryProfitsharing,
    ReturnProfitsharing,
    QueryReturnProfitsharing,
    UnfreezeProfitsharing,
    QueryProfitsharingAmount,
    AddReceiver,
    DeleteReceiver,
}

// ── Field lists ──────────────────────────────────────────────────────────────

const CREATE_TRANSACTION_FIELDS: &[&str] = &[
    "sp_appid",
    "sp_mchid",
    "sub_appid",
    "sub_mchid",
    "description",
    "out_trade_no",
    "time_expire",
    "attach",
    "notify_url",
    "goods_tag",
    "settle_info",
    "amount",
    "payer",
    "detail",
    "scene_info",
];
const CREATE_TRANSACTION_REQUIRED: &[&str] =
    &["sub_mchid", "description", "out_trade_no", "notify_url", "amount"];
const CREATE_JSAPI_REQUIRED: &[&str] = &[
    "sub_mchid",
    "description",
    "out_trade_no",
    "notify_url",
    "amount",
    "payer",
];
const CREATE_H5_REQUIRED: &[&str] = &[
    "sub_mchid",
    "description",
    "out_trade_no",
    "notify_url",
    "amount",
    "scene_info",
];

const QUERY_ORDER_FIELDS: &[&str] = &["sp_mchid", "sub_mchid"];
const CLOSE_ORDER_FIELDS: &[&str] = &["sp_mchid", "sub_mchid"];

const REQUEST_PROFITSHARING_FIELDS: &[&str] = &[
    "appid",
    "sub_mchid",
    "sub_appid",
    "transaction_id",
    "out_order_no",
    "receivers",
    "unfreeze_unsplit",
    "out_trade_no",
];
const REQUEST_PROFITSHARING_REQUIRED: &[&str] = &[
    "sub_mchid",
    "transaction_id",
    "out_order_no",
    "receivers",
    "unfreeze_unsplit",
];

const QUERY_PROFITSHARING_FIELDS: &[&str] = &["sub_mchid", "transaction_id"];

const RETURN_PROFITSHARING_FIELDS: &[&str] = &[
    "sub_mchid",
    "order_id",
    "out_order_no",
    "out_return_no",
    "return_mchid",
    "amount",
    "description",
];
const RETURN_PROFITSHARING_REQUIRED: &[&str] = &[
    "sub_mchid",
    "out_return_no",
    "return_mchid",
    "amount",
    "description",
];

const QUERY_RETURN_PROFITSHARING_FIELDS: &[&str] = &["sub_mchid", "order_id", "out_order_no"];
const QUERY_RETURN_PROFITSHARING_REQUIRED: &[&str] = &["sub_mchid", "out_return_no"];

const UNFREEZE_FIELDS: &[&str] = &["sub_mchid", "transaction_id", "out_order_no", "description"];

const ADD_RECEIVER_FIELDS: &[&str] = &[
    "appid",
    "sub_mchid",
    "sub_appid",
    "type",
    "account",
    "name",
    "relation_type",
    "custom_relation",
];
const ADD_RECEIVER_REQUIRED: &[&str] = &["sub_mchid", "type", "account", "relation_type"];

const DELETE_RECEIVER_FIELDS: &[&str] = &["appid", "sub_mchid", "sub_appid", "type", "account"];
const DELETE_RECEIVER_REQUIRED: &[&str] = &["sub_mchid", "type", "account"];

fn create_required(channel: Channel) -> &'static [&'static str] {
    match channel {
        Channel::Jsapi | Channel::MiniProgram => CREATE_JSAPI_REQUIRED,
        Channel::H5 => CREATE_H5_REQUIRED,
        Channel::Native | Channel::App => CREATE_TRANSACTION_REQUIRED,
    }
}

// ── Defaults ─────────────────────────────────────────────────────────────────

const TRANSACTION_DEFAULTS: &[DefaultField] = &[
    DefaultField::leading("sp_appid", ConfigKey::AppId),
    DefaultField::leading("sp_mchid", ConfigKey::MerchantId),
];
const QUERY_ORDER_DEFAULTS: &[DefaultField] = &[DefaultField::trailing(
    "sp_mchid",
    ConfigKey::MerchantId,
    Requirement::Required,
)];
const CLOSE_ORDER_DEFAULTS: &[DefaultField] = &[DefaultField::trailing(
    "sp_mchid",
    ConfigKey::MerchantId,
    Requirement::IfPresent,
)];
const PROFITSHARING_APPID_DEFAULTS: &[DefaultField] =
    &[DefaultField::leading("appid", ConfigKey::AppId)];

impl Operation {
    pub fn descriptor(&self) -> OperationDescriptor {
        match self {
            Operation::CreateTransaction(channel) => OperationDescriptor {
                name: channel.operation_name(),
                method: Method::Post,
                path_template: Cow::Owned(channel.path()),
                path_params: &[],
                discarded: &[],
                fields: CREATE_TRANSACTION_FIELDS,
                required: create_required(*channel),
                defaults: TRANSACTION_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::QueryOrderById => OperationDescriptor {
                name: "query_order_by_id",
                method: Method::Get,
                path_template: Cow::Borrowed("/v3/pay/partner/transactions/id/{transaction_id}"),
                path_params: &["transaction_id"],
                discarded: &["out_trade_no"],
                fields: QUERY_ORDER_FIELDS,
                required: &["sub_mchid", "transaction_id"],
                defaults: QUERY_ORDER_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: true,
            },
            Operation::QueryOrderByOutTradeNo => OperationDescriptor {
                name: "query_order_by_out_trade_no",
                method: Method::Get,
                path_template: Cow::Borrowed(
                    "/v3/pay/partner/transactions/out-trade-no/{out_trade_no}",
                ),
                path_params: &["out_trade_no"],
                discarded: &["transaction_id"],
                fields: QUERY_ORDER_FIELDS,
                required: &["sub_mchid", "out_trade_no"],
                defaults: QUERY_ORDER_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: true,
            },
            Operation::CloseOrder => OperationDescriptor {
                name: "close_order",
                method: Method::Post,
                path_template: Cow::Borrowed(
                    "/v3/pay/partner/transactions/out-trade-no/{out_trade_no}/close",
                ),
                path_params: &["out_trade_no"],
                discarded: &[],
                fields: CLOSE_ORDER_FIELDS,
                required: &["sub_mchid", "out_trade_no"],
                defaults: CLOSE_ORDER_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::RequestProfitsharing => OperationDescriptor {
                name: "request_profitsharing",
                method: Method::Post,
                path_template: Cow::Borrowed("/v3/profitsharing/orders"),
                path_params: &[],
                discarded: &[],
                fields: REQUEST_PROFITSHARING_FIELDS,
                required: REQUEST_PROFITSHARING_REQUIRED,
                defaults: PROFITSHARING_APPID_DEFAULTS,
                forwards_platform_serial: true,
                sends_query: false,
            },
            Operation::QueryProfitsharing => OperationDescriptor {
                name: "query_profitsharing",
                method: Method::Get,
                path_template: Cow::Borrowed("/v3/profitsharing/orders/{out_order_no}"),
                path_params: &["out_order_no"],
                discarded: &[],
                fields: QUERY_PROFITSHARING_FIELDS,
                required: &["sub_mchid", "transaction_id", "out_order_no"],
                defaults: &[],
                forwards_platform_serial: false,
                sends_query: true,
            },
            Operation::ReturnProfitsharing => OperationDescriptor {
                name: "return_profitsharing",
                method: Method::Post,
                path_template: Cow::Borrowed("/v3/profitsharing/return-orders"),
                path_params: &[],
                discarded: &[],
                fields: RETURN_PROFITSHARING_FIELDS,
                required: RETURN_PROFITSHARING_REQUIRED,
                defaults: &[],
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::QueryReturnProfitsharing => OperationDescriptor {
                name: "query_return_profitsharing",
                method: Method::Get,
                path_template: Cow::Borrowed("/v3/profitsharing/return-orders/{out_return_no}"),
                path_params: &["out_return_no"],
                discarded: &[],
                fields: QUERY_RETURN_PROFITSHARING_FIELDS,
                required: QUERY_RETURN_PROFITSHARING_REQUIRED,
                defaults: &[],
                forwards_platform_serial: false,
                sends_query: true,
            },
            Operation::UnfreezeProfitsharing => OperationDescriptor {
                name: "unfreeze_profitsharing",
                method: Method::Post,
                path_template: Cow::Borrowed("/v3/profitsharing/orders/unfreeze"),
                path_params: &[],
                discarded: &[],
                fields: UNFREEZE_FIELDS,
                required: UNFREEZE_FIELDS,
                defaults: &[],
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::QueryProfitsharingAmount => OperationDescriptor {
                name: "query_profitsharing_amount",
                method: Method::Get,
                path_template: Cow::Borrowed(
                    "/v3/profitsharing/transactions/{transaction_id}/amounts",
                ),
                path_params: &["transaction_id"],
                discarded: &[],
                fields: &[],
                required: &["transaction_id"],
                defaults: &[],
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::AddReceiver => OperationDescriptor {
                name: "add_receiver",
                method: Method::Post,
                path_template: Cow::Borrowed("/v3/profitsharing/receivers/add"),
                path_params: &[],
                discarded: &[],
                fields: ADD_RECEIVER_FIELDS,
                required: ADD_RECEIVER_REQUIRED,
                defaults: PROFITSHARING_APPID_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: false,
            },
            Operation::DeleteReceiver => OperationDescriptor {
                name: "delete_receiver",
                method: Method::Post,
                path_template: Cow::Borrowed("/v3/profitsharing/receivers/delete"),
                path_params: &[],
                discarded: &[],
                fields: DELETE_RECEIVER_FIELDS,
                required: DELETE_RECEIVER_REQUIRED,
                defaults: PROFITSHARING_APPID_DEFAULTS,
                forwards_platform_serial: false,
                sends_query: false,
            },
        }
    }

    /// Pick the order lookup variant for `params`.
    ///
    /// `transaction_id` takes priority: when present, any `out_trade_no` is
    /// discarded regardless of insertion order.
    pub fn query_order_for(params: &Params) -> Operation {
        if params.contains("transaction_id") {
            Operation::QueryOrderById
        } else {
            Operation::QueryOrderByOutTradeNo
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}
