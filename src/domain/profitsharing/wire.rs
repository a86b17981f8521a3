//! Wire types for profit-sharing orders, returns and receivers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiverType {
    MerchantId,
    PersonalOpenid,
    PersonalSubOpenid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    ServiceProvider,
    Store,
    Staff,
    StoreOwner,
    Partner,
    Headquarter,
    Brand,
    Distributor,
    User,
    Supplier,
    Custom,
}

/// One split in a profit-sharing request.
///
/// `name` must already be encrypted with the platform certificate whose
/// serial goes in `RequestOptions::platform_serial_no`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(rename = "type")]
    pub kind: ReceiverType,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub amount: i64,
    pub description: String,
}

/// Caller fields of a profit-sharing request. `appid` is injected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitsharingRequest {
    pub sub_mchid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_appid: Option<String>,
    pub transaction_id: String,
    pub out_order_no: String,
    pub receivers: Vec<Receiver>,
    pub unfreeze_unsplit: bool,
}

/// Caller fields of a profit-sharing return. Nothing is injected: the
/// caller names every merchant explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub sub_mchid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_order_no: Option<String>,
    pub out_return_no: String,
    pub return_mchid: String,
    pub amount: i64,
    pub description: String,
}

/// Caller fields of add-receiver. `appid` is injected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReceiverRequest {
    pub sub_mchid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_appid: Option<String>,
    #[serde(rename = "type")]
    pub kind: ReceiverType,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_relation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Processing,
    Finished,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitResult {
    Pending,
    Success,
    Closed,
    Processing,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverResult {
    #[serde(rename = "type")]
    pub kind: ReceiverType,
    pub account: String,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub result: SplitResult,
    #[serde(default)]
    pub fail_reason: Option<String>,
    #[serde(default)]
    pub detail_id: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
}

/// Response of the profit-sharing request, query and unfreeze endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitsharingOrder {
    pub sub_mchid: String,
    pub transaction_id: String,
    pub out_order_no: String,
    pub order_id: String,
    pub state: OrderState,
    #[serde(default)]
    pub receivers: Vec<ReceiverResult>,
}

/// Response of the return and return-query endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnOrder {
    pub sub_mchid: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub out_order_no: Option<String>,
    pub out_return_no: String,
    #[serde(default)]
    pub return_id: Option<String>,
    pub return_mchid: String,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub result: SplitResult,
    #[serde(default)]
    pub fail_reason: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub finish_time: Option<String>,
}

/// Response of the remaining-splittable-amount lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplittableAmount {
    pub transaction_id: String,
    pub unsplit_amount: i64,
}

/// Response of add/delete receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverResponse {
    pub sub_mchid: String,
    #[serde(rename = "type")]
    pub kind: ReceiverType,
    pub account: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub relation_type: Option<RelationType>,
    #[serde(default)]
    pub custom_relation: Option<String>,
}
