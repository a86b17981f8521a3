//! Transactions sub-client — create, look up and close partner orders.

use crate::client::PartnerClient;
use crate::config::RequestOptions;
use crate::domain::transaction::wire::{
    CreateTransactionRequest, CreateTransactionResponse, TransactionDetail,
};
use crate::domain::transaction::Channel;
use crate::error::SdkError;
use crate::request::{Operation, Params};
use crate::transport::{ApiResponse, SigningTransport};

pub struct Transactions<'a, T> {
    pub(crate) client: &'a PartnerClient<T>,
}

impl<'a, T: SigningTransport> Transactions<'a, T> {
    /// Create a transaction on `channel`.
    ///
    /// `sp_appid` and `sp_mchid` are resolved from `options`, then the
    /// partner config, and lead the body.
    pub async fn create(
        &self,
        channel: Channel,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::CreateTransaction(channel), params, options)
            .await
    }

    /// Typed variant of [`create`](Self::create).
    pub async fn create_typed(
        &self,
        channel: Channel,
        request: &CreateTransactionRequest,
        options: &RequestOptions,
    ) -> Result<CreateTransactionResponse, SdkError> {
        let params = Params::from_serialize(request)?;
        self.create(channel, &params, options).await?.json()
    }

    /// Look up an order by `transaction_id` or `out_trade_no`.
    ///
    /// When both are present the lookup goes by `transaction_id` and the
    /// other is dropped.
    pub async fn query_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::query_order_for(params), params, options)
            .await
    }

    pub async fn query_order_by_id(
        &self,
        sub_mchid: &str,
        transaction_id: &str,
        options: &RequestOptions,
    ) -> Result<TransactionDetail, SdkError> {
        let params = Params::new()
            .set("sub_mchid", sub_mchid)
            .set("transaction_id", transaction_id);
        self.query_order(&params, options).await?.json()
    }

    pub async fn query_order_by_out_trade_no(
        &self,
        sub_mchid: &str,
        out_trade_no: &str,
        options: &RequestOptions,
    ) -> Result<TransactionDetail, SdkError> {
        let params = Params::new()
            .set("sub_mchid", sub_mchid)
            .set("out_trade_no", out_trade_no);
        self.query_order(&params, options).await?.json()
    }

    /// Close an unpaid order. `out_trade_no` goes into the path.
    pub async fn close_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::CloseOrder, params, options)
            .await
    }
}
