//! Profit-sharing sub-client.
//!
//! Only the split request, add-receiver and delete-receiver get an `appid`
//! default. Returns, unfreezes and lookups take exactly what the caller
//! passes; `sub_mchid` is never filled in.

use crate::client::PartnerClient;
use crate::config::RequestOptions;
use crate::domain::profitsharing::wire::{
    AddReceiverRequest, ProfitsharingOrder, ProfitsharingRequest, ReceiverResponse, ReturnOrder,
    ReturnRequest, SplittableAmount,
};
use crate::error::SdkError;
use crate::request::{Operation, Params};
use crate::transport::{ApiResponse, SigningTransport};

pub struct Profitsharing<'a, T> {
    pub(crate) client: &'a PartnerClient<T>,
}

impl<'a, T: SigningTransport> Profitsharing<'a, T> {
    /// Split funds of a settled transaction.
    ///
    /// Receiver names must be encrypted already; pass the serial of the
    /// encrypting certificate in `options.platform_serial_no`.
    pub async fn request_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::RequestProfitsharing, params, options)
            .await
    }

    pub async fn request_order_typed(
        &self,
        request: &ProfitsharingRequest,
        options: &RequestOptions,
    ) -> Result<ProfitsharingOrder, SdkError> {
        let params = Params::from_serialize(request)?;
        self.request_order(&params, options).await?.json()
    }

    /// `out_order_no` goes into the path.
    pub async fn query_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::QueryProfitsharing, params, options)
            .await
    }

    pub async fn return_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::ReturnProfitsharing, params, options)
            .await
    }

    pub async fn return_order_typed(
        &self,
        request: &ReturnRequest,
        options: &RequestOptions,
    ) -> Result<ReturnOrder, SdkError> {
        let params = Params::from_serialize(request)?;
        self.return_order(&params, options).await?.json()
    }

    /// `out_return_no` goes into the path.
    pub async fn query_return_order(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::QueryReturnProfitsharing, params, options)
            .await
    }

    /// Release whatever is still frozen on a transaction.
    pub async fn unfreeze(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::UnfreezeProfitsharing, params, options)
            .await
    }

    /// `transaction_id` goes into the path; nothing else is sent.
    pub async fn query_amounts(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::QueryProfitsharingAmount, params, options)
            .await
    }

    pub async fn remaining_amount(
        &self,
        transaction_id: &str,
        options: &RequestOptions,
    ) -> Result<SplittableAmount, SdkError> {
        let params = Params::new().set("transaction_id", transaction_id);
        self.query_amounts(&params, options).await?.json()
    }

    pub async fn add_receiver(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::AddReceiver, params, options)
            .await
    }

    pub async fn add_receiver_typed(
        &self,
        request: &AddReceiverRequest,
        options: &RequestOptions,
    ) -> Result<ReceiverResponse, SdkError> {
        let params = Params::from_serialize(request)?;
        self.add_receiver(&params, options).await?.json()
    }

    pub async fn delete_receiver(
        &self,
        params: &Params,
        options: &RequestOptions,
    ) -> Result<ApiResponse, SdkError> {
        self.client
            .execute(Operation::DeleteReceiver, params, options)
            .await
    }
}
