//! Cash receipt endpoints.

use serde_json::Value;

use super::request::{path_segment, required};
use super::{HttpTransport, Method, OutboundRequest, PaymentError, ReqwestTransport, TossClient};
use crate::objects::{CancelCashReceipt, IssueCashReceipt};

/// Cash receipt operations of a [`TossClient`]. Responses are returned as
/// raw JSON.
#[derive(Debug)]
pub struct CashReceiptsApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> CashReceiptsApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    pub async fn issue(&self, receipt: &IssueCashReceipt) -> Result<Value, PaymentError> {
        required("order_id", &receipt.order_id)?;
        required("order_name", &receipt.order_name)?;
        required("customer_identity_number", &receipt.customer_identity_number)?;
        let request = OutboundRequest::builder(Method::Post, "cash-receipts")
            .json(receipt)?
            .build()?;
        self.call(&request).await
    }

    pub async fn cancel(&self, cancel: &CancelCashReceipt) -> Result<Value, PaymentError> {
        let receipt_key = path_segment("receipt_key", &cancel.receipt_key)?;
        let request =
            OutboundRequest::builder(Method::Post, format!("cash-receipts/{receipt_key}/cancel"))
                .json(cancel)?
                .build()?;
        self.call(&request).await
    }

    /// Look up receipts by the `requestId` returned when they were issued.
    pub async fn get(&self, request_id: &str) -> Result<Value, PaymentError> {
        let request = OutboundRequest::builder(Method::Get, "cash-receipts")
            .param("requestId", required("request_id", request_id)?)
            .build()?;
        self.call(&request).await
    }

    /// Receipt issued together with a payment.
    pub async fn get_by_payment_key(&self, payment_key: &str) -> Result<Value, PaymentError> {
        let payment_key = path_segment("payment_key", payment_key)?;
        let request =
            OutboundRequest::builder(Method::Get, format!("payments/{payment_key}/cash-receipt"))
                .build()?;
        self.call(&request).await
    }

    async fn call(&self, request: &OutboundRequest) -> Result<Value, PaymentError> {
        Ok(self.client.execute(request).await.into_result()?)
    }
}
