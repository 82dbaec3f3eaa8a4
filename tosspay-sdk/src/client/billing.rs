//! Billing endpoints: billing key issuance and recurring charges.

use super::request::{path_segment, required};
use super::{HttpTransport, Method, OutboundRequest, PaymentError, ReqwestTransport, TossClient};
use crate::objects::{BillingCharge, BillingKey, CardAuthorization, PaymentResult};

/// Billing operations of a [`TossClient`].
#[derive(Debug)]
pub struct BillingApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> BillingApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    /// Issue a billing key directly from card details.
    pub async fn authorize_card(
        &self,
        authorization: &CardAuthorization,
    ) -> Result<BillingKey, PaymentError> {
        required("customer_key", &authorization.customer_key)?;
        for (field, value) in authorization.card.required_fields() {
            required(field, value)?;
        }
        let request = OutboundRequest::builder(Method::Post, "billing/authorizations/card")
            .json(authorization)?
            .build()?;
        let body = self.client.execute(&request).await.into_result()?;
        Ok(BillingKey::from_json(body)?)
    }

    /// Exchange the `authKey` from the billing auth widget for a billing key.
    pub async fn issue_billing_key(
        &self,
        auth_key: &str,
        customer_key: &str,
    ) -> Result<BillingKey, PaymentError> {
        let request = OutboundRequest::builder(Method::Post, "billing/authorizations/issue")
            .param("authKey", required("auth_key", auth_key)?)
            .param("customerKey", required("customer_key", customer_key)?)
            .build()?;
        let body = self.client.execute(&request).await.into_result()?;
        Ok(BillingKey::from_json(body)?)
    }

    /// Charge the card behind a billing key.
    pub async fn charge(&self, charge: &BillingCharge) -> Result<PaymentResult, PaymentError> {
        let billing_key = path_segment("billing_key", &charge.billing_key)?;
        required("customer_key", &charge.customer_key)?;
        required("order_id", &charge.order_id)?;
        required("order_name", &charge.order_name)?;
        let request = OutboundRequest::builder(Method::Post, format!("billing/{billing_key}"))
            .json(charge)?
            .build()?;
        let body = self.client.execute(&request).await.into_result()?;
        Ok(PaymentResult::from_json(body)?)
    }
}
