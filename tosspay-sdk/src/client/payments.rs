//! Payment endpoints.

use super::request::{path_segment, required};
use super::{
    ApiError, BuilderError, HttpTransport, Method, OutboundRequest, ReqwestTransport, TossClient,
};
use crate::objects::{
    CancelPayment, KeyInPayment, PaymentConfirmData, PaymentResult, VirtualAccountRequest,
};

/// Errors of the endpoint groups ([`PaymentsApi`], [`BillingApi`](super::BillingApi), ...).
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid request: {0}")]
    Builder(#[from] BuilderError),
    #[error("unexpected response object: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Payment operations of a [`TossClient`].
#[derive(Debug)]
pub struct PaymentsApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> PaymentsApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    /// Start a confirm request whose fields are checked when it is sent.
    pub fn builder(&self) -> PaymentRequestBuilder<'a, T> {
        PaymentRequestBuilder {
            api: PaymentsApi {
                client: self.client,
            },
            payment_key: None,
            order_id: None,
            amount: None,
        }
    }

    /// Approve a payment authenticated by the checkout widget.
    pub async fn confirm(&self, data: &PaymentConfirmData) -> Result<PaymentResult, PaymentError> {
        let request = OutboundRequest::builder(Method::Post, "payments/confirm")
            .json(data)?
            .build()?;
        self.call(&request).await
    }

    pub async fn get_payment(&self, payment_key: &str) -> Result<PaymentResult, PaymentError> {
        let payment_key = path_segment("payment_key", payment_key)?;
        let request =
            OutboundRequest::builder(Method::Get, format!("payments/{payment_key}")).build()?;
        self.call(&request).await
    }

    pub async fn get_payment_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<PaymentResult, PaymentError> {
        let order_id = path_segment("order_id", order_id)?;
        let request =
            OutboundRequest::builder(Method::Get, format!("payments/orders/{order_id}")).build()?;
        self.call(&request).await
    }

    /// Cancel a payment fully, or partially when `cancel_amount` is set.
    pub async fn cancel(&self, cancel: &CancelPayment) -> Result<PaymentResult, PaymentError> {
        let payment_key = path_segment("payment_key", &cancel.payment_key)?;
        required("cancel_reason", &cancel.cancel_reason)?;
        let request =
            OutboundRequest::builder(Method::Post, format!("payments/{payment_key}/cancel"))
                .json(cancel)?
                .build()?;
        self.call(&request).await
    }

    /// Issue a virtual account for bank transfer (`POST /virtual-accounts`).
    pub async fn virtual_account(
        &self,
        account: &VirtualAccountRequest,
    ) -> Result<PaymentResult, PaymentError> {
        required("order_id", &account.order_id)?;
        required("order_name", &account.order_name)?;
        required("customer_name", &account.customer_name)?;
        required("bank", &account.bank)?;
        let request = OutboundRequest::builder(Method::Post, "virtual-accounts")
            .json(account)?
            .build()?;
        self.call(&request).await
    }

    /// Charge a card from its number, without the checkout widget.
    pub async fn key_in(&self, payment: &KeyInPayment) -> Result<PaymentResult, PaymentError> {
        required("order_id", &payment.order_id)?;
        required("order_name", &payment.order_name)?;
        for (field, value) in payment.card.required_fields() {
            required(field, value)?;
        }
        let request = OutboundRequest::builder(Method::Post, "payments/key-in")
            .json(payment)?
            .build()?;
        self.call(&request).await
    }

    async fn call(&self, request: &OutboundRequest) -> Result<PaymentResult, PaymentError> {
        let body = self.client.execute(request).await.into_result()?;
        Ok(PaymentResult::from_json(body)?)
    }
}

/// Collects the confirm fields one by one.
///
/// ```no_run
/// # async fn run(client: tosspay_sdk::client::TossClient) -> Result<(), tosspay_sdk::client::PaymentError> {
/// let payment = client
///     .payments()
///     .builder()
///     .payment_key("tgen_20240101")
///     .order_id("order-1")
///     .amount(15_000)
///     .confirm()
///     .await?;
/// assert!(payment.is_successful());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PaymentRequestBuilder<'a, T = ReqwestTransport> {
    api: PaymentsApi<'a, T>,
    payment_key: Option<String>,
    order_id: Option<String>,
    amount: Option<i64>,
}

impl<T: HttpTransport> PaymentRequestBuilder<'_, T> {
    pub fn payment_key(mut self, payment_key: impl Into<String>) -> Self {
        self.payment_key = Some(payment_key.into());
        self
    }

    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Assemble the confirm body without sending it.
    pub fn build(&self) -> Result<PaymentConfirmData, BuilderError> {
        let payment_key = self
            .payment_key
            .as_deref()
            .ok_or(BuilderError::MissingField("payment_key"))?;
        let order_id = self
            .order_id
            .as_deref()
            .ok_or(BuilderError::MissingField("order_id"))?;
        let amount = self.amount.ok_or(BuilderError::MissingField("amount"))?;
        Ok(PaymentConfirmData::new(
            required("payment_key", payment_key)?,
            required("order_id", order_id)?,
            amount,
        ))
    }

    pub async fn confirm(self) -> Result<PaymentResult, PaymentError> {
        let data = self.build()?;
        self.api.confirm(&data).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::testing::{MockTransport, mock_client as client, respond, sent_json};
    use crate::objects::{CardInfo, PaymentStatus};

    fn payment_body(status: &str) -> String {
        json!({
            "paymentKey": "pk_1",
            "orderId": "order-1",
            "orderName": "Coffee",
            "status": status,
            "totalAmount": 15000,
            "method": "CARD",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_confirm() {
        let transport = MockTransport::new(vec![respond(200, &payment_body("DONE"))]);
        let client = client(&transport);

        let payment = client
            .payments()
            .confirm(&PaymentConfirmData::new("pk_1", "order-1", 15000))
            .await
            .unwrap();

        assert!(payment.is_successful());
        assert_eq!(payment.order_name, "Coffee");
        let sent = &transport.captured_requests()[0];
        assert_eq!(sent.method, reqwest::Method::POST);
        assert_eq!(sent.url.path(), "/v2/payments/confirm");
        assert_eq!(
            sent_json(&transport, 0),
            json!({"paymentKey": "pk_1", "orderId": "order-1", "amount": 15000})
        );
    }

    #[tokio::test]
    async fn test_get_payment_paths() {
        let transport = MockTransport::new(vec![
            respond(200, &payment_body("READY")),
            respond(200, &payment_body("WAITING_FOR_DEPOSIT")),
        ]);
        let client = client(&transport);

        let by_key = client.payments().get_payment("pk_1").await.unwrap();
        let by_order = client
            .payments()
            .get_payment_by_order_id("order-1")
            .await
            .unwrap();

        assert_eq!(by_key.status, PaymentStatus::Ready);
        assert_eq!(by_order.status, PaymentStatus::WaitingForDeposit);
        let requests = transport.captured_requests();
        assert_eq!(requests[0].method, reqwest::Method::GET);
        assert_eq!(requests[0].url.path(), "/v2/payments/pk_1");
        assert_eq!(requests[1].url.path(), "/v2/payments/orders/order-1");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_cancel_sends_reason_and_amount() {
        let transport = MockTransport::new(vec![respond(200, &payment_body("PARTIAL_CANCELED"))]);
        let client = client(&transport);

        let cancel = CancelPayment::new("pk_1", "customer request").with_cancel_amount(5000);
        let payment = client.payments().cancel(&cancel).await.unwrap();

        assert!(payment.is_canceled());
        assert_eq!(
            transport.captured_requests()[0].url.path(),
            "/v2/payments/pk_1/cancel"
        );
        assert_eq!(
            sent_json(&transport, 0),
            json!({"cancelReason": "customer request", "cancelAmount": 5000})
        );
    }

    #[tokio::test]
    async fn test_empty_identifiers_are_rejected_locally() {
        let transport = MockTransport::new(vec![]);
        let client = client(&transport);

        let err = client.payments().get_payment("  ").await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("payment_key"))
        ));

        let err = client
            .payments()
            .cancel(&CancelPayment::new("pk_1", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("cancel_reason"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_virtual_account_and_key_in() {
        let transport = MockTransport::new(vec![
            respond(200, &payment_body("WAITING_FOR_DEPOSIT")),
            respond(200, &payment_body("DONE")),
        ]);
        let client = client(&transport);

        let account = VirtualAccountRequest::new(15000, "order-1", "Coffee", "Kim", "20")
            .with_valid_hours(24);
        let issued = client.payments().virtual_account(&account).await.unwrap();
        let card = CardInfo::new("4330123412341234", "28", "12", "900101");
        let paid = client
            .payments()
            .key_in(&KeyInPayment::new(15000, "order-1", "Coffee", card).with_installments(3, false))
            .await
            .unwrap();

        assert_eq!(issued.status, PaymentStatus::WaitingForDeposit);
        assert!(paid.is_successful());
        let requests = transport.captured_requests();
        assert_eq!(requests[0].url.path(), "/v2/virtual-accounts");
        assert_eq!(
            sent_json(&transport, 0),
            json!({
                "amount": 15000,
                "orderId": "order-1",
                "orderName": "Coffee",
                "customerName": "Kim",
                "bank": "20",
                "validHours": 24,
            })
        );
        assert_eq!(requests[1].url.path(), "/v2/payments/key-in");
        let key_in = sent_json(&transport, 1);
        assert_eq!(key_in["cardNumber"], "4330123412341234");
        assert_eq!(key_in["customerIdentityNumber"], "900101");
        assert_eq!(key_in["cardInstallmentPlan"], 3);
        assert_eq!(key_in["useFreeInstallmentPlan"], false);
    }

    #[tokio::test]
    async fn test_key_in_requires_card_fields() {
        let transport = MockTransport::new(vec![]);
        let client = client(&transport);

        let card = CardInfo::new("4330123412341234", "", "12", "900101");
        let err = client
            .payments()
            .key_in(&KeyInPayment::new(1000, "order-1", "Coffee", card))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("card_expiration_year"))
        ));

        let account = VirtualAccountRequest::new(1000, "order-1", "Coffee", "Kim", " ");
        let err = client.payments().virtual_account(&account).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("bank"))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_identifiers_stay_inside_their_path_segment() {
        let transport = MockTransport::new(vec![
            respond(200, &payment_body("DONE")),
            respond(200, &payment_body("DONE")),
            respond(200, &payment_body("CANCELED")),
        ]);
        let client = client(&transport);

        client
            .payments()
            .get_payment("../../v1/billing/authorizations")
            .await
            .unwrap();
        client
            .payments()
            .get_payment_by_order_id("ord?x=1#frag")
            .await
            .unwrap();
        client
            .payments()
            .cancel(&CancelPayment::new("pk/../../v1/x", "dup"))
            .await
            .unwrap();

        let requests = transport.captured_requests();
        assert_eq!(
            requests[0].url.path(),
            "/v2/payments/..%2F..%2Fv1%2Fbilling%2Fauthorizations"
        );
        assert_eq!(requests[1].url.path(), "/v2/payments/orders/ord%3Fx%3D1%23frag");
        assert_eq!(requests[1].url.query(), None);
        assert_eq!(requests[1].url.fragment(), None);
        assert_eq!(
            requests[2].url.path(),
            "/v2/payments/pk%2F..%2F..%2Fv1%2Fx/cancel"
        );
    }

    #[tokio::test]
    async fn test_dot_segment_identifiers_are_rejected() {
        let transport = MockTransport::new(vec![]);
        let client = client(&transport);

        let err = client.payments().get_payment("..").await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::InvalidPath(_))
        ));
        let err = client
            .payments()
            .get_payment_by_order_id(".")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::InvalidPath(_))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_surfaces_code() {
        let transport = MockTransport::new(vec![respond(
            400,
            r#"{"code":"ALREADY_PROCESSED_PAYMENT","message":"already processed"}"#,
        )]);
        let client = client(&transport);

        let err = client
            .payments()
            .confirm(&PaymentConfirmData::new("pk_1", "order-1", 15000))
            .await
            .unwrap_err();

        let PaymentError::Api(api) = err else {
            panic!("expected api error, got {err:?}");
        };
        assert_eq!(api.error_code(), Some("ALREADY_PROCESSED_PAYMENT"));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let transport = MockTransport::new(vec![respond(200, r#"{"paymentKey":"pk_1"}"#)]);
        let client = client(&transport);

        let err = client.payments().get_payment("pk_1").await.unwrap_err();
        assert!(matches!(err, PaymentError::Decode(_)));
    }

    #[tokio::test]
    async fn test_builder_requires_every_field() {
        let transport = MockTransport::new(vec![]);
        let client = client(&transport);

        let err = client
            .payments()
            .builder()
            .payment_key("pk_1")
            .amount(1000)
            .confirm()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("order_id"))
        ));

        let missing_amount = client.payments().builder().payment_key("pk").order_id("o");
        assert_eq!(
            missing_amount.build().unwrap_err(),
            BuilderError::MissingField("amount")
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_builder_confirm() {
        let transport = MockTransport::new(vec![respond(200, &payment_body("DONE"))]);
        let client = client(&transport);

        let payment = client
            .payments()
            .builder()
            .payment_key("pk_1")
            .order_id("order-1")
            .amount(15000)
            .confirm()
            .await
            .unwrap();

        assert_eq!(payment.total_amount, 15000);
        assert_eq!(sent_json(&transport, 0)["amount"], 15000);
    }
}
