//! Payment request and response objects.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created, no payment method selected yet.
    Ready,
    /// Payment method authenticated, awaiting approval.
    InProgress,
    /// Virtual account issued, awaiting deposit.
    WaitingForDeposit,
    Done,
    Canceled,
    PartialCanceled,
    /// Approval failed.
    Aborted,
    /// Not approved within the 30 minute validity window.
    Expired,
}

impl PaymentStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentStatus::Done)
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, PaymentStatus::Canceled | PaymentStatus::PartialCanceled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PaymentStatus::Aborted | PaymentStatus::Expired)
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Ready | PaymentStatus::InProgress | PaymentStatus::WaitingForDeposit
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Ready => write!(f, "READY"),
            PaymentStatus::InProgress => write!(f, "IN_PROGRESS"),
            PaymentStatus::WaitingForDeposit => write!(f, "WAITING_FOR_DEPOSIT"),
            PaymentStatus::Done => write!(f, "DONE"),
            PaymentStatus::Canceled => write!(f, "CANCELED"),
            PaymentStatus::PartialCanceled => write!(f, "PARTIAL_CANCELED"),
            PaymentStatus::Aborted => write!(f, "ABORTED"),
            PaymentStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Accepts an amount sent either as a JSON number or a numeric string.
fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(i64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Request body for `POST /payments/confirm`.
///
/// Sent by the merchant backend after the checkout widget has authenticated
/// the payment on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmData {
    pub payment_key: String,
    pub order_id: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: i64,
}

impl PaymentConfirmData {
    pub fn new(payment_key: impl Into<String>, order_id: impl Into<String>, amount: i64) -> Self {
        Self {
            payment_key: payment_key.into(),
            order_id: order_id.into(),
            amount,
        }
    }

    /// Read the confirm fields from a JSON object, e.g. the query of the
    /// checkout success redirect.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Bank account refunds are paid into (virtual account payments).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceiveAccount {
    pub bank: String,
    pub account_number: String,
    pub holder_name: String,
}

/// Request body for `POST /payments/{paymentKey}/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayment {
    #[serde(skip)]
    pub payment_key: String,
    pub cancel_reason: String,
    /// Partial cancellation amount; the full balance when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundable_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_receive_account: Option<RefundReceiveAccount>,
}

impl CancelPayment {
    pub fn new(payment_key: impl Into<String>, cancel_reason: impl Into<String>) -> Self {
        Self {
            payment_key: payment_key.into(),
            cancel_reason: cancel_reason.into(),
            cancel_amount: None,
            tax_free_amount: None,
            refundable_amount: None,
            refund_receive_account: None,
        }
    }

    pub fn with_cancel_amount(mut self, amount: i64) -> Self {
        self.cancel_amount = Some(amount);
        self
    }

    pub fn with_tax_free_amount(mut self, amount: i64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }

    pub fn with_refundable_amount(mut self, amount: i64) -> Self {
        self.refundable_amount = Some(amount);
        self
    }

    pub fn with_refund_receive_account(mut self, account: RefundReceiveAccount) -> Self {
        self.refund_receive_account = Some(account);
        self
    }
}

/// Card fields for key-in payments and billing authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfo {
    pub card_number: String,
    /// Two digit year, e.g. `"28"`.
    pub card_expiration_year: String,
    pub card_expiration_month: String,
    /// Birth date (`YYMMDD`) or business registration number.
    pub customer_identity_number: String,
}

impl CardInfo {
    pub fn new(
        card_number: impl Into<String>,
        card_expiration_year: impl Into<String>,
        card_expiration_month: impl Into<String>,
        customer_identity_number: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            card_expiration_year: card_expiration_year.into(),
            card_expiration_month: card_expiration_month.into(),
            customer_identity_number: customer_identity_number.into(),
        }
    }

    /// Field names paired with their values, all of which must be non-empty.
    pub fn required_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("card_number", &self.card_number),
            ("card_expiration_year", &self.card_expiration_year),
            ("card_expiration_month", &self.card_expiration_month),
            ("customer_identity_number", &self.customer_identity_number),
        ]
    }
}

/// Request body for `POST /virtual-accounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountRequest {
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    pub customer_name: String,
    /// Bank code or name, e.g. `"20"` or `"우리"`.
    pub bank: String,
    /// `"일반"` or `"고정"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_escrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_receipt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escrow_products: Option<Value>,
}

impl VirtualAccountRequest {
    pub fn new(
        amount: i64,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
        customer_name: impl Into<String>,
        bank: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            order_name: order_name.into(),
            customer_name: customer_name.into(),
            bank: bank.into(),
            account_type: None,
            account_key: None,
            valid_hours: None,
            due_date: None,
            customer_email: None,
            customer_mobile_phone: None,
            tax_free_amount: None,
            use_escrow: None,
            cash_receipt: None,
            escrow_products: None,
        }
    }

    pub fn with_valid_hours(mut self, hours: u32) -> Self {
        self.valid_hours = Some(hours);
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_customer_mobile_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_mobile_phone = Some(phone.into());
        self
    }

    pub fn with_tax_free_amount(mut self, amount: i64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }

    pub fn with_escrow(mut self, products: Option<Value>) -> Self {
        self.use_escrow = Some(true);
        self.escrow_products = products;
        self
    }

    /// Issue a cash receipt with the deposit, e.g. `{"type": "소득공제", ...}`.
    pub fn with_cash_receipt(mut self, cash_receipt: Value) -> Self {
        self.cash_receipt = Some(cash_receipt);
        self
    }
}

/// Request body for `POST /payments/key-in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInPayment {
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    #[serde(flatten)]
    pub card: CardInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_password: Option<String>,
    /// Number of monthly installments; lump sum when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_installment_plan: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_free_installment_plan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// 3-D Secure result fields for overseas cards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbv: Option<Value>,
}

impl KeyInPayment {
    pub fn new(
        amount: i64,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
        card: CardInfo,
    ) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            order_name: order_name.into(),
            card,
            card_password: None,
            card_installment_plan: None,
            use_free_installment_plan: None,
            tax_free_amount: None,
            customer_email: None,
            customer_name: None,
            vbv: None,
        }
    }

    /// First two digits of the card password.
    pub fn with_card_password(mut self, password: impl Into<String>) -> Self {
        self.card_password = Some(password.into());
        self
    }

    pub fn with_installments(mut self, months: u32, interest_free: bool) -> Self {
        self.card_installment_plan = Some(months);
        self.use_free_installment_plan = Some(interest_free);
        self
    }

    pub fn with_tax_free_amount(mut self, amount: i64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }

    pub fn with_customer(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_vbv(mut self, vbv: Value) -> Self {
        self.vbv = Some(vbv);
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentObject {
    payment_key: String,
    order_id: String,
    #[serde(default)]
    order_name: String,
    status: PaymentStatus,
    total_amount: i64,
    balance_amount: Option<i64>,
    #[serde(default)]
    method: String,
    approved_at: Option<String>,
    requested_at: Option<String>,
    receipt: Option<Receipt>,
    card: Option<Value>,
    virtual_account: Option<Value>,
    easy_pay: Option<Value>,
    cancels: Option<Value>,
    failure: Option<Value>,
}

#[derive(Deserialize)]
struct Receipt {
    url: Option<String>,
}

/// Typed view of the Payment object returned by the payment endpoints.
///
/// Method-specific details (`card`, `virtualAccount`, ...) are kept as raw
/// JSON; the complete response is available in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub payment_key: String,
    pub order_id: String,
    pub order_name: String,
    pub status: PaymentStatus,
    pub total_amount: i64,
    pub balance_amount: i64,
    pub method: String,
    pub approved_at: Option<String>,
    pub requested_at: Option<String>,
    pub receipt_url: Option<String>,
    #[serde(skip)]
    pub card: Option<Value>,
    #[serde(skip)]
    pub virtual_account: Option<Value>,
    #[serde(skip)]
    pub easy_pay: Option<Value>,
    #[serde(skip)]
    pub cancels: Option<Value>,
    #[serde(skip)]
    pub failure: Option<Value>,
    #[serde(skip)]
    pub raw: Value,
}

impl PaymentResult {
    /// Build from an API response body.
    ///
    /// `orderName` and `method` default to empty strings and `balanceAmount`
    /// defaults to `totalAmount`.
    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        let object = PaymentObject::deserialize(&json)?;
        Ok(Self {
            payment_key: object.payment_key,
            order_id: object.order_id,
            order_name: object.order_name,
            status: object.status,
            total_amount: object.total_amount,
            balance_amount: object.balance_amount.unwrap_or(object.total_amount),
            method: object.method,
            approved_at: object.approved_at,
            requested_at: object.requested_at,
            receipt_url: object.receipt.and_then(|r| r.url),
            card: object.card,
            virtual_account: object.virtual_account,
            easy_pay: object.easy_pay,
            cancels: object.cancels,
            failure: object.failure,
            raw: json,
        })
    }

    pub fn is_successful(&self) -> bool {
        self.status.is_completed()
    }

    pub fn is_canceled(&self) -> bool {
        self.status.is_canceled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirm_data_from_value() {
        let data = PaymentConfirmData::from_value(json!({
            "paymentKey": "pk_123",
            "orderId": "order_456",
            "amount": 5000,
        }))
        .unwrap();
        assert_eq!(data, PaymentConfirmData::new("pk_123", "order_456", 5000));
    }

    #[test]
    fn test_confirm_data_accepts_string_amount() {
        let data = PaymentConfirmData::from_value(json!({
            "paymentKey": "pk_123",
            "orderId": "order_456",
            "amount": "15000",
        }))
        .unwrap();
        assert_eq!(data.amount, 15000);

        let bad = PaymentConfirmData::from_value(json!({
            "paymentKey": "pk_123",
            "orderId": "order_456",
            "amount": "fifteen",
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_confirm_data_serializes_camel_case_in_order() {
        let data = PaymentConfirmData::new("pk_test", "ord_test", 20000);
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"paymentKey":"pk_test","orderId":"ord_test","amount":20000}"#
        );
    }

    #[test]
    fn test_cancel_payment_omits_unset_fields() {
        let cancel = CancelPayment::new("pk", "customer request").with_cancel_amount(1000);
        assert_eq!(
            serde_json::to_value(&cancel).unwrap(),
            json!({"cancelReason": "customer request", "cancelAmount": 1000})
        );
    }

    #[test]
    fn test_payment_result_from_json() {
        let result = PaymentResult::from_json(json!({
            "paymentKey": "test_payment_key",
            "orderId": "test_order_123",
            "orderName": "Test product",
            "status": "DONE",
            "totalAmount": 10000,
            "method": "CARD",
            "approvedAt": "2024-01-01T12:00:00+09:00",
            "receipt": {"url": "https://dashboard.tosspayments.com/receipt"},
            "card": {"number": "4330****"},
        }))
        .unwrap();

        assert_eq!(result.status, PaymentStatus::Done);
        assert_eq!(result.balance_amount, 10000);
        assert_eq!(
            result.receipt_url.as_deref(),
            Some("https://dashboard.tosspayments.com/receipt")
        );
        assert!(result.card.is_some());
        assert!(result.is_successful());
        assert!(!result.is_canceled());
        assert_eq!(result.raw["orderName"], "Test product");
    }

    #[test]
    fn test_payment_result_defaults() {
        let result = PaymentResult::from_json(json!({
            "paymentKey": "pk",
            "orderId": "o",
            "status": "PARTIAL_CANCELED",
            "totalAmount": 500,
            "balanceAmount": 200,
        }))
        .unwrap();
        assert_eq!(result.order_name, "");
        assert_eq!(result.method, "");
        assert_eq!(result.balance_amount, 200);
        assert!(result.is_canceled());
    }

    #[test]
    fn test_payment_result_rejects_unknown_status() {
        let result = PaymentResult::from_json(json!({
            "paymentKey": "pk",
            "orderId": "o",
            "status": "SOMETHING_ELSE",
            "totalAmount": 500,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_predicates() {
        assert!(PaymentStatus::Done.is_completed());
        assert!(!PaymentStatus::Ready.is_completed());
        assert!(PaymentStatus::Canceled.is_canceled());
        assert!(PaymentStatus::PartialCanceled.is_canceled());
        assert!(PaymentStatus::Aborted.is_failed());
        assert!(PaymentStatus::Expired.is_failed());
        assert!(!PaymentStatus::Done.is_failed());
        assert!(PaymentStatus::Ready.is_pending());
        assert!(PaymentStatus::InProgress.is_pending());
        assert!(PaymentStatus::WaitingForDeposit.is_pending());
        assert!(!PaymentStatus::Done.is_pending());
    }

    #[test]
    fn test_status_display_matches_wire_format() {
        let wire: PaymentStatus = serde_json::from_str(r#""WAITING_FOR_DEPOSIT""#).unwrap();
        assert_eq!(wire, PaymentStatus::WaitingForDeposit);
        assert_eq!(wire.to_string(), "WAITING_FOR_DEPOSIT");
    }
}
