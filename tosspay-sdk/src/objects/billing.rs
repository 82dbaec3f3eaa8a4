//! Billing (automatic payment) objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payment::CardInfo;

/// Request body for `POST /billing/authorizations/card`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAuthorization {
    /// Merchant-side identifier of the customer owning the billing key.
    pub customer_key: String,
    #[serde(flatten)]
    pub card: CardInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vbv: Option<Value>,
}

impl CardAuthorization {
    pub fn new(customer_key: impl Into<String>, card: CardInfo) -> Self {
        Self {
            customer_key: customer_key.into(),
            card,
            card_password: None,
            customer_name: None,
            customer_email: None,
            vbv: None,
        }
    }

    pub fn with_card_password(mut self, password: impl Into<String>) -> Self {
        self.card_password = Some(password.into());
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

/// Request body for `POST /billing/{billingKey}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCharge {
    #[serde(skip)]
    pub billing_key: String,
    pub amount: i64,
    pub customer_key: String,
    pub order_id: String,
    pub order_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_installment_plan: Option<u32>,
}

impl BillingCharge {
    pub fn new(
        billing_key: impl Into<String>,
        customer_key: impl Into<String>,
        amount: i64,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
    ) -> Self {
        Self {
            billing_key: billing_key.into(),
            amount,
            customer_key: customer_key.into(),
            order_id: order_id.into(),
            order_name: order_name.into(),
            customer_email: None,
            customer_name: None,
            customer_mobile_phone: None,
            tax_free_amount: None,
            card_installment_plan: None,
        }
    }

    pub fn with_customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
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

    pub fn with_card_installment_plan(mut self, months: u32) -> Self {
        self.card_installment_plan = Some(months);
        self
    }
}

/// Billing key issued for a customer's card. The complete response is kept
/// in `raw`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingKey {
    pub billing_key: String,
    pub customer_key: String,
    #[serde(default)]
    pub method: String,
    pub card_company: Option<String>,
    pub card_number: Option<String>,
    pub authenticated_at: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl BillingKey {
    pub fn from_json(json: Value) -> Result<Self, serde_json::Error> {
        let mut key = Self::deserialize(&json)?;
        key.raw = json;
        Ok(key)
    }
}
