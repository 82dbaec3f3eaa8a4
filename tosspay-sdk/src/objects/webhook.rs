//! Webhook payload types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event types Toss delivers to a registered webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEventType {
    PaymentStatusChanged,
    /// Virtual account deposit completed.
    DepositCallback,
    PayoutStatusChanged,
    BrandPayStatusChanged,
    MethodUpdated,
    BillingKeyDeleted,
}

impl WebhookEventType {
    pub fn is_payment_event(&self) -> bool {
        matches!(
            self,
            WebhookEventType::PaymentStatusChanged | WebhookEventType::DepositCallback
        )
    }

    pub fn is_deposit_event(&self) -> bool {
        matches!(self, WebhookEventType::DepositCallback)
    }

    pub fn is_billing_event(&self) -> bool {
        matches!(self, WebhookEventType::BillingKeyDeleted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventType::PaymentStatusChanged => "PAYMENT_STATUS_CHANGED",
            WebhookEventType::DepositCallback => "DEPOSIT_CALLBACK",
            WebhookEventType::PayoutStatusChanged => "PAYOUT_STATUS_CHANGED",
            WebhookEventType::BrandPayStatusChanged => "BRAND_PAY_STATUS_CHANGED",
            WebhookEventType::MethodUpdated => "METHOD_UPDATED",
            WebhookEventType::BillingKeyDeleted => "BILLING_KEY_DELETED",
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WebhookEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAYMENT_STATUS_CHANGED" => Ok(WebhookEventType::PaymentStatusChanged),
            "DEPOSIT_CALLBACK" => Ok(WebhookEventType::DepositCallback),
            "PAYOUT_STATUS_CHANGED" => Ok(WebhookEventType::PayoutStatusChanged),
            "BRAND_PAY_STATUS_CHANGED" => Ok(WebhookEventType::BrandPayStatusChanged),
            "METHOD_UPDATED" => Ok(WebhookEventType::MethodUpdated),
            "BILLING_KEY_DELETED" => Ok(WebhookEventType::BillingKeyDeleted),
            other => Err(UnknownEventType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown webhook event type: {0}")]
pub struct UnknownEventType(pub String);

/// Envelope of a webhook delivery.
///
/// The event type is kept as a string so that event types added by Toss
/// after this release still deserialize; use [`kind`](Self::kind) for the
/// typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    pub fn kind(&self) -> Option<WebhookEventType> {
        self.event_type.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_groups() {
        assert!(WebhookEventType::PaymentStatusChanged.is_payment_event());
        assert!(WebhookEventType::DepositCallback.is_payment_event());
        assert!(WebhookEventType::DepositCallback.is_deposit_event());
        assert!(!WebhookEventType::PayoutStatusChanged.is_payment_event());
        assert!(WebhookEventType::BillingKeyDeleted.is_billing_event());
        assert!(!WebhookEventType::MethodUpdated.is_billing_event());
    }

    #[test]
    fn test_event_type_string_forms_agree() {
        for kind in [
            WebhookEventType::PaymentStatusChanged,
            WebhookEventType::DepositCallback,
            WebhookEventType::PayoutStatusChanged,
            WebhookEventType::BrandPayStatusChanged,
            WebhookEventType::MethodUpdated,
            WebhookEventType::BillingKeyDeleted,
        ] {
            let serialized = serde_json::to_string(&kind).unwrap();
            assert_eq!(serialized, format!("\"{kind}\""));
            assert_eq!(kind.as_str().parse::<WebhookEventType>(), Ok(kind));
        }
    }

    #[test]
    fn test_event_envelope_keeps_unknown_types() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"eventType":"SOMETHING_NEW","data":{"a":1}}"#).unwrap();
        assert_eq!(event.kind(), None);
        assert_eq!(event.data["a"], 1);

        let event: WebhookEvent =
            serde_json::from_str(r#"{"eventType":"PAYMENT_STATUS_CHANGED"}"#).unwrap();
        assert_eq!(event.kind(), Some(WebhookEventType::PaymentStatusChanged));
        assert_eq!(event.data, Value::Null);
    }
}
