//! Webhook verification helper.
//!
//! Convenience wrapper around [`WebhookVerifier`] that authenticates an
//! incoming delivery and then decodes its envelope.

use crate::objects::WebhookEvent;
use crate::signature::{SignatureError, WebhookVerifier};

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("invalid webhook body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Verify and deserialize an incoming Toss webhook.
///
/// * `signature_header` – value of the `Toss-Signature` request header.
/// * `body` – raw request body, exactly as received.
/// * `now` – current unix time; `None` reads the system clock.
///
/// The body is only parsed once the signature has been accepted.
///
/// # Example
///
/// ```ignore
/// use tosspay_sdk::signature::WebhookVerifier;
/// use tosspay_sdk::webhook::verify_webhook;
///
/// let verifier = WebhookVerifier::new(webhook_secret);
/// let event = verify_webhook(&verifier, signature_header, &body, None)?;
/// ```
pub fn verify_webhook(
    verifier: &WebhookVerifier,
    signature_header: &str,
    body: &[u8],
    now: Option<i64>,
) -> Result<WebhookEvent, WebhookError> {
    verifier.verify(body, signature_header, now)?;
    Ok(serde_json::from_slice(body)?)
}
