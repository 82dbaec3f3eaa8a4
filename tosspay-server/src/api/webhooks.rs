//! Webhook receiver.
//!
//! # Endpoints
//!
//! - `POST /webhooks/toss` – accept a signed Toss Payments webhook delivery

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde::Serialize;
use tosspay_sdk::objects::WebhookEvent;

use crate::api::extractors::VerifiedWebhook;
use crate::state::AppState;

/// Build the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/toss", post(receive_webhook))
}

#[derive(Serialize)]
struct Received {
    received: bool,
}

/// `POST /webhooks/toss`: acknowledge a verified delivery.
///
/// Event types this build does not know are still acknowledged so Toss
/// stops redelivering them.
async fn receive_webhook(
    VerifiedWebhook(body): VerifiedWebhook,
) -> Result<impl IntoResponse, WebhookApiError> {
    let event: WebhookEvent = serde_json::from_slice(&body).map_err(WebhookApiError::Payload)?;

    match event.kind() {
        Some(kind) => tracing::info!(
            event_type = %kind,
            payment_event = kind.is_payment_event(),
            "webhook received"
        ),
        None => tracing::warn!(event_type = %event.event_type, "unknown webhook event type"),
    }

    Ok(Json(Received { received: true }))
}

/// Errors that can occur in the webhook handler.
#[derive(Debug)]
enum WebhookApiError {
    /// The verified body is not a webhook envelope.
    Payload(serde_json::Error),
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            WebhookApiError::Payload(e) => {
                tracing::warn!(error = %e, "invalid webhook payload");
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "Invalid webhook payload" })),
                )
                    .into_response()
            }
        }
    }
}
