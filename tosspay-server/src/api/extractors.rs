//! Custom Axum extractors for request authentication.
//!
//! Provides `VerifiedWebhook`, which checks the `Toss-Signature` header
//! against the raw request body before any handler sees it.
//!
//! All cryptographic operations are delegated to [`tosspay_sdk::signature`].

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;
use tosspay_sdk::signature::{SIGNATURE_HEADER, SignatureError};

use crate::state::AppState;

/// Maximum accepted webhook body size.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// An Axum extractor that verifies the `Toss-Signature` header and yields
/// the raw, authenticated request body.
///
/// # Header format
///
/// ```text
/// Toss-Signature: t={unix_timestamp},v1={hex_signature}
/// ```
///
/// The signature is computed as `HMAC-SHA256("{timestamp}.{body}", webhook_secret)`.
pub struct VerifiedWebhook(pub Bytes);

/// Errors that can occur during webhook verification.
#[derive(Debug, thiserror::Error)]
pub enum WebhookRejection {
    #[error("Missing Toss-Signature header")]
    MissingHeader,
    #[error("failed to read request body")]
    BodyReadError,
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let body = match &self {
            WebhookRejection::MissingHeader => json!({ "error": self.to_string() }),
            WebhookRejection::BodyReadError => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": self.to_string() })),
                )
                    .into_response();
            }
            WebhookRejection::Signature(e) => {
                json!({ "error": e.to_string(), "code": e.code() })
            }
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl FromRequest<AppState> for VerifiedWebhook {
    type Rejection = WebhookRejection;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = req
            .headers()
            .get(SIGNATURE_HEADER)
            .ok_or(WebhookRejection::MissingHeader)?
            .to_str()
            .map_err(|_| SignatureError::MalformedHeader)?
            .to_owned();

        let body = axum::body::to_bytes(req.into_body(), BODY_LIMIT)
            .await
            .map_err(|_| WebhookRejection::BodyReadError)?;

        let verifier = state.verifier().await;
        if let Err(e) = verifier.verify(&body, &header_value, None) {
            tracing::warn!(code = e.code(), "rejected webhook delivery");
            return Err(e.into());
        }
        drop(verifier);

        Ok(VerifiedWebhook(body))
    }
}
