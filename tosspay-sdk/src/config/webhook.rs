//! Webhook receiver configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::signature::{DEFAULT_TOLERANCE, WebhookVerifier};

/// Shared secret and freshness window for inbound webhooks.
#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// HMAC secret shared with Toss.
    pub secret: String,
    /// Maximum distance (in seconds) between the signature timestamp and now.
    #[serde(default = "default_tolerance")]
    pub tolerance: u64,
}

fn default_tolerance() -> u64 {
    DEFAULT_TOLERANCE
}

impl WebhookConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Build the verifier described by this configuration.
    pub fn verifier(&self) -> WebhookVerifier {
        WebhookVerifier::with_tolerance(self.secret.as_bytes(), self.tolerance)
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
