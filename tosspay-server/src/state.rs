//! Application state shared across all request handlers.

use std::sync::Arc;
use tokio::sync::RwLock;
use tosspay_sdk::signature::WebhookVerifier;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone, Debug)]
pub struct AppState {
    /// Webhook verifier (can be replaced via SIGHUP).
    pub verifier: Arc<RwLock<WebhookVerifier>>,
}

impl AppState {
    pub fn new(verifier: WebhookVerifier) -> Self {
        Self {
            verifier: Arc::new(RwLock::new(verifier)),
        }
    }

    /// Get a read lock on the verifier.
    pub async fn verifier(&self) -> tokio::sync::RwLockReadGuard<'_, WebhookVerifier> {
        self.verifier.read().await
    }

    /// Swap in a new verifier (used during SIGHUP reload).
    pub async fn update_verifier(&self, verifier: WebhookVerifier) {
        *self.verifier.write().await = verifier;
    }
}
