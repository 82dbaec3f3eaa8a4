//! Configuration types for the Toss Payments SDK.
//!
//! These types describe the settings consumed by the API client and the
//! webhook verifier. They deserialize from any serde format with the same
//! defaults the gateway documentation recommends; loading them from a file
//! is left to the embedding application.

mod client;
mod webhook;

pub use client::{ApiVersion, ClientConfig, RetryConfig};
pub use webhook::WebhookConfig;
