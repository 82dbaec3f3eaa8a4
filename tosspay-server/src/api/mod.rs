//! HTTP API surface.

pub mod extractors;
pub mod webhooks;
