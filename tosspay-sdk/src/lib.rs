//! SDK for the Toss Payments API.
//!
//! * [`signature`] verifies inbound `Toss-Signature` webhook headers and
//!   [`webhook`] decodes the verified deliveries.
//! * [`client`] (feature `client`) sends authenticated API requests with
//!   bounded retries, classifies the responses and exposes the payment,
//!   billing, cash receipt, settlement, transaction and promotion endpoints
//!   built on top of them.
//! * [`objects`] holds the request and response bodies.
//! * [`config`] holds the configuration shared by the client and the
//!   webhook receiver.

pub mod config;
pub mod objects;
pub mod signature;
pub mod webhook;

#[cfg(feature = "client")]
pub mod client;
