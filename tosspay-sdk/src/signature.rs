//! Webhook signature verification for Toss Payments.
//!
//! Toss signs every webhook delivery with HMAC-SHA256 keyed by the webhook
//! secret. The wire format for the header is:
//!
//! ```text
//! Toss-Signature: t={unix_timestamp},v1={hex_signature}
//! ```
//!
//! The signed string is `"{timestamp}.{raw_body}"` and the signature is the
//! lowercase hex encoding of the MAC.

use std::fmt;
use std::str::FromStr;

use subtle::ConstantTimeEq;

/// Header name carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Toss-Signature";

/// Default freshness window (in seconds) for a signature timestamp.
pub const DEFAULT_TOLERANCE: u64 = 5 * 60;

/// Reasons a webhook signature is rejected.
///
/// The messages never contain the expected signature or the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Invalid signature format")]
    MalformedHeader,
    #[error("Webhook signature has expired")]
    Expired,
    #[error("Webhook signature verification failed")]
    SignatureMismatch,
}

impl SignatureError {
    /// Machine-readable code reported to the webhook sender.
    pub fn code(&self) -> &'static str {
        match self {
            SignatureError::MalformedHeader => "INVALID_SIGNATURE_FORMAT",
            SignatureError::Expired => "SIGNATURE_EXPIRED",
            SignatureError::SignatureMismatch => "INVALID_SIGNATURE",
        }
    }
}

// ---------------------------------------------------------------------------
// Header parsing / formatting
// ---------------------------------------------------------------------------

/// A parsed `Toss-Signature` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    pub timestamp: i64,
    pub signature: String,
}

impl SignedHeader {
    /// Parse a `t=..,v1=..` header value.
    ///
    /// Segments are split on `,` and each on its first `=`. Both `t` and `v1`
    /// must be present, in any order; unknown keys are ignored and a repeated
    /// key keeps its last value. Whitespace around a segment is ignored, but
    /// not around the `=`.
    pub fn parse(value: &str) -> Result<Self, SignatureError> {
        let mut timestamp = None;
        let mut signature = None;

        for part in value.split(',') {
            let (key, val) = part
                .trim()
                .split_once('=')
                .ok_or(SignatureError::MalformedHeader)?;
            match key {
                "t" => timestamp = Some(val),
                "v1" => signature = Some(val),
                _ => {}
            }
        }

        let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
            return Err(SignatureError::MalformedHeader);
        };
        let timestamp = timestamp
            .parse()
            .map_err(|_| SignatureError::MalformedHeader)?;

        Ok(Self {
            timestamp,
            signature: signature.to_owned(),
        })
    }

    /// Format the header value (`t={timestamp},v1={signature}`).
    pub fn to_header(&self) -> String {
        format!("t={},v1={}", self.timestamp, self.signature)
    }
}

impl FromStr for SignedHeader {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SignedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header())
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

fn hmac_hex(key: &ring::hmac::Key, timestamp: i64, payload: &[u8]) -> String {
    let mut ctx = ring::hmac::Context::with_key(key);
    ctx.update(timestamp.to_string().as_bytes());
    ctx.update(b".");
    ctx.update(payload);
    hex::encode(ctx.sign().as_ref())
}

/// Compute `hex(HMAC-SHA256("{timestamp}.{payload}", secret))`.
pub fn compute_signature(secret: &[u8], timestamp: i64, payload: &[u8]) -> String {
    let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret);
    hmac_hex(&key, timestamp, payload)
}

/// Sign `payload` at `timestamp`, producing the header a sender would attach.
pub fn sign_payload(secret: &[u8], timestamp: i64, payload: &[u8]) -> SignedHeader {
    SignedHeader {
        timestamp,
        signature: compute_signature(secret, timestamp, payload),
    }
}

fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

// ---------------------------------------------------------------------------
// WebhookVerifier
// ---------------------------------------------------------------------------

/// Verifies inbound webhook deliveries against a shared secret.
///
/// Holds only the HMAC key and the freshness window, so one instance can be
/// shared by every request handler.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: ring::hmac::Key,
    tolerance: u64,
}

impl WebhookVerifier {
    /// Create a verifier with the default 300 second tolerance.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_tolerance(secret, DEFAULT_TOLERANCE)
    }

    /// Create a verifier accepting timestamps at most `tolerance` seconds
    /// away from the current time, in either direction.
    pub fn with_tolerance(secret: impl AsRef<[u8]>, tolerance: u64) -> Self {
        Self {
            key: ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret.as_ref()),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Verify `payload` against a `Toss-Signature` header value.
    ///
    /// `now` is the current unix time; `None` reads the system clock.
    /// Checks run in order: header format, timestamp freshness, signature.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: Option<i64>,
    ) -> Result<(), SignatureError> {
        let header = SignedHeader::parse(signature_header)?;
        self.verify_parsed(payload, &header, now.unwrap_or_else(unix_now))
    }

    /// Verify an already parsed header at the given unix time.
    pub fn verify_parsed(
        &self,
        payload: &[u8],
        header: &SignedHeader,
        now: i64,
    ) -> Result<(), SignatureError> {
        if now.abs_diff(header.timestamp) > self.tolerance {
            return Err(SignatureError::Expired);
        }

        let expected = hmac_hex(&self.key, header.timestamp, payload);
        if bool::from(expected.as_bytes().ct_eq(header.signature.as_bytes())) {
            Ok(())
        } else {
            Err(SignatureError::SignatureMismatch)
        }
    }
}

impl fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("key", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}
