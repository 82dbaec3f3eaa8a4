//! Transport seam between the request executor and the HTTP library.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use url::Url;

use crate::config::ClientConfig;

/// Errors raised before a response was received.
///
/// Describes what went wrong; [`RetryPolicy`](super::RetryPolicy) decides
/// whether it is worth another attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, TLS, connection reset, or a body that could not be read.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not answer within the per-attempt timeout.
    #[error("request timed out")]
    Timeout,

    /// The caller's deadline passed before the call completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The request could not be built (bad URL, header, or client setup).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Connection failures and timeouts are transient; the rest are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Connection(_) | TransportError::Timeout)
    }
}

/// A fully assembled request, ready to be put on the wire.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: reqwest::Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// A received response with its body fully buffered.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single HTTP request.
///
/// Implemented by [`ReqwestTransport`] in production and by scripted mocks
/// in tests.
pub trait HttpTransport: Send + Sync {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> impl std::future::Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a `reqwest::Client` honouring the timeout and TLS settings of
    /// `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Wrap an existing `reqwest::Client` (e.g. one configured with a proxy).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        Ok(TransportResponse::new(status, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Connection(Box::new(e))
    }
}
