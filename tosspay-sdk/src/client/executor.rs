//! Request executor: authentication, bounded retry, classification.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::{
    ApiError, ApiResult, BillingApi, CashReceiptsApi, HttpTransport, Method, OutboundRequest,
    PaymentsApi, PromotionsApi, ReqwestTransport, RetryPolicy, ServerFailure, SettlementsApi,
    TransactionsApi, TransportError, TransportRequest, TransportResponse,
};
use crate::config::{ApiVersion, ClientConfig};

/// Header deduplicating retried submissions (v2 API).
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Header selecting a simulated error in the test environment.
pub const TEST_CODE_HEADER: &str = "TossPayments-Test-Code";

/// Typed HTTP client for the Toss Payments API.
///
/// Every request is authenticated with HTTP Basic auth, using the secret
/// key as user name and an empty password. The client holds only immutable
/// configuration and is cheap to clone; clones share the transport.
#[derive(Debug)]
pub struct TossClient<T = ReqwestTransport> {
    transport: Arc<T>,
    base_url: Url,
    version: ApiVersion,
    authorization: HeaderValue,
    retry: RetryPolicy,
    default_headers: HeaderMap,
}

impl<T> Clone for TossClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
            version: self.version,
            authorization: self.authorization.clone(),
            retry: self.retry,
            default_headers: self.default_headers.clone(),
        }
    }
}

impl TossClient<ReqwestTransport> {
    /// Create a client using `reqwest` with the configured timeout and TLS
    /// verification.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> TossClient<T> {
    /// Create a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, TransportError> {
        Ok(Self {
            transport: Arc::new(transport),
            authorization: basic_authorization(&config.secret_key)?,
            base_url: config.base_url,
            version: config.version,
            retry: config.retry.into(),
            default_headers: HeaderMap::new(),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Derive a client that sends `TossPayments-Test-Code: {code}` on every
    /// request. `self` is left untouched.
    pub fn with_test_code(&self, code: &str) -> Result<Self, TransportError> {
        let value = HeaderValue::from_str(code)
            .map_err(|_| TransportError::InvalidRequest(format!("invalid test code: {code}")))?;
        let mut derived = self.clone();
        derived
            .default_headers
            .insert(HeaderName::from_static("tosspayments-test-code"), value);
        Ok(derived)
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Payment endpoints backed by this client.
    pub fn payments(&self) -> PaymentsApi<'_, T> {
        PaymentsApi::new(self)
    }

    pub fn billing(&self) -> BillingApi<'_, T> {
        BillingApi::new(self)
    }

    pub fn cash_receipts(&self) -> CashReceiptsApi<'_, T> {
        CashReceiptsApi::new(self)
    }

    pub fn settlements(&self) -> SettlementsApi<'_, T> {
        SettlementsApi::new(self)
    }

    pub fn transactions(&self) -> TransactionsApi<'_, T> {
        TransactionsApi::new(self)
    }

    pub fn promotions(&self) -> PromotionsApi<'_, T> {
        PromotionsApi::new(self)
    }

    /// `{base_url}/{version}/{path}` with leading slashes of `path` removed.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.version,
            path.trim_start_matches('/')
        ))
    }

    /// Perform one logical call and classify its outcome.
    pub async fn send(&self, method: Method, path: &str, body: Map<String, Value>) -> ApiResult {
        match OutboundRequest::builder(method, path).params(body).build() {
            Ok(request) => self.execute(&request).await,
            Err(e) => ApiResult::ServerFailure(ServerFailure::transport(
                &TransportError::InvalidRequest(e.to_string()),
            )),
        }
    }

    /// Like [`send`](Self::send), bounded by `deadline`.
    pub async fn send_with_deadline(
        &self,
        method: Method,
        path: &str,
        body: Map<String, Value>,
        deadline: Instant,
    ) -> ApiResult {
        match OutboundRequest::builder(method, path).params(body).build() {
            Ok(request) => self.execute_with_deadline(&request, deadline).await,
            Err(e) => ApiResult::ServerFailure(ServerFailure::transport(
                &TransportError::InvalidRequest(e.to_string()),
            )),
        }
    }

    /// Like [`send`](Self::send), returning the body or a typed error.
    ///
    /// 4xx answers become [`ApiError::Validation`]; 5xx answers and
    /// transport failures become [`ApiError::Server`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.send(method, path, body).await.into_result()
    }

    /// Execute a prepared request.
    pub async fn execute(&self, request: &OutboundRequest) -> ApiResult {
        self.run(request, None).await
    }

    /// Execute a prepared request, giving up once `deadline` passes.
    ///
    /// The deadline bounds every attempt and every pause between attempts.
    /// When it cuts an attempt off, the response of the previous attempt is
    /// classified instead, or a transport failure if no response arrived.
    pub async fn execute_with_deadline(
        &self,
        request: &OutboundRequest,
        deadline: Instant,
    ) -> ApiResult {
        self.run(request, Some(deadline)).await
    }

    async fn run(&self, request: &OutboundRequest, deadline: Option<Instant>) -> ApiResult {
        // One key per logical call, shared by all of its attempts.
        let transport_request = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(e) => return ApiResult::classify(Err(e)),
        };

        let mut attempt = 1;
        let mut last_response = None;
        loop {
            debug!(
                method = %request.method(),
                url = %transport_request.url,
                attempt,
                "sending API request"
            );
            let outcome = self.attempt(&transport_request, deadline).await;

            if matches!(outcome, Err(TransportError::DeadlineExceeded)) {
                if let Some(previous) = last_response.take() {
                    warn!(attempt, "deadline cut the attempt off, keeping the previous response");
                    return ApiResult::classify(Ok(previous));
                }
            }

            if !self.retry.has_attempts_after(attempt) || !self.retry.is_retryable(&outcome) {
                return ApiResult::classify(outcome);
            }

            let backoff = self.retry.backoff;
            if deadline.is_some_and(|deadline| Instant::now() + backoff >= deadline) {
                warn!(attempt, "deadline leaves no room for another attempt");
                return ApiResult::classify(outcome);
            }

            warn!(
                attempt,
                max_attempts = self.retry.max_attempts,
                reason = %describe(&outcome),
                "retrying API request"
            );
            if let Ok(response) = outcome {
                last_response = Some(response);
            }
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    async fn attempt(
        &self,
        request: &TransportRequest,
        deadline: Option<Instant>,
    ) -> Result<TransportResponse, TransportError> {
        let call = self.transport.execute(request.clone());
        match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call)
                .await
                .unwrap_or(Err(TransportError::DeadlineExceeded)),
            None => call.await,
        }
    }

    fn prepare(&self, request: &OutboundRequest) -> Result<TransportRequest, TransportError> {
        let mut url = self
            .url_for(request.path())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut headers = self.default_headers.clone();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if self.version.requires_idempotency_key() {
            let key = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            headers.insert(HeaderName::from_static("idempotency-key"), key);
        }
        for (name, value) in request.headers() {
            headers.insert(name.clone(), value.clone());
        }

        let body = match request.method() {
            Method::Get => {
                if !request.body().is_empty() {
                    url.query_pairs_mut().extend_pairs(request.query_pairs());
                }
                None
            }
            Method::Post => Some(
                serde_json::to_vec(request.body())
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?,
            ),
        };

        Ok(TransportRequest {
            method: request.method().as_http(),
            url,
            headers,
            body,
        })
    }
}

/// `Basic base64("{secret}:")`, marked sensitive so it never shows in logs.
fn basic_authorization(secret_key: &str) -> Result<HeaderValue, TransportError> {
    let encoded = fast32::base64::RFC4648.encode(format!("{secret_key}:").as_bytes());
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|_| TransportError::InvalidRequest("invalid secret key".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn describe(outcome: &Result<TransportResponse, TransportError>) -> String {
    match outcome {
        Ok(response) => format!("status {}", response.status),
        Err(e) => e.to_string(),
    }
}
