//! Scripted transport for client tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;

use super::{HttpTransport, TossClient, TransportError, TransportRequest, TransportResponse};
use crate::config::ClientConfig;

/// Returns scripted outcomes in order and records every request it sees.
///
/// Clones share the script and the recorded requests.
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    inner: Arc<Inner>,
    /// Calls before the delay starts applying, and the delay itself.
    delay: Option<(usize, Duration)>,
}

#[derive(Debug)]
struct Inner {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
    call_count: AtomicUsize,
}

impl MockTransport {
    pub(crate) fn new(responses: Vec<Result<TransportResponse, TransportError>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }),
            delay: None,
        }
    }

    /// Sleep before answering each request.
    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        self.with_delay_after(0, delay)
    }

    /// Answer the first `calls` requests at once and delay the rest.
    pub(crate) fn with_delay_after(mut self, calls: usize, delay: Duration) -> Self {
        self.delay = Some((calls, delay));
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.inner.call_count.load(Ordering::SeqCst)
    }

    pub(crate) fn captured_requests(&self) -> Vec<TransportRequest> {
        self.inner.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let call = self.inner.call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().unwrap().push(request);
        let outcome = self
            .inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::InvalidRequest("no scripted response".into())));

        match self.delay {
            Some((after, delay)) if call >= after => tokio::time::sleep(delay).await,
            _ => {}
        }
        outcome
    }
}

/// A scripted response with the given status code.
pub(crate) fn respond(code: u16, body: &str) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse::new(
        StatusCode::from_u16(code).unwrap(),
        body.as_bytes(),
    ))
}

/// A v2 client with default settings on top of `transport`.
pub(crate) fn mock_client(transport: &MockTransport) -> TossClient<MockTransport> {
    TossClient::with_transport(ClientConfig::new("test_sk"), transport.clone()).unwrap()
}

/// The JSON body of the `index`-th recorded request.
pub(crate) fn sent_json(transport: &MockTransport, index: usize) -> serde_json::Value {
    let body = transport.captured_requests()[index].body.clone().unwrap();
    serde_json::from_slice(&body).unwrap()
}
