//! HTTP client for the Toss Payments API.
//!
//! Gated behind the `client` cargo feature so crates that only verify
//! webhooks do not pull in `reqwest`.
//!
//! [`TossClient`] performs one logical API call per [`send`](TossClient::send):
//! it authenticates the request, retries transport failures and 5xx
//! responses according to its [`RetryPolicy`], and classifies the final
//! response into an [`ApiResult`]. The endpoint groups ([`PaymentsApi`],
//! [`BillingApi`], [`CashReceiptsApi`], [`SettlementsApi`],
//! [`TransactionsApi`] and [`PromotionsApi`]) build the API resources on top
//! of [`TossClient::execute`].

mod billing;
mod cash_receipts;
mod executor;
mod payments;
mod promotions;
mod request;
mod result;
mod retry;
mod settlements;
mod transactions;
mod transport;

#[cfg(test)]
mod testing;

pub use billing::BillingApi;
pub use cash_receipts::CashReceiptsApi;
pub use executor::{IDEMPOTENCY_KEY_HEADER, TEST_CODE_HEADER, TossClient};
pub use payments::{PaymentError, PaymentRequestBuilder, PaymentsApi};
pub use promotions::PromotionsApi;
pub use request::{BuilderError, Method, OutboundRequest, OutboundRequestBuilder};
pub use result::{ApiError, ApiResult, ServerFailure, ValidationFailure};
pub use retry::RetryPolicy;
pub use settlements::SettlementsApi;
pub use transactions::TransactionsApi;
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
