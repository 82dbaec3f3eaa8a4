//! Settlement endpoints.

use serde_json::Value;

use super::request::required;
use super::{HttpTransport, Method, OutboundRequest, PaymentError, ReqwestTransport, TossClient};
use crate::objects::SettlementQuery;

/// Settlement operations of a [`TossClient`].
#[derive(Debug)]
pub struct SettlementsApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> SettlementsApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    /// Settlements in a date range (`GET /settlements`).
    pub async fn list(&self, query: &SettlementQuery) -> Result<Value, PaymentError> {
        required("start_date", &query.start_date)?;
        required("end_date", &query.end_date)?;
        let request = OutboundRequest::builder(Method::Get, "settlements")
            .json(query)?
            .build()?;
        Ok(self.client.execute(&request).await.into_result()?)
    }

    /// Request manual settlement of one payment.
    pub async fn request(&self, payment_key: &str) -> Result<Value, PaymentError> {
        let request = OutboundRequest::builder(Method::Post, "settlements")
            .param("paymentKey", required("payment_key", payment_key)?)
            .build()?;
        Ok(self.client.execute(&request).await.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::BuilderError;
    use crate::client::testing::{MockTransport, mock_client, respond, sent_json};
    use crate::objects::{SettlementDateType, SettlementStatus};

    #[tokio::test]
    async fn test_settlement_endpoints() {
        let transport = MockTransport::new(vec![
            respond(
                200,
                r#"{"hasMore":false,"data":[{"paymentKey":"pk_1","soldDate":"2024-01-15","paidOutDate":"2024-01-22","amount":10000}]}"#,
            ),
            respond(200, r#"{"paymentKey":"pk_1","status":"PENDING"}"#),
        ]);
        let toss = mock_client(&transport);

        let query = SettlementQuery::new("2024-01-01", "2024-01-31")
            .with_date_type(SettlementDateType::PaidOutDate)
            .with_page(0, 100);
        let page = toss.settlements().list(&query).await.unwrap();
        assert_eq!(page["data"][0]["paymentKey"], "pk_1");

        let requested = toss.settlements().request("pk_1").await.unwrap();
        let status: SettlementStatus = serde_json::from_value(requested["status"].clone()).unwrap();
        assert!(status.is_pending());

        let requests = transport.captured_requests();
        assert_eq!(requests[0].method, reqwest::Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.tosspayments.com/v2/settlements?startDate=2024-01-01&endDate=2024-01-31&dateType=paidOutDate&page=0&size=100"
        );
        assert!(requests[0].body.is_none());
        assert_eq!(requests[1].method, reqwest::Method::POST);
        assert_eq!(sent_json(&transport, 1), json!({"paymentKey": "pk_1"}));
    }

    #[tokio::test]
    async fn test_settlement_requires_date_range() {
        let transport = MockTransport::new(vec![]);
        let toss = mock_client(&transport);

        let err = toss
            .settlements()
            .list(&SettlementQuery::new("2024-01-01", ""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Builder(BuilderError::MissingField("end_date"))
        ));
        assert_eq!(transport.calls(), 0);
    }
}
