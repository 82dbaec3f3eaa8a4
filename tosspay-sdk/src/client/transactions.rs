//! Transaction history endpoint.

use serde_json::Value;

use super::request::required;
use super::{HttpTransport, Method, OutboundRequest, PaymentError, ReqwestTransport, TossClient};
use crate::objects::TransactionQuery;

/// Transaction lookups of a [`TossClient`].
#[derive(Debug)]
pub struct TransactionsApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> TransactionsApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    /// Transactions in a time range, paged with `starting_after`.
    pub async fn list(&self, query: &TransactionQuery) -> Result<Value, PaymentError> {
        required("start_date", &query.start_date)?;
        required("end_date", &query.end_date)?;
        let request = OutboundRequest::builder(Method::Get, "transactions")
            .json(query)?
            .build()?;
        Ok(self.client.execute(&request).await.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{MockTransport, mock_client, respond};

    #[tokio::test]
    async fn test_list_transactions() {
        let transport = MockTransport::new(vec![respond(
            200,
            r#"[{"transactionKey":"tx_1","paymentKey":"pk_1","status":"DONE","amount":10000}]"#,
        )]);
        let toss = mock_client(&transport);

        let query = TransactionQuery::new("2024-01-01T00:00:00", "2024-01-02T00:00:00")
            .with_starting_after("tx_0")
            .with_limit(50);
        let page = toss.transactions().list(&query).await.unwrap();

        assert_eq!(page[0]["transactionKey"], "tx_1");
        let sent = &transport.captured_requests()[0];
        assert_eq!(sent.url.path(), "/v2/transactions");
        let pairs: Vec<(String, String)> = sent.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("startDate".to_owned(), "2024-01-01T00:00:00".to_owned()),
                ("endDate".to_owned(), "2024-01-02T00:00:00".to_owned()),
                ("startingAfter".to_owned(), "tx_0".to_owned()),
                ("limit".to_owned(), "50".to_owned()),
            ]
        );
    }
}
