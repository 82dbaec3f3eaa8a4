//! Card promotion lookup.

use serde_json::Value;

use super::{HttpTransport, Method, OutboundRequest, PaymentError, ReqwestTransport, TossClient};

/// Promotion lookups of a [`TossClient`].
#[derive(Debug)]
pub struct PromotionsApi<'a, T = ReqwestTransport> {
    client: &'a TossClient<T>,
}

impl<'a, T: HttpTransport> PromotionsApi<'a, T> {
    pub(crate) fn new(client: &'a TossClient<T>) -> Self {
        Self { client }
    }

    /// Card discounts and interest-free installment offers currently active.
    pub async fn card(&self) -> Result<Value, PaymentError> {
        let request = OutboundRequest::builder(Method::Get, "promotions/card").build()?;
        Ok(self.client.execute(&request).await.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{MockTransport, mock_client, respond};

    #[tokio::test]
    async fn test_card_promotions() {
        let transport = MockTransport::new(vec![respond(
            200,
            r#"{"discountCards":[{"cardCompany":"현대","discountAmount":1000}],"interestFreeCards":[]}"#,
        )]);
        let toss = mock_client(&transport);

        let promotions = toss.promotions().card().await.unwrap();

        assert_eq!(promotions["discountCards"][0]["discountAmount"], 1000);
        let sent = &transport.captured_requests()[0];
        assert_eq!(sent.method, reqwest::Method::GET);
        assert_eq!(sent.url.as_str(), "https://api.tosspayments.com/v2/promotions/card");
    }
}
