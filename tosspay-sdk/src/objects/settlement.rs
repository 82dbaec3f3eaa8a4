//! Settlement and transaction lookup objects.

use serde::{Deserialize, Serialize};

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Completed,
    Pending,
    Canceled,
}

impl SettlementStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, SettlementStatus::Completed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SettlementStatus::Pending)
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, SettlementStatus::Canceled)
    }
}

/// Which date `startDate`/`endDate` of a settlement lookup refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettlementDateType {
    SoldDate,
    PaidOutDate,
}

/// Query of `GET /settlements`. Dates are `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementQuery {
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_type: Option<SettlementDateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl SettlementQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            date_type: None,
            page: None,
            size: None,
        }
    }

    pub fn with_date_type(mut self, date_type: SettlementDateType) -> Self {
        self.date_type = Some(date_type);
        self
    }

    pub fn with_page(mut self, page: u32, size: u32) -> Self {
        self.page = Some(page);
        self.size = Some(size);
        self
    }
}

/// Query of `GET /transactions`. Times are `yyyy-MM-ddTHH:mm:ss`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub start_date: String,
    pub end_date: String,
    /// Cursor: the `transactionKey` of the last item of the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl TransactionQuery {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            starting_after: None,
            limit: None,
        }
    }

    pub fn with_starting_after(mut self, transaction_key: impl Into<String>) -> Self {
        self.starting_after = Some(transaction_key.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
