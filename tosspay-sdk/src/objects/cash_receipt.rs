//! Cash receipt objects.

use serde::{Deserialize, Serialize};

/// Purpose of a cash receipt. Serialized with the Korean labels the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashReceiptType {
    /// 소득공제: income deduction for an individual.
    #[serde(rename = "소득공제")]
    IncomeDeduction,
    /// 지출증빙: proof of expense for a business.
    #[serde(rename = "지출증빙")]
    ExpenseProof,
}

impl CashReceiptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashReceiptType::IncomeDeduction => "소득공제",
            CashReceiptType::ExpenseProof => "지출증빙",
        }
    }

    pub fn is_income_deduction(&self) -> bool {
        matches!(self, CashReceiptType::IncomeDeduction)
    }

    pub fn is_expense_proof(&self) -> bool {
        matches!(self, CashReceiptType::ExpenseProof)
    }
}

impl std::fmt::Display for CashReceiptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /cash-receipts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCashReceipt {
    pub amount: i64,
    pub order_id: String,
    pub order_name: String,
    /// Phone number, card number or business registration number.
    pub customer_identity_number: String,
    #[serde(rename = "type")]
    pub receipt_type: CashReceiptType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_free_amount: Option<i64>,
}

impl IssueCashReceipt {
    pub fn new(
        amount: i64,
        order_id: impl Into<String>,
        order_name: impl Into<String>,
        customer_identity_number: impl Into<String>,
        receipt_type: CashReceiptType,
    ) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            order_name: order_name.into(),
            customer_identity_number: customer_identity_number.into(),
            receipt_type,
            tax_free_amount: None,
        }
    }

    pub fn with_tax_free_amount(mut self, amount: i64) -> Self {
        self.tax_free_amount = Some(amount);
        self
    }
}

/// Request body for `POST /cash-receipts/{receiptKey}/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelCashReceipt {
    #[serde(skip)]
    pub receipt_key: String,
    /// Partial cancellation amount; the full receipt when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

impl CancelCashReceipt {
    pub fn new(receipt_key: impl Into<String>) -> Self {
        Self {
            receipt_key: receipt_key.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}
