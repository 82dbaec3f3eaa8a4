pub mod billing;
pub mod cash_receipt;
pub mod payment;
pub mod settlement;
pub mod webhook;

pub use billing::{BillingCharge, BillingKey, CardAuthorization};
pub use cash_receipt::{CancelCashReceipt, CashReceiptType, IssueCashReceipt};
pub use payment::{
    CancelPayment, CardInfo, KeyInPayment, PaymentConfirmData, PaymentResult, PaymentStatus,
    RefundReceiveAccount, VirtualAccountRequest,
};
pub use settlement::{SettlementDateType, SettlementQuery, SettlementStatus, TransactionQuery};
pub use webhook::{WebhookEvent, WebhookEventType};
