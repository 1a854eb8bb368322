//! Flat `{success, message, ...}` results for callers at the transport edge.
//!
//! The store itself returns `LedgerResult`; these types fold a rejection into
//! a value so business-rule failures read differently from system faults.

use serde::Serialize;

use ledgercast_core::{Amount, LedgerError, LedgerResult};

pub const DEPOSIT_OK: &str = "deposit successful";
pub const WITHDRAW_OK: &str = "withdrawal successful";
pub const TRANSFER_OK: &str = "transfer successful";

/// Balances right after a successful transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from_balance: Amount,
    pub to_balance: Amount,
}

/// Result of a deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    /// Only set on success.
    pub new_balance: Option<Amount>,
    /// Why the operation was refused; not part of the wire shape.
    #[serde(skip)]
    pub rejection: Option<LedgerError>,
}

impl OperationResult {
    pub fn from_result(result: &LedgerResult<Amount>, success_message: &str) -> Self {
        match result {
            Ok(balance) => Self {
                success: true,
                message: success_message.to_string(),
                new_balance: Some(*balance),
                rejection: None,
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                new_balance: None,
                rejection: Some(e.clone()),
            },
        }
    }
}

/// Result of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResult {
    pub success: bool,
    pub message: String,
    pub from_balance: Option<Amount>,
    pub to_balance: Option<Amount>,
    #[serde(skip)]
    pub rejection: Option<LedgerError>,
}

impl From<&LedgerResult<TransferReceipt>> for TransferResult {
    fn from(result: &LedgerResult<TransferReceipt>) -> Self {
        match result {
            Ok(r) => Self {
                success: true,
                message: TRANSFER_OK.to_string(),
                from_balance: Some(r.from_balance),
                to_balance: Some(r.to_balance),
                rejection: None,
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                from_balance: None,
                to_balance: None,
                rejection: Some(e.clone()),
            },
        }
    }
}
