use serde::{Deserialize, Serialize};

use ledgercast_accounts::Account;
use ledgercast_core::{AccountNumber, Amount};
use ledgercast_infra::TransferResult;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_account: AccountNumber,
    pub to_account: AccountNumber,
    pub amount: Amount,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub found: bool,
    pub account_number: AccountNumber,
    pub holder_name: Option<String>,
    pub balance: Option<Amount>,
}

impl AccountView {
    pub fn missing(account_number: AccountNumber) -> Self {
        Self {
            found: false,
            account_number,
            holder_name: None,
            balance: None,
        }
    }
}

impl From<&Account> for AccountView {
    fn from(a: &Account) -> Self {
        Self {
            found: true,
            account_number: a.account_number().clone(),
            holder_name: Some(a.holder_name().to_string()),
            balance: Some(a.balance()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub account_number: AccountNumber,
    pub holder_name: String,
    pub balance: Amount,
}

impl From<&Account> for AccountSummary {
    fn from(a: &Account) -> Self {
        Self {
            account_number: a.account_number().clone(),
            holder_name: a.holder_name().to_string(),
            balance: a.balance(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountList {
    pub items: Vec<AccountSummary>,
}

/// Transfer outcome as seen by clients: only the sender's balance is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResponse {
    pub success: bool,
    pub message: String,
    pub new_balance_of_from: Option<Amount>,
}

impl From<&TransferResult> for TransferResponse {
    fn from(r: &TransferResult) -> Self {
        Self {
            success: r.success,
            message: r.message.clone(),
            new_balance_of_from: r.from_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub accounts: usize,
    /// `null` when the sum is too large to represent.
    pub total_balance: Option<Amount>,
    pub subscribed_accounts: usize,
}
