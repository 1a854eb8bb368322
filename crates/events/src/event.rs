use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledgercast_core::{AccountNumber, Amount};

/// What happened to the target account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Deposit,
    Withdraw,
    TransferSent,
    TransferReceived,
    System,
}

impl EventKind {
    /// Wire name (also used as the SSE event name).
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Deposit => "DEPOSIT",
            EventKind::Withdraw => "WITHDRAW",
            EventKind::TransferSent => "TRANSFER_SENT",
            EventKind::TransferReceived => "TRANSFER_RECEIVED",
            EventKind::System => "SYSTEM",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A balance-change notification for one account.
///
/// Immutable once built; delivery is best-effort and in-memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    event_id: Uuid,
    account_number: AccountNumber,
    kind: EventKind,
    message: String,
    /// Zero when not applicable (system messages).
    amount: Amount,
    /// The other side of a transfer.
    counterpart: Option<AccountNumber>,
    /// Balance of `account_number` right after the triggering mutation.
    balance: Option<Amount>,
    occurred_at: DateTime<Utc>,
}

impl NotificationEvent {
    fn build(
        account_number: AccountNumber,
        kind: EventKind,
        message: String,
        amount: Amount,
        counterpart: Option<AccountNumber>,
        balance: Option<Amount>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            account_number,
            kind,
            message,
            amount,
            counterpart,
            balance,
            occurred_at: Utc::now(),
        }
    }

    pub fn deposit(account: AccountNumber, amount: Amount, new_balance: Amount) -> Self {
        let message = format!("deposited {amount} to account {account}");
        Self::build(account, EventKind::Deposit, message, amount, None, Some(new_balance))
    }

    pub fn withdraw(account: AccountNumber, amount: Amount, new_balance: Amount) -> Self {
        let message = format!("withdrew {amount} from account {account}");
        Self::build(account, EventKind::Withdraw, message, amount, None, Some(new_balance))
    }

    /// Event for the debited side of a transfer.
    pub fn transfer_sent(
        from: AccountNumber,
        to: AccountNumber,
        amount: Amount,
        from_balance: Amount,
    ) -> Self {
        let message = format!("sent {amount} to account {to}");
        Self::build(from, EventKind::TransferSent, message, amount, Some(to), Some(from_balance))
    }

    /// Event for the credited side of a transfer.
    pub fn transfer_received(
        to: AccountNumber,
        from: AccountNumber,
        amount: Amount,
        to_balance: Amount,
    ) -> Self {
        let message = format!("received {amount} from account {from}");
        Self::build(to, EventKind::TransferReceived, message, amount, Some(from), Some(to_balance))
    }

    pub fn system(account: AccountNumber, message: impl Into<String>) -> Self {
        Self::build(account, EventKind::System, message.into(), Decimal::ZERO, None, None)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn counterpart(&self) -> Option<&AccountNumber> {
        self.counterpart.as_ref()
    }

    pub fn balance(&self) -> Option<Amount> {
        self.balance
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// JSON payload for transports.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
