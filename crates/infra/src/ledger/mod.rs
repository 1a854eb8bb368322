//! The ledger store and the result shapes it hands to the transport edge.

pub mod outcome;
pub mod store;

pub use outcome::{DEPOSIT_OK, OperationResult, TRANSFER_OK, TransferReceipt, TransferResult, WITHDRAW_OK};
pub use store::{CANNOT_RECEIVE, LedgerStore};
