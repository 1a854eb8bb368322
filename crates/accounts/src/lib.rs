//! Accounts module (balance + lock state per account).
//!
//! Pure domain logic only: no IO, no locking, no persistence concerns. Callers
//! are expected to serialize access (see the ledger store in `ledgercast-infra`).

pub mod account;
pub mod sample;

pub use account::Account;
pub use sample::sample_accounts;
