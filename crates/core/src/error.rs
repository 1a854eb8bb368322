//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Business-rule rejection of a ledger operation.
///
/// Keep this focused on deterministic failures (unknown account, violated
/// preconditions). Persistence and delivery failures live with the
/// infrastructure that produces them and never surface through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account number is not present in the store.
    #[error("account not found")]
    NotFound,

    /// The account refused the mutation (locked, non-positive amount,
    /// insufficient balance).
    #[error("{0}")]
    InvalidOperation(String),
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether this is an unknown-account rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
