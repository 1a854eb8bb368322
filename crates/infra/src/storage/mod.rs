//! Durable snapshot storage for the ledger.
//!
//! The ledger persists a **full snapshot** of every account after each
//! successful mutation (not an append log). Backends only need to load and
//! overwrite that snapshot.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryStorage;
pub use json_file::JsonFileStorage;

use std::sync::Arc;

use thiserror::Error;

use ledgercast_accounts::Account;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

/// Load/overwrite the account snapshot.
pub trait SnapshotStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Account>>, StorageError>;

    /// Replace the stored snapshot with `accounts`.
    fn save(&self, accounts: &[Account]) -> Result<(), StorageError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

impl<S> SnapshotStorage for Arc<S>
where
    S: SnapshotStorage + ?Sized,
{
    fn load(&self) -> Result<Option<Vec<Account>>, StorageError> {
        (**self).load()
    }

    fn save(&self, accounts: &[Account]) -> Result<(), StorageError> {
        (**self).save(accounts)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Reject records that would break ledger invariants.
pub(crate) fn validate(records: Vec<Account>) -> Result<Vec<Account>, StorageError> {
    if let Some(bad) = records.iter().find(|a| !a.is_well_formed()) {
        return Err(StorageError::Corrupt(format!(
            "invalid record for account '{}'",
            bad.account_number()
        )));
    }
    Ok(records)
}
