//! Infrastructure layer: the serialized account store and its durable snapshots.

pub mod ledger;
pub mod storage;


pub use ledger::{LedgerStore, OperationResult, TransferReceipt, TransferResult};
pub use storage::{InMemoryStorage, JsonFileStorage, SnapshotStorage, StorageError};
