//! `ledgercast-core`: shared building blocks for the ledger and its notifications.
//!
//! This crate contains **pure domain** primitives (no IO, no locking).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{LedgerError, LedgerResult};
pub use id::{AccountNumber, SubscriberId};
pub use money::Amount;
