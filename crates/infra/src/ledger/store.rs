use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;

use ledgercast_accounts::{Account, account::CANNOT_WITHDRAW, sample_accounts};
use ledgercast_core::{AccountNumber, Amount, Entity, LedgerError, LedgerResult};

use super::outcome::TransferReceipt;
use crate::storage::{SnapshotStorage, StorageError};

/// Rejection reason when the credited side of a transfer refuses the amount.
pub const CANNOT_RECEIVE: &str = "destination account cannot accept deposit";

type AccountMap = HashMap<AccountNumber, Account>;

/// Authoritative account table.
///
/// One mutex guards the whole map and every account in it. Each public
/// operation holds it for its full duration, including the snapshot write of
/// a mutation, so all operations are linearizable: no lost updates, no
/// visible half-applied transfer, and the durable snapshot is written before
/// the caller hears "success".
///
/// A failed snapshot write is logged and does not undo the in-memory change;
/// the in-memory map is authoritative for the running process.
pub struct LedgerStore {
    accounts: Mutex<AccountMap>,
    storage: Box<dyn SnapshotStorage>,
}

impl core::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("storage", &self.storage.describe())
            .field("accounts", &self.len())
            .finish()
    }
}

impl LedgerStore {
    /// Load the ledger from `storage`, or seed the sample accounts (and write
    /// them back immediately) if nothing usable is stored.
    pub fn open<S>(storage: S) -> Self
    where
        S: SnapshotStorage + 'static,
    {
        let location = storage.describe();
        let (accounts, seeded) = match storage.load() {
            Ok(Some(records)) => {
                tracing::info!(storage = %location, records = records.len(), "loaded account snapshot");
                (index(records), false)
            }
            Ok(None) => {
                tracing::info!(storage = %location, "no account snapshot; seeding sample accounts");
                (index(sample_accounts()), true)
            }
            Err(e) => {
                tracing::warn!(storage = %location, error = %e, "account snapshot unreadable; re-seeding sample accounts");
                (index(sample_accounts()), true)
            }
        };

        let store = Self {
            accounts: Mutex::new(accounts),
            storage: Box::new(storage),
        };

        if seeded {
            if let Err(e) = store.persist() {
                tracing::error!(storage = %location, error = %e, "failed to persist seeded accounts");
            }
        }
        store
    }

    // Every mutation goes through checked arithmetic and returns an error
    // instead of panicking, so a poisoned lock only means an unrelated panic
    // (e.g. in a storage backend) and the map is still consistent.
    fn lock(&self) -> MutexGuard<'_, AccountMap> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, number: &AccountNumber) -> Option<Account> {
        self.lock().get(number).cloned()
    }

    /// Every account at the instant of the call, ordered by account number.
    pub fn list_all(&self) -> Vec<Account> {
        snapshot(&self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sum of all balances, or `None` if it does not fit in an `Amount`.
    pub fn total_balance(&self) -> Option<Amount> {
        self.lock()
            .values()
            .try_fold(Decimal::ZERO, |total, account| total.checked_add(account.balance()))
    }

    /// Returns the new balance.
    pub fn deposit(&self, number: &AccountNumber, amount: Amount) -> LedgerResult<Amount> {
        let mut accounts = self.lock();
        let account = accounts.get_mut(number).ok_or(LedgerError::NotFound)?;
        account.deposit(amount)?;
        let balance = account.balance();

        self.persist_or_log(&accounts, "deposit");
        Ok(balance)
    }

    /// Returns the new balance.
    pub fn withdraw(&self, number: &AccountNumber, amount: Amount) -> LedgerResult<Amount> {
        let mut accounts = self.lock();
        let account = accounts.get_mut(number).ok_or(LedgerError::NotFound)?;
        account.withdraw(amount)?;
        let balance = account.balance();

        self.persist_or_log(&accounts, "withdraw");
        Ok(balance)
    }

    /// Move `amount` from `from` to `to` as one unit.
    ///
    /// Both sides are checked before either is touched. A transfer to the same
    /// account still has to pass the withdraw check, then nets to zero.
    pub fn transfer(
        &self,
        from: &AccountNumber,
        to: &AccountNumber,
        amount: Amount,
    ) -> LedgerResult<TransferReceipt> {
        let mut accounts = self.lock();

        let source = accounts.get(from).ok_or(LedgerError::NotFound)?;
        let destination = accounts.get(to).ok_or(LedgerError::NotFound)?;

        if !source.can_withdraw(amount) {
            return Err(LedgerError::invalid(CANNOT_WITHDRAW));
        }
        if !destination.can_deposit(amount) {
            return Err(LedgerError::invalid(CANNOT_RECEIVE));
        }

        if from == to {
            let balance = source.balance();
            return Ok(TransferReceipt {
                from_balance: balance,
                to_balance: balance,
            });
        }

        apply_transfer(&mut accounts, from, to, amount)?;
        let receipt = TransferReceipt {
            from_balance: balance_of(&accounts, from),
            to_balance: balance_of(&accounts, to),
        };

        self.persist_or_log(&accounts, "transfer");
        Ok(receipt)
    }

    /// Write the current account set to storage, replacing what was there.
    pub fn persist(&self) -> Result<(), StorageError> {
        let accounts = self.lock();
        self.storage.save(&snapshot(&accounts))
    }

    fn persist_or_log(&self, accounts: &AccountMap, operation: &'static str) {
        if let Err(e) = self.storage.save(&snapshot(accounts)) {
            tracing::error!(
                operation,
                storage = %self.storage.describe(),
                error = %e,
                "failed to persist accounts; in-memory state kept"
            );
        }
    }
}

// Last write wins on duplicate account numbers.
fn index(records: Vec<Account>) -> AccountMap {
    records
        .into_iter()
        .map(|account| (account.id().clone(), account))
        .collect()
}

fn snapshot(accounts: &AccountMap) -> Vec<Account> {
    let mut all: Vec<Account> = accounts.values().cloned().collect();
    all.sort_by(|a, b| a.account_number().cmp(b.account_number()));
    all
}

fn balance_of(accounts: &AccountMap, number: &AccountNumber) -> Amount {
    accounts.get(number).map(Account::balance).unwrap_or(Decimal::ZERO)
}

// Debit then credit; the credit cannot fail after the caller's checks, but if
// it ever does the debit is reversed so no partial transfer survives.
fn apply_transfer(
    accounts: &mut AccountMap,
    from: &AccountNumber,
    to: &AccountNumber,
    amount: Amount,
) -> LedgerResult<()> {
    accounts
        .get_mut(from)
        .ok_or(LedgerError::NotFound)?
        .withdraw(amount)?;

    let credited = accounts
        .get_mut(to)
        .ok_or(LedgerError::NotFound)
        .and_then(|destination| destination.deposit(amount));

    if let Err(e) = credited {
        if let Some(source) = accounts.get_mut(from) {
            let _ = source.deposit(amount);
        }
        return Err(e);
    }
    Ok(())
}
