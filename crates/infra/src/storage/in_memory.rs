use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ledgercast_accounts::Account;

use super::{SnapshotStorage, StorageError, validate};

#[derive(Debug, Clone)]
enum Contents {
    Empty,
    Snapshot(Vec<Account>),
    Corrupt,
}

/// In-memory snapshot storage for tests/dev.
///
/// Can be pre-loaded with a snapshot, marked corrupt, or told to fail saves,
/// which lets callers exercise every startup and persistence path without IO.
#[derive(Debug)]
pub struct InMemoryStorage {
    contents: Mutex<Contents>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self {
            contents: Mutex::new(Contents::Empty),
            fail_saves: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let storage = Self::default();
        if let Ok(mut c) = storage.contents.lock() {
            *c = Contents::Snapshot(accounts);
        }
        storage
    }

    /// Storage whose content cannot be decoded.
    pub fn corrupt() -> Self {
        let storage = Self::default();
        if let Ok(mut c) = storage.contents.lock() {
            *c = Contents::Corrupt;
        }
        storage
    }

    /// Make subsequent `save` calls fail (simulated disk failure).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Last successfully saved snapshot, if any.
    pub fn snapshot(&self) -> Option<Vec<Account>> {
        match self.contents.lock().ok()?.clone() {
            Contents::Snapshot(accounts) => Some(accounts),
            _ => None,
        }
    }
}

impl SnapshotStorage for InMemoryStorage {
    fn load(&self) -> Result<Option<Vec<Account>>, StorageError> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Corrupt("lock poisoned".to_string()))?
            .clone();

        match contents {
            Contents::Empty => Ok(None),
            Contents::Snapshot(accounts) => validate(accounts).map(Some),
            Contents::Corrupt => Err(StorageError::Corrupt("unreadable snapshot".to_string())),
        }
    }

    fn save(&self, accounts: &[Account]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("simulated write failure")));
        }

        let mut contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Corrupt("lock poisoned".to_string()))?;
        *contents = Contents::Snapshot(accounts.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
