use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use ledgercast_accounts::Account;

use super::{SnapshotStorage, StorageError, validate};

/// Snapshot stored as a pretty-printed JSON array in a single file.
///
/// Writes go to `<file>.tmp` first and are renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Account>>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<Account> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        validate(records).map(Some)
    }

    fn save(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let body =
            serde_json::to_vec_pretty(accounts).map_err(|e| StorageError::Encode(e.to_string()))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
