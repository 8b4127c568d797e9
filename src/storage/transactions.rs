//! Transaction document store backed by a JSON file
//!
//! The file holds either a bare array of documents or
//! `{"transactions": [...]}`. Documents are indexed by `user_id` on load; the
//! index is rebuilt whenever the file's modification time changes, so edits
//! made by other systems are picked up on the next request.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::SystemTime;

use serde::Deserialize;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Document, UserId};

use super::file_io::{modified_time, read_json_required};
use super::{index_by_user, TransactionStore};

/// Accepted file layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum TransactionFile {
    Wrapped { transactions: Vec<Document> },
    Bare(Vec<Document>),
}

impl TransactionFile {
    fn into_documents(self) -> Vec<Document> {
        match self {
            Self::Wrapped { transactions } => transactions,
            Self::Bare(documents) => documents,
        }
    }
}

#[derive(Default)]
struct Loaded {
    modified: Option<SystemTime>,
    by_user: HashMap<UserId, Vec<Document>>,
}

/// Read-only document store over a JSON file
pub struct JsonTransactionStore {
    path: PathBuf,
    data: RwLock<Loaded>,
}

impl JsonTransactionStore {
    /// Open the store and load the file once
    pub fn open(path: impl Into<PathBuf>) -> BudgetResult<Self> {
        let store = Self {
            path: path.into(),
            data: RwLock::new(Loaded::default()),
        };
        store.load()?;
        Ok(store)
    }

    /// Load documents from disk and rebuild the index
    pub fn load(&self) -> BudgetResult<()> {
        let modified = modified_time(&self.path)?;
        let file: TransactionFile = read_json_required(&self.path)?;
        let documents = file.into_documents();
        let total = documents.len();

        let (by_user, unindexed) = index_by_user(documents);

        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.by_user = by_user;
        data.modified = Some(modified);

        tracing::debug!(
            path = %self.path.display(),
            documents = total,
            users = data.by_user.len(),
            unindexed,
            "Loaded transaction documents"
        );
        Ok(())
    }

    fn reload_if_changed(&self) -> BudgetResult<()> {
        let modified = modified_time(&self.path)?;
        let stale = {
            let data = self.data.read().map_err(|e| {
                BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            data.modified != Some(modified)
        };

        if stale {
            self.load()?;
        }
        Ok(())
    }
}

impl TransactionStore for JsonTransactionStore {
    fn find_by_user(&self, user_id: UserId) -> BudgetResult<Vec<Document>> {
        self.reload_if_changed()?;

        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.by_user.get(&user_id).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    const ALICE: &str = "65a1f0c2e4b0a1b2c3d4e5f6";
    const BOB: &str = "65a1f0c2e4b0a1b2c3d4e5f7";

    fn write(path: &Path, value: serde_json::Value) {
        std::fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_wrapped_file_indexed_by_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        write(
            &path,
            json!({"transactions": [
                {"user_id": {"$oid": ALICE}, "amount": 10},
                {"user_id": ALICE, "amount": 20},
                {"user_id": BOB, "amount": 30},
                {"user_id": "nobody", "amount": 40}
            ]}),
        );

        let store = JsonTransactionStore::open(&path).unwrap();
        let alice = store.find_by_user(UserId::parse(ALICE).unwrap()).unwrap();
        let bob = store.find_by_user(UserId::parse(BOB).unwrap()).unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(bob.len(), 1);
    }

    #[test]
    fn test_bare_array_and_unknown_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        write(&path, json!([{"user_id": ALICE, "amount": 10}]));

        let store = JsonTransactionStore::open(&path).unwrap();
        let bob = store.find_by_user(UserId::parse(BOB).unwrap()).unwrap();
        assert!(bob.is_empty());
    }

    #[test]
    fn test_missing_file_fails_to_open() {
        let temp_dir = TempDir::new().unwrap();
        let result = JsonTransactionStore::open(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(BudgetError::ServiceUnavailable(_))));
    }

    #[test]
    fn test_reload_after_external_change() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        write(&path, json!([{"user_id": ALICE, "amount": 10}]));
        let store = JsonTransactionStore::open(&path).unwrap();

        write(
            &path,
            json!([
                {"user_id": ALICE, "amount": 10},
                {"user_id": ALICE, "amount": 15}
            ]),
        );
        // Force a distinct modification time regardless of filesystem granularity
        let later = SystemTime::now() + std::time::Duration::from_secs(5);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        let alice = store.find_by_user(UserId::parse(ALICE).unwrap()).unwrap();
        assert_eq!(alice.len(), 2);
    }
}
