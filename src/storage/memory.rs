//! In-memory transaction store
//!
//! Used for `memory://` connection strings and as the substitute store in
//! tests.

use std::collections::HashMap;

use crate::error::BudgetResult;
use crate::models::{Document, UserId};

use super::{index_by_user, TransactionStore};

/// Transaction store holding documents in memory
#[derive(Default)]
pub struct MemoryStore {
    by_user: HashMap<UserId, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from documents, indexing them by their `user_id` field
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let (by_user, _) = index_by_user(documents);
        Self { by_user }
    }
}

impl TransactionStore for MemoryStore {
    fn find_by_user(&self, user_id: UserId) -> BudgetResult<Vec<Document>> {
        Ok(self.by_user.get(&user_id).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_store_finds_nothing() {
        let store = MemoryStore::new();
        let user = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert!(store.find_by_user(user).unwrap().is_empty());
    }

    #[test]
    fn test_from_documents_indexes_user_field() {
        let docs = vec![
            json!({"user_id": "65a1f0c2e4b0a1b2c3d4e5f6", "amount": 1}),
            json!({"user_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "amount": 2}),
            json!({"amount": 3}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();

        let store = MemoryStore::from_documents(docs);
        let user = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(store.find_by_user(user).unwrap().len(), 2);
    }
}
