//! Transaction service
//!
//! Resolves a raw user id and loads that user's documents from the store.
//! The id is checked before the store is touched, so a malformed id is
//! reported the same way whether or not the store is reachable.

use serde_json::Value;

use crate::error::{BudgetError, BudgetResult};
use crate::export::documents_to_json;
use crate::models::{Document, UserId};
use crate::storage::StoreHandle;

/// Service for reading a user's stored transactions
pub struct TransactionService<'a> {
    store: &'a StoreHandle,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(store: &'a StoreHandle) -> Self {
        Self { store }
    }

    /// Parse a user id taken from a request path
    pub fn parse_user_id(raw: &str) -> BudgetResult<UserId> {
        UserId::parse(raw).map_err(|_| BudgetError::invalid_identifier(raw))
    }

    /// All documents stored for a user; an unknown user yields an empty list
    pub fn documents_for(&self, user_id: UserId) -> BudgetResult<Vec<Document>> {
        let store = self.store.store()?;
        let documents = store.find_by_user(user_id)?;
        tracing::debug!(user_id = %user_id, count = documents.len(), "Loaded transactions");
        Ok(documents)
    }

    /// Validate the raw id, then load the user's documents
    pub fn load_user_documents(&self, raw_user_id: &str) -> BudgetResult<(UserId, Vec<Document>)> {
        let user_id = Self::parse_user_id(raw_user_id)?;
        let documents = self.documents_for(user_id)?;
        Ok((user_id, documents))
    }

    /// A user's documents shaped as plain JSON, for inspection
    pub fn raw_transactions(&self, raw_user_id: &str) -> BudgetResult<Value> {
        let (_, documents) = self.load_user_documents(raw_user_id)?;
        Ok(documents_to_json(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    const USER: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn store_with(docs: Vec<Value>) -> StoreHandle {
        let docs = docs.into_iter().filter_map(|v| v.as_object().cloned()).collect();
        StoreHandle::connected(Arc::new(MemoryStore::from_documents(docs)))
    }

    #[test]
    fn test_invalid_id_checked_before_store() {
        let handle = StoreHandle::disconnected("down");
        let service = TransactionService::new(&handle);

        let err = service.load_user_documents("not-an-id").unwrap_err();
        assert!(matches!(err, BudgetError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_disconnected_store_is_unavailable() {
        let handle = StoreHandle::disconnected("down");
        let service = TransactionService::new(&handle);

        let err = service.load_user_documents(USER).unwrap_err();
        assert!(matches!(err, BudgetError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_raw_transactions_are_shaped() {
        let handle = store_with(vec![json!({
            "_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f7"},
            "user_id": {"$oid": USER},
            "amount": {"$numberLong": "1200"},
            "type": "income"
        })]);
        let service = TransactionService::new(&handle);

        let shaped = service.raw_transactions(USER).unwrap();
        assert_eq!(shaped[0]["_id"], json!("65a1f0c2e4b0a1b2c3d4e5f7"));
        assert_eq!(shaped[0]["user_id"], json!(USER));
        assert_eq!(shaped[0]["amount"], json!(1200));
    }

    #[test]
    fn test_unknown_user_is_empty() {
        let handle = store_with(vec![]);
        let service = TransactionService::new(&handle);
        assert_eq!(service.raw_transactions(USER).unwrap(), json!([]));
    }
}
