//! Storage layer for the budget insights service
//!
//! Transactions live in an external document store and are read-only here.
//! [`TransactionStore`] is the seam: a JSON file store backs production use,
//! an in-memory store backs tests. [`StoreHandle`] owns the process-wide
//! connection and its connected/disconnected state.

pub mod file_io;
pub mod handle;
pub mod memory;
pub mod transactions;

pub use file_io::read_json_required;
pub use handle::{connect, StoreHandle};
pub use memory::MemoryStore;
pub use transactions::JsonTransactionStore;

use std::collections::HashMap;

use crate::error::BudgetResult;
use crate::models::{fields, Document, UserId};

/// Read access to stored transaction documents
pub trait TransactionStore: Send + Sync {
    /// All documents whose `user_id` is the given user, in stored order
    fn find_by_user(&self, user_id: UserId) -> BudgetResult<Vec<Document>>;

    /// Short description for logs and health output
    fn describe(&self) -> String;
}

/// Group documents by their `user_id` field
///
/// Returns the index and the number of documents without a usable user id.
pub(crate) fn index_by_user(documents: Vec<Document>) -> (HashMap<UserId, Vec<Document>>, usize) {
    let mut by_user: HashMap<UserId, Vec<Document>> = HashMap::new();
    let mut unindexed = 0;

    for doc in documents {
        let user = doc
            .get(fields::USER_ID)
            .and_then(|v| serde_json::from_value::<UserId>(v.clone()).ok());
        match user {
            Some(user) => by_user.entry(user).or_default().push(doc),
            None => unindexed += 1,
        }
    }

    (by_user, unindexed)
}
