//! Process-wide store handle
//!
//! The handle connects on first use and remembers the outcome. A failed
//! connection leaves the service running: every data request then fails with
//! `ServiceUnavailable` instead of retrying or crashing.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::{BudgetError, BudgetResult};

use super::{JsonTransactionStore, MemoryStore, TransactionStore};

#[derive(Clone)]
enum StoreState {
    Connected(Arc<dyn TransactionStore>),
    Disconnected(String),
}

/// Lazily connected, injectable handle to the transaction store
pub struct StoreHandle {
    uri: Option<String>,
    state: OnceLock<StoreState>,
}

impl StoreHandle {
    /// Handle that connects to `uri` on first use; `None` means unconfigured
    pub fn from_uri(uri: Option<String>) -> Self {
        Self {
            uri,
            state: OnceLock::new(),
        }
    }

    /// Handle around an already connected store
    pub fn connected(store: Arc<dyn TransactionStore>) -> Self {
        Self {
            uri: None,
            state: OnceLock::from(StoreState::Connected(store)),
        }
    }

    /// Handle that is permanently disconnected
    pub fn disconnected(reason: impl Into<String>) -> Self {
        Self {
            uri: None,
            state: OnceLock::from(StoreState::Disconnected(reason.into())),
        }
    }

    /// The connected store, initializing the connection if needed
    pub fn store(&self) -> BudgetResult<Arc<dyn TransactionStore>> {
        match self.state() {
            StoreState::Connected(store) => Ok(Arc::clone(store)),
            StoreState::Disconnected(reason) => {
                Err(BudgetError::ServiceUnavailable(reason.clone()))
            }
        }
    }

    /// Whether the store is usable, initializing the connection if needed
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), StoreState::Connected(_))
    }

    fn state(&self) -> &StoreState {
        self.state.get_or_init(|| {
            let Some(uri) = self.uri.as_deref() else {
                tracing::warn!("No transaction store configured");
                return StoreState::Disconnected(
                    "Transaction store is not configured".to_string(),
                );
            };

            match connect(uri) {
                Ok(store) => {
                    tracing::info!(store = %store.describe(), "Transaction store connected");
                    StoreState::Connected(store)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Transaction store connection failed");
                    StoreState::Disconnected(e.to_string())
                }
            }
        })
    }
}

/// Open a store from a connection string
///
/// Supported forms: `file://<path>`, `memory://`, or a bare file path.
pub fn connect(uri: &str) -> BudgetResult<Arc<dyn TransactionStore>> {
    let uri = uri.trim();

    match uri.split_once("://") {
        Some(("file", path)) => open_file(Path::new(path)),
        Some(("memory", _)) => Ok(Arc::new(MemoryStore::new())),
        Some((scheme, _)) => Err(BudgetError::ServiceUnavailable(format!(
            "Unsupported store scheme '{}'",
            scheme
        ))),
        None if uri.is_empty() => Err(BudgetError::ServiceUnavailable(
            "Empty store connection string".to_string(),
        )),
        None => open_file(Path::new(uri)),
    }
}

fn open_file(path: &Path) -> BudgetResult<Arc<dyn TransactionStore>> {
    let store = JsonTransactionStore::open(path).map_err(|e| match e {
        BudgetError::ServiceUnavailable(_) => e,
        other => BudgetError::ServiceUnavailable(other.to_string()),
    })?;
    Ok(Arc::new(store))
}
