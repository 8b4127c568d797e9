//! budget-insights - Budget analysis and expense forecasting service
//!
//! This library reads a user's transactions from a document store, suggests a
//! per-category budget proportional to historical spending, flags anomalous
//! spending, and forecasts future daily expenses.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Service settings
//! - `error`: Custom error types
//! - `models`: Identifiers, money, transactions and result types
//! - `storage`: Transaction stores and the shared store handle
//! - `services`: Schema validation, budget analysis and forecasting logic
//! - `analysis`: Spending statistics and anomaly detection
//! - `forecasting`: The pluggable time series model
//! - `export`: Plain JSON shaping of stored documents
//! - `server`: HTTP routes
//! - `cli`: Command line reports
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_insights::config::Settings;
//! use budget_insights::services::BudgetService;
//! use budget_insights::storage::StoreHandle;
//!
//! let store = StoreHandle::from_uri(Some("file://transactions.json".into()));
//! let settings = Settings::default();
//! let insight = BudgetService::new(&store, &settings).analyze("65a1f0c2e4b0a1b2c3d4e5f6")?;
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod forecasting;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
