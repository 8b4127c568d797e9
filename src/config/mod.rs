//! Configuration module for the budget insights service
//!
//! - `settings`: tunables loaded from an optional JSON file
//! - the store connection string, read from a single environment variable

pub mod settings;

pub use settings::Settings;

/// Environment variable holding the transaction store connection string
pub const STORE_URI_ENV: &str = "BUDGET_STORE_URI";
