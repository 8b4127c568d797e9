//! Core data models for the budget insights service
//!
//! Identifiers, money, validated transaction rows and the two derived
//! results: budget insights and forecast points.

pub mod forecast;
pub mod ids;
pub mod insight;
pub mod money;
pub mod transaction;

pub use forecast::ForecastPoint;
pub use ids::{IdParseError, ObjectId, TransactionId, UserId};
pub use insight::{round_cents, BudgetInsight, INSIGHT_MESSAGE, UNCATEGORIZED};
pub use money::{Money, MoneyParseError};
pub use transaction::{fields, Document, TransactionKind, TransactionRow};
