//! Service layer for budget insights
//!
//! The service layer provides the business logic on top of the storage layer:
//! id validation, schema coercion, budget analysis and forecasting.

pub mod budget;
pub mod forecast;
pub mod schema;
pub mod transaction;

pub use budget::BudgetService;
pub use forecast::{daily_expense_series, forecast_series, ForecastService};
pub use schema::{RequiredFields, SkipReason, SkippedRow, ValidatedRows};
pub use transaction::TransactionService;
