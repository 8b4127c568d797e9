//! Report CLI commands
//!
//! Runs the same pipelines as the HTTP routes against the configured store
//! and renders the result as JSON.

use clap::Subcommand;
use serde_json::{json, Value};

use crate::config::Settings;
use crate::error::BudgetResult;
use crate::forecasting::ForecastModel;
use crate::server::response::error_body;
use crate::services::{BudgetService, ForecastService, TransactionService};
use crate::storage::StoreHandle;

/// Report subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReportCommands {
    /// Budget insight for a user
    Analyze {
        /// User id (24 hex digits)
        user_id: String,
    },

    /// Daily expense forecast for a user
    Forecast {
        /// User id (24 hex digits)
        user_id: String,
        /// Number of days to forecast
        #[arg(short, long)]
        periods: Option<String>,
    },

    /// Stored transactions of a user, as plain JSON
    #[command(alias = "txn")]
    Transactions {
        /// User id (24 hex digits)
        user_id: String,
    },
}

/// Run a report command
pub fn run_report(
    cmd: &ReportCommands,
    store: &StoreHandle,
    settings: &Settings,
    model: &dyn ForecastModel,
) -> BudgetResult<Value> {
    match cmd {
        ReportCommands::Analyze { user_id } => {
            let insight = BudgetService::new(store, settings).analyze(user_id)?;
            Ok(serde_json::to_value(insight)?)
        }
        ReportCommands::Forecast { user_id, periods } => {
            let service = ForecastService::new(store, settings, model);
            let periods = service.resolve_periods(periods.as_deref())?;
            let points = service.forecast(user_id, periods)?;
            Ok(serde_json::to_value(points)?)
        }
        ReportCommands::Transactions { user_id } => {
            let transactions = TransactionService::new(store).raw_transactions(user_id)?;
            Ok(json!({ "transactions": transactions }))
        }
    }
}

/// Render a report result; the flag is false when the report failed
pub fn render_report(result: BudgetResult<Value>) -> BudgetResult<(String, bool)> {
    match result {
        Ok(value) => Ok((serde_json::to_string_pretty(&value)?, true)),
        Err(e) => Ok((serde_json::to_string_pretty(&error_body(&e))?, false)),
    }
}
