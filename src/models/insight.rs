//! Budget insight model
//!
//! The per-user summary returned by the budget analyzer. Maps are ordered so
//! responses are stable across requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message attached to a successful analysis
pub const INSIGHT_MESSAGE: &str = "Budget insights generated successfully";

/// Category label for expenses stored without a usable category
pub const UNCATEGORIZED: &str = "nan";

/// Derived per-user budget summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInsight {
    pub message: String,
    pub total_income: f64,
    pub total_expense: f64,
    /// Suggested allocation per category, rounded to cents
    pub suggested_budget: BTreeMap<String, f64>,
    /// Historical expense sum per category
    pub category_expenses: BTreeMap<String, f64>,
    /// Human-readable anomaly message per flagged category
    pub anomalies: BTreeMap<String, String>,
}

impl BudgetInsight {
    /// Sum of all suggested allocations
    pub fn suggested_total(&self) -> f64 {
        self.suggested_budget.values().sum()
    }
}

/// Round to two decimal places, half away from zero
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
