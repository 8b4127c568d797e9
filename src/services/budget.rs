//! Budget service
//!
//! Computes a user's budget insight: income and expense totals, expense sums
//! per category, a suggested allocation of income proportional to historical
//! spending, and anomalous spending per category.

use std::collections::BTreeMap;

use crate::analysis::AnomalyDetector;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    round_cents, BudgetInsight, Document, Money, TransactionRow, INSIGHT_MESSAGE, UNCATEGORIZED,
};
use crate::services::schema::{validate_documents, RequiredFields};
use crate::services::TransactionService;
use crate::storage::StoreHandle;

/// Service for budget analysis
pub struct BudgetService<'a> {
    store: &'a StoreHandle,
    settings: &'a Settings,
}

/// Expense amounts grouped by category, in category order
type CategoryAmounts = BTreeMap<String, Vec<Money>>;

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(store: &'a StoreHandle, settings: &'a Settings) -> Self {
        Self { store, settings }
    }

    /// Analyze the stored transactions of a user
    pub fn analyze(&self, raw_user_id: &str) -> BudgetResult<BudgetInsight> {
        let (user_id, documents) =
            TransactionService::new(self.store).load_user_documents(raw_user_id)?;

        let insight = self.analyze_documents(&documents)?;
        tracing::info!(
            user_id = %user_id,
            categories = insight.category_expenses.len(),
            anomalies = insight.anomalies.len(),
            "Generated budget insight"
        );
        Ok(insight)
    }

    /// Analyze raw documents
    pub fn analyze_documents(&self, documents: &[Document]) -> BudgetResult<BudgetInsight> {
        let validated = validate_documents(documents, RequiredFields::ANALYSIS)?;
        self.analyze_rows(&validated.rows)
    }

    /// Analyze typed rows
    pub fn analyze_rows(&self, rows: &[TransactionRow]) -> BudgetResult<BudgetInsight> {
        let total_income = checked_total(
            rows.iter().filter(|r| r.is_income()).map(|r| r.amount),
            "income",
        )?;
        let by_category = group_expenses(rows);

        let category_totals = by_category
            .iter()
            .map(|(category, amounts)| {
                checked_total(amounts.iter().copied(), category).map(|total| (category.clone(), total))
            })
            .collect::<BudgetResult<BTreeMap<String, Money>>>()?;
        let total_expense = checked_total(category_totals.values().copied(), "expense")?;

        if total_income.is_zero() || total_expense.is_zero() {
            return Err(BudgetError::InsufficientData {
                total_income: total_income.to_f64(),
                total_expense: total_expense.to_f64(),
            });
        }

        let income = total_income.to_f64();
        let expense = total_expense.to_f64();
        let suggested_budget = category_totals
            .iter()
            .map(|(category, spent)| {
                let share = spent.to_f64() / expense;
                (category.clone(), round_cents(share * income))
            })
            .collect();

        let detector = AnomalyDetector::new(self.settings.anomaly_rule, self.settings.anomaly_sigma);
        let anomalies = by_category
            .iter()
            .filter_map(|(category, amounts)| detector.detect(category, amounts))
            .map(|anomaly| (anomaly.category.clone(), anomaly.message()))
            .collect();

        Ok(BudgetInsight {
            message: INSIGHT_MESSAGE.to_string(),
            total_income: income,
            total_expense: expense,
            suggested_budget,
            category_expenses: category_totals
                .into_iter()
                .map(|(category, spent)| (category, spent.to_f64()))
                .collect(),
            anomalies,
        })
    }
}

/// Group expense amounts by category
///
/// Expenses without a category are grouped under [`UNCATEGORIZED`] and count
/// towards the totals like any other category.
fn group_expenses(rows: &[TransactionRow]) -> CategoryAmounts {
    let mut by_category = CategoryAmounts::new();
    for row in rows.iter().filter(|r| r.is_expense()) {
        let category = row.category.as_deref().unwrap_or(UNCATEGORIZED);
        by_category.entry(category.to_string()).or_default().push(row.amount);
    }
    by_category
}

fn checked_total(amounts: impl IntoIterator<Item = Money>, what: &str) -> BudgetResult<Money> {
    Money::checked_sum(amounts)
        .ok_or_else(|| BudgetError::AmountOutOfRange(format!("{what} total overflows")))
}
