//! Transaction model
//!
//! Stored transactions are loose documents. Schema validation turns each one
//! into a [`TransactionRow`], the typed view the analyzer and forecaster read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Raw stored transaction document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field names used in stored documents
pub mod fields {
    pub const ID: &str = "_id";
    pub const USER_ID: &str = "user_id";
    pub const AMOUNT: &str = "amount";
    pub const TYPE: &str = "type";
    pub const CATEGORY: &str = "category";
    pub const DATE: &str = "date";
}

/// Direction of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Any other stored label, kept lowercased
    Other(String),
}

impl TransactionKind {
    /// Classify a stored `type` value, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "income" => Self::Income,
            "expense" => Self::Expense,
            _ => Self::Other(normalized),
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Self::Expense)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Other(label) => write!(f, "{}", label),
        }
    }
}

/// A validated transaction row
///
/// `amount` is always present: rows whose amount fails coercion never become
/// rows. The remaining fields are optional because each consumer requires a
/// different subset.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub id: Option<TransactionId>,
    pub amount: Money,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionRow {
    /// Create a row with only an amount
    pub fn new(amount: Money) -> Self {
        Self {
            id: None,
            amount,
            kind: None,
            category: None,
            date: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind.as_ref().is_some_and(TransactionKind::is_income)
    }

    pub fn is_expense(&self) -> bool {
        self.kind.as_ref().is_some_and(TransactionKind::is_expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(TransactionKind::from_label("Income"), TransactionKind::Income);
        assert_eq!(TransactionKind::from_label(" EXPENSE "), TransactionKind::Expense);
        assert_eq!(
            TransactionKind::from_label("Transfer"),
            TransactionKind::Other("transfer".into())
        );
    }

    #[test]
    fn test_row_builders() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let row = TransactionRow::new(Money::from_cents(-5000))
            .with_kind(TransactionKind::Expense)
            .with_category("Food")
            .with_date(date);

        assert!(row.is_expense());
        assert!(!row.is_income());
        assert_eq!(row.category.as_deref(), Some("Food"));
        assert_eq!(row.date, Some(date));
    }

    #[test]
    fn test_row_without_kind_is_neither() {
        let row = TransactionRow::new(Money::from_cents(100));
        assert!(!row.is_income());
        assert!(!row.is_expense());
    }
}
