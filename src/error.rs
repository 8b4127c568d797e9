//! Custom error types for the budget insights service
//!
//! Every component returns `BudgetResult<T>`. The HTTP layer turns each
//! variant into an `{"error": ...}` payload, so the `Display` text of a
//! variant is what API clients see.

use thiserror::Error;

/// The main error type for budget insights operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// The user id is not a 24-hex-digit object id
    #[error("Invalid user_id format: {0}")]
    InvalidIdentifier(String),

    /// The store holds no transactions for the user
    #[error("No transactions found for this user")]
    NoData,

    /// Required fields are absent from every stored record
    #[error("Invalid transaction data: missing field(s) {}", .missing.join(", "))]
    InvalidSchema { missing: Vec<&'static str> },

    /// Income or expense totals are zero; carries the partial totals
    #[error("Not enough income or expense data to generate insights")]
    InsufficientData { total_income: f64, total_expense: f64 },

    /// Stored amounts add up to more than a total can hold
    #[error("Transaction amounts are out of range: {0}")]
    AmountOutOfRange(String),

    /// The requested forecast horizon is unusable
    #[error("Invalid periods: {0}")]
    InvalidPeriods(String),

    /// Model fitting or prediction failed
    #[error("Forecast failed: {0}")]
    ComputationFailure(String),

    /// The transaction store could not be reached
    #[error("Transaction store unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BudgetError {
    /// Create an invalid identifier error for the given raw id
    pub fn invalid_identifier(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier(raw.into())
    }

    /// Soft failures still carry a usable partial result
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Errors caused by the caller's input rather than stored data or infrastructure
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_) | Self::InvalidPeriods(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget insights operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_invalid_schema_lists_fields() {
        let err = BudgetError::InvalidSchema {
            missing: vec!["amount", "category"],
        };
        assert_eq!(
            err.to_string(),
            "Invalid transaction data: missing field(s) amount, category"
        );
    }

    #[test]
    fn test_insufficient_data_is_soft() {
        let err = BudgetError::InsufficientData {
            total_income: 0.0,
            total_expense: 120.0,
        };
        assert!(err.is_soft());
        assert!(!BudgetError::NoData.is_soft());
    }

    #[test]
    fn test_client_errors() {
        assert!(BudgetError::invalid_identifier("not-an-id").is_client_error());
        assert!(BudgetError::InvalidPeriods("0".into()).is_client_error());
        assert!(!BudgetError::ServiceUnavailable("down".into()).is_client_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }
}
