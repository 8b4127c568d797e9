//! Schema validation for stored transaction documents
//!
//! Documents in the store are loosely typed: amounts may be numbers, numeric
//! strings or extended JSON decimals, and dates come in several encodings.
//! Validation coerces each field explicitly and yields either a typed
//! [`TransactionRow`] or a [`SkippedRow`] recording why the document was left
//! out of the analysis. The stored document itself is never modified.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fmt;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{fields, Document, Money, TransactionId, TransactionKind, TransactionRow};

/// Date-time layouts accepted besides RFC 3339
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date layouts accepted for plain calendar dates
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Why a document was excluded from analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingAmount,
    InvalidAmount(String),
    MissingDate,
    InvalidDate(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAmount => write!(f, "missing amount"),
            Self::InvalidAmount(raw) => write!(f, "amount is not numeric: {}", raw),
            Self::MissingDate => write!(f, "missing date"),
            Self::InvalidDate(raw) => write!(f, "date is not a calendar date: {}", raw),
        }
    }
}

/// A document that did not become a row
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Position of the document in the store's result
    pub index: usize,
    pub id: Option<TransactionId>,
    pub reason: SkipReason,
}

/// Result of validating a user's documents
#[derive(Debug, Clone, Default)]
pub struct ValidatedRows {
    pub rows: Vec<TransactionRow>,
    pub skipped: Vec<SkippedRow>,
}

/// Fields a consumer requires, checked against the whole record set
#[derive(Debug, Clone, Copy)]
pub struct RequiredFields {
    names: &'static [&'static str],
}

impl RequiredFields {
    /// Fields the budget analyzer reads
    pub const ANALYSIS: Self = Self {
        names: &[fields::AMOUNT, fields::TYPE, fields::CATEGORY],
    };

    /// Fields the forecast engine reads
    pub const FORECAST: Self = Self {
        names: &[fields::AMOUNT, fields::TYPE, fields::DATE],
    };

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    fn requires_date(&self) -> bool {
        self.names.contains(&fields::DATE)
    }
}

/// Fail when a required field is absent from every document
///
/// A field present in at least one document passes; individual documents
/// lacking it are handled per row.
pub fn check_schema(documents: &[Document], required: RequiredFields) -> BudgetResult<()> {
    let missing: Vec<&'static str> = required
        .names()
        .iter()
        .copied()
        .filter(|name| !documents.iter().any(|doc| doc.contains_key(*name)))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BudgetError::InvalidSchema { missing })
    }
}

/// Validate a user's documents into typed rows
pub fn validate_documents(
    documents: &[Document],
    required: RequiredFields,
) -> BudgetResult<ValidatedRows> {
    if documents.is_empty() {
        return Err(BudgetError::NoData);
    }
    check_schema(documents, required)?;

    let mut validated = ValidatedRows::default();
    for (index, doc) in documents.iter().enumerate() {
        match validate_document(doc, required) {
            Ok(row) => validated.rows.push(row),
            Err(reason) => validated.skipped.push(SkippedRow {
                index,
                id: coerce_id(doc.get(fields::ID)),
                reason,
            }),
        }
    }

    if !validated.skipped.is_empty() {
        tracing::debug!(
            kept = validated.rows.len(),
            skipped = validated.skipped.len(),
            "Dropped documents that failed coercion"
        );
    }

    Ok(validated)
}

/// Coerce one document into a row, or decide to skip it
pub fn validate_document(doc: &Document, required: RequiredFields) -> Result<TransactionRow, SkipReason> {
    let amount = coerce_amount(doc.get(fields::AMOUNT))?;

    let date = match coerce_date(doc.get(fields::DATE)) {
        Ok(date) => Some(date),
        Err(reason) if required.requires_date() => return Err(reason),
        Err(_) => None,
    };

    Ok(TransactionRow {
        id: coerce_id(doc.get(fields::ID)),
        amount,
        kind: doc.get(fields::TYPE).and_then(coerce_kind),
        category: doc.get(fields::CATEGORY).and_then(coerce_category),
        date,
    })
}

/// Coerce a stored amount to money
pub fn coerce_amount(value: Option<&Value>) -> Result<Money, SkipReason> {
    match value {
        None | Some(Value::Null) => Err(SkipReason::MissingAmount),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| SkipReason::InvalidAmount(n.to_string()))
            .and_then(|v| {
                Money::from_f64(v).map_err(|_| SkipReason::InvalidAmount(n.to_string()))
            }),
        Some(Value::String(s)) => {
            Money::parse(s).map_err(|_| SkipReason::InvalidAmount(s.clone()))
        }
        Some(Value::Object(map)) => {
            let inner = ["$numberDecimal", "$numberDouble", "$numberLong", "$numberInt"]
                .iter()
                .find_map(|key| map.get(*key));
            match inner {
                Some(Value::String(s)) => {
                    Money::parse(s).map_err(|_| SkipReason::InvalidAmount(s.clone()))
                }
                _ => Err(SkipReason::InvalidAmount(Value::Object(map.clone()).to_string())),
            }
        }
        Some(other) => Err(SkipReason::InvalidAmount(other.to_string())),
    }
}

/// Coerce a stored date to a calendar date (UTC)
pub fn coerce_date(value: Option<&Value>) -> Result<NaiveDate, SkipReason> {
    match value {
        None | Some(Value::Null) => Err(SkipReason::MissingDate),
        Some(Value::String(s)) => parse_date_str(s).ok_or_else(|| SkipReason::InvalidDate(s.clone())),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(date_from_millis)
            .ok_or_else(|| SkipReason::InvalidDate(n.to_string())),
        Some(Value::Object(map)) => {
            if let Some(inner) = map.get("$date") {
                return coerce_date(Some(inner));
            }
            match map.get("$numberLong") {
                Some(Value::String(s)) => s
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(date_from_millis)
                    .ok_or_else(|| SkipReason::InvalidDate(s.clone())),
                _ => Err(SkipReason::InvalidDate(Value::Object(map.clone()).to_string())),
            }
        }
        Some(other) => Err(SkipReason::InvalidDate(other.to_string())),
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Classify a stored `type`; non-string values have no kind
pub fn coerce_kind(value: &Value) -> Option<TransactionKind> {
    value.as_str().map(TransactionKind::from_label)
}

/// Category label; scalars are rendered as text, null means no category
pub fn coerce_category(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_id(value: Option<&Value>) -> Option<TransactionId> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_amount_coercion() {
        assert_eq!(coerce_amount(Some(&json!(12.5))), Ok(Money::from_cents(1250)));
        assert_eq!(coerce_amount(Some(&json!("40"))), Ok(Money::from_cents(4000)));
        assert_eq!(
            coerce_amount(Some(&json!({"$numberDecimal": "19.99"}))),
            Ok(Money::from_cents(1999))
        );
        assert_eq!(coerce_amount(None), Err(SkipReason::MissingAmount));
        assert_eq!(coerce_amount(Some(&Value::Null)), Err(SkipReason::MissingAmount));
        assert_eq!(
            coerce_amount(Some(&json!("lots"))),
            Err(SkipReason::InvalidAmount("lots".into()))
        );
        assert!(coerce_amount(Some(&json!(true))).is_err());
        assert_eq!(
            coerce_amount(Some(&json!("90000000000000000"))),
            Err(SkipReason::InvalidAmount("90000000000000000".into()))
        );
        assert_eq!(coerce_amount(Some(&json!("10.999"))), Ok(Money::from_cents(1100)));
    }

    #[test]
    fn test_date_coercion() {
        let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(coerce_date(Some(&json!("2024-01-01"))), Ok(jan_1));
        assert_eq!(coerce_date(Some(&json!("2024-01-01T18:30:00Z"))), Ok(jan_1));
        assert_eq!(coerce_date(Some(&json!("2024-01-01T18:30:00.250"))), Ok(jan_1));
        assert_eq!(coerce_date(Some(&json!(1704067200000_i64))), Ok(jan_1));
        assert_eq!(
            coerce_date(Some(&json!({"$date": {"$numberLong": "1704067200000"}}))),
            Ok(jan_1)
        );
        assert_eq!(
            coerce_date(Some(&json!({"$date": "2024-01-01T00:00:00.000Z"}))),
            Ok(jan_1)
        );
        assert_eq!(coerce_date(None), Err(SkipReason::MissingDate));
        assert!(matches!(
            coerce_date(Some(&json!("yesterday"))),
            Err(SkipReason::InvalidDate(_))
        ));
    }

    #[test]
    fn test_kind_and_category() {
        assert_eq!(coerce_kind(&json!("Expense")), Some(TransactionKind::Expense));
        assert_eq!(coerce_kind(&json!(3)), None);
        assert_eq!(coerce_category(&json!("Food")), Some("Food".into()));
        assert_eq!(coerce_category(&json!(42)), Some("42".into()));
        assert_eq!(coerce_category(&Value::Null), None);
    }

    #[test]
    fn test_schema_requires_field_somewhere() {
        let docs = vec![
            doc(json!({"amount": 10, "type": "expense", "category": "Food"})),
            doc(json!({"amount": 10, "type": "income"})),
        ];
        assert!(check_schema(&docs, RequiredFields::ANALYSIS).is_ok());

        let err = check_schema(&docs, RequiredFields::FORECAST).unwrap_err();
        match err {
            BudgetError::InvalidSchema { missing } => assert_eq!(missing, vec!["date"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_documents_is_no_data() {
        let err = validate_documents(&[], RequiredFields::ANALYSIS).unwrap_err();
        assert!(matches!(err, BudgetError::NoData));
    }

    #[test]
    fn test_bad_amounts_are_skipped_with_reason() {
        let docs = vec![
            doc(json!({"_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "amount": "n/a", "type": "expense", "category": "Food"})),
            doc(json!({"amount": 25, "type": "expense", "category": "Food"})),
            doc(json!({"type": "income", "category": "Salary"})),
        ];

        let validated = validate_documents(&docs, RequiredFields::ANALYSIS).unwrap();
        assert_eq!(validated.rows.len(), 1);
        assert_eq!(validated.skipped.len(), 2);
        assert_eq!(validated.skipped[0].index, 0);
        assert!(validated.skipped[0].id.is_some());
        assert_eq!(validated.skipped[0].reason, SkipReason::InvalidAmount("n/a".into()));
        assert_eq!(validated.skipped[1].reason, SkipReason::MissingAmount);
    }

    #[test]
    fn test_bad_dates_only_matter_when_required() {
        let docs = vec![doc(json!({
            "amount": 25, "type": "expense", "category": "Food", "date": "someday"
        }))];

        let analysis = validate_documents(&docs, RequiredFields::ANALYSIS).unwrap();
        assert_eq!(analysis.rows.len(), 1);
        assert_eq!(analysis.rows[0].date, None);

        let forecast = validate_documents(&docs, RequiredFields::FORECAST).unwrap();
        assert!(forecast.rows.is_empty());
        assert!(matches!(forecast.skipped[0].reason, SkipReason::InvalidDate(_)));
    }
}
