//! Forecast service
//!
//! Builds a daily expense series for a user and projects it forward with the
//! configured [`ForecastModel`]. The model is refitted on every request.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::forecasting::ForecastModel;
use crate::models::{Document, ForecastPoint, Money, TransactionRow};
use crate::services::schema::{validate_documents, RequiredFields};
use crate::services::TransactionService;
use crate::storage::StoreHandle;

/// Service for expense forecasting
pub struct ForecastService<'a> {
    store: &'a StoreHandle,
    settings: &'a Settings,
    model: &'a dyn ForecastModel,
}

impl<'a> ForecastService<'a> {
    /// Create a new forecast service
    pub fn new(store: &'a StoreHandle, settings: &'a Settings, model: &'a dyn ForecastModel) -> Self {
        Self {
            store,
            settings,
            model,
        }
    }

    /// Resolve a raw `periods` parameter, falling back to the configured default
    pub fn resolve_periods(&self, raw: Option<&str>) -> BudgetResult<u32> {
        let Some(raw) = raw else {
            return Ok(self.settings.default_forecast_periods);
        };

        let periods: i64 = raw
            .trim()
            .parse()
            .map_err(|_| BudgetError::InvalidPeriods(format!("'{}' is not an integer", raw)))?;
        self.check_periods(periods)
    }

    /// Check a numeric horizon against the configured bounds
    pub fn check_periods(&self, periods: i64) -> BudgetResult<u32> {
        let max = self.settings.max_forecast_periods;
        if periods < 1 || periods > i64::from(max) {
            return Err(BudgetError::InvalidPeriods(format!(
                "must be between 1 and {}, got {}",
                max, periods
            )));
        }
        u32::try_from(periods).map_err(|_| BudgetError::InvalidPeriods(periods.to_string()))
    }

    /// Forecast a user's daily expenses for the next `periods` days
    pub fn forecast(&self, raw_user_id: &str, periods: u32) -> BudgetResult<Vec<ForecastPoint>> {
        let periods = self.check_periods(i64::from(periods))?;
        let (user_id, documents) =
            TransactionService::new(self.store).load_user_documents(raw_user_id)?;

        let points = self.forecast_documents(&documents, periods)?;
        tracing::info!(user_id = %user_id, periods, "Generated expense forecast");
        Ok(points)
    }

    /// Forecast from raw documents
    pub fn forecast_documents(
        &self,
        documents: &[Document],
        periods: u32,
    ) -> BudgetResult<Vec<ForecastPoint>> {
        let validated = validate_documents(documents, RequiredFields::FORECAST)?;
        let series = daily_expense_series(&validated.rows)?;
        forecast_series(self.model, &series, periods)
    }
}

/// Sum expense amounts per calendar date, ordered by date
pub fn daily_expense_series(rows: &[TransactionRow]) -> BudgetResult<Vec<(NaiveDate, f64)>> {
    let mut by_date: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.is_expense()) {
        if let Some(date) = row.date {
            let total = by_date.entry(date).or_insert_with(Money::zero);
            *total = total.checked_add(row.amount).ok_or_else(|| {
                BudgetError::AmountOutOfRange(format!("expense total for {date} overflows"))
            })?;
        }
    }
    Ok(by_date
        .into_iter()
        .map(|(date, total)| (date, total.to_f64()))
        .collect())
}

/// Fit `model` on `series` and return predictions for the `periods` days
/// following the last observation
///
/// Predictions are made over the history plus the future dates; only the
/// future tail is returned.
pub fn forecast_series(
    model: &dyn ForecastModel,
    series: &[(NaiveDate, f64)],
    periods: u32,
) -> BudgetResult<Vec<ForecastPoint>> {
    let fitted = model
        .fit(series)
        .map_err(|e| BudgetError::ComputationFailure(e.to_string()))?;

    let last = series
        .last()
        .map(|(date, _)| *date)
        .ok_or_else(|| BudgetError::ComputationFailure("No expense dates to fit".into()))?;

    let future = (1..=i64::from(periods))
        .map(|offset| last.checked_add_signed(Duration::days(offset)))
        .collect::<Option<Vec<NaiveDate>>>()
        .ok_or_else(|| {
            BudgetError::ComputationFailure(format!(
                "Forecast dates after {last} are out of the supported calendar range"
            ))
        })?;
    let dates: Vec<NaiveDate> = series.iter().map(|(date, _)| *date).chain(future).collect();

    let predictions = fitted
        .predict(&dates)
        .map_err(|e| BudgetError::ComputationFailure(e.to_string()))?;
    if predictions.len() != dates.len() {
        return Err(BudgetError::ComputationFailure(format!(
            "Model returned {} predictions for {} dates",
            predictions.len(),
            dates.len()
        )));
    }

    let skip = dates.len() - periods as usize;
    Ok(dates
        .into_iter()
        .zip(predictions)
        .skip(skip)
        .map(|(date, p)| ForecastPoint {
            date,
            predicted: p.estimate,
            lower: p.lower,
            upper: p.upper,
        })
        .collect())
}
