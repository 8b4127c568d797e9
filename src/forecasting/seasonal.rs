//! Linear trend with day-of-week seasonality
//!
//! The trend is an ordinary least squares line over the day offset from the
//! first observation. Once the series spans at least two weeks, the mean
//! residual per weekday is added as a seasonal factor; factors are centered so
//! they sum to zero and never shift the trend.

use chrono::{Datelike, NaiveDate};

use crate::analysis::stats::population_std_dev;

use super::{ensure_ordered, FittedModel, ForecastModel, ModelError, Prediction, PredictionInterval};

const MIN_OBSERVATIONS: usize = 2;
const DEFAULT_INTERVAL_WIDTH: f64 = 0.8;
const DEFAULT_WEEKLY_MIN_SPAN_DAYS: i64 = 14;

/// Daily forecasting model: linear trend plus optional weekly seasonality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSeasonalModel {
    interval_width: f64,
    weekly_min_span_days: i64,
}

impl Default for TrendSeasonalModel {
    fn default() -> Self {
        Self {
            interval_width: DEFAULT_INTERVAL_WIDTH,
            weekly_min_span_days: DEFAULT_WEEKLY_MIN_SPAN_DAYS,
        }
    }
}

impl TrendSeasonalModel {
    /// Model with the given two-sided interval coverage
    pub fn new(interval_width: f64) -> Self {
        Self {
            interval_width,
            ..Self::default()
        }
    }

    /// Minimum history span, in days, before weekly factors are fitted
    pub fn with_weekly_min_span(mut self, days: i64) -> Self {
        self.weekly_min_span_days = days;
        self
    }

    /// Fit trend, weekly factors and interval, keeping the concrete type
    pub fn fit_coefficients(
        &self,
        series: &[(NaiveDate, f64)],
    ) -> Result<FittedTrendSeasonal, ModelError> {
        ensure_ordered(series)?;
        if series.len() < MIN_OBSERVATIONS {
            return Err(ModelError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: series.len(),
            });
        }
        if series.iter().any(|(_, y)| !y.is_finite()) {
            return Err(ModelError::NumericalError(
                "Series contains non-finite values".to_string(),
            ));
        }

        let origin = series[0].0;
        let last = series[series.len() - 1].0;
        let x: Vec<f64> = series
            .iter()
            .map(|(date, _)| (*date - origin).num_days() as f64)
            .collect();
        let y: Vec<f64> = series.iter().map(|(_, v)| *v).collect();

        let (intercept, slope) = ordinary_least_squares(&x, &y)?;
        let trend_residuals: Vec<f64> = x
            .iter()
            .zip(&y)
            .map(|(xi, yi)| yi - (intercept + slope * xi))
            .collect();

        let span = (last - origin).num_days();
        let weekly = if span >= self.weekly_min_span_days {
            weekday_factors(series, &trend_residuals)
        } else {
            [0.0; 7]
        };

        let residuals: Vec<f64> = series
            .iter()
            .zip(&trend_residuals)
            .map(|((date, _), r)| r - weekly[weekday_index(*date)])
            .collect();
        let residual_std = population_std_dev(&residuals).unwrap_or(0.0);

        Ok(FittedTrendSeasonal {
            origin,
            last,
            intercept,
            slope,
            weekly,
            interval: PredictionInterval::new(residual_std, self.interval_width),
        })
    }
}

impl ForecastModel for TrendSeasonalModel {
    fn fit(&self, series: &[(NaiveDate, f64)]) -> Result<Box<dyn FittedModel>, ModelError> {
        Ok(Box::new(self.fit_coefficients(series)?))
    }
}

/// Coefficients of a fitted [`TrendSeasonalModel`]
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTrendSeasonal {
    origin: NaiveDate,
    last: NaiveDate,
    intercept: f64,
    slope: f64,
    weekly: [f64; 7],
    interval: PredictionInterval,
}

impl FittedTrendSeasonal {
    /// Seasonal factors indexed Monday = 0 through Sunday = 6
    pub fn weekly_factors(&self) -> &[f64; 7] {
        &self.weekly
    }
}

impl FittedModel for FittedTrendSeasonal {
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<Prediction>, ModelError> {
        let predictions = dates
            .iter()
            .map(|date| {
                let x = (*date - self.origin).num_days() as f64;
                let estimate = self.intercept + self.slope * x + self.weekly[weekday_index(*date)];
                let horizon = (*date - self.last).num_days().max(0);
                let horizon = u32::try_from(horizon).unwrap_or(u32::MAX);
                self.interval.around(estimate, horizon)
            })
            .collect::<Vec<_>>();

        if predictions.iter().any(|p| !p.estimate.is_finite()) {
            return Err(ModelError::NumericalError(
                "Prediction is not finite".to_string(),
            ));
        }
        Ok(predictions)
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Fit `y = intercept + slope * x`
fn ordinary_least_squares(x: &[f64], y: &[f64]) -> Result<(f64, f64), ModelError> {
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (numerator, denominator) = x.iter().zip(y).fold((0.0, 0.0), |(num, den), (xi, yi)| {
        let dx = xi - x_mean;
        (num + dx * (yi - y_mean), den + dx * dx)
    });

    if denominator.abs() < 1e-10 {
        return Err(ModelError::NumericalError(
            "All observations share one date".to_string(),
        ));
    }

    let slope = numerator / denominator;
    Ok((y_mean - slope * x_mean, slope))
}

/// Mean residual per weekday, centered over the weekdays observed
fn weekday_factors(series: &[(NaiveDate, f64)], residuals: &[f64]) -> [f64; 7] {
    let mut sums = [0.0; 7];
    let mut counts = [0usize; 7];
    for ((date, _), r) in series.iter().zip(residuals) {
        let i = weekday_index(*date);
        sums[i] += r;
        counts[i] += 1;
    }

    let mut factors = [0.0; 7];
    let mut observed = 0usize;
    for i in 0..7 {
        if counts[i] > 0 {
            factors[i] = sums[i] / counts[i] as f64;
            observed += 1;
        }
    }
    if observed == 0 {
        return factors;
    }

    let mean = factors.iter().sum::<f64>() / observed as f64;
    for i in 0..7 {
        if counts[i] > 0 {
            factors[i] -= mean;
        }
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start() -> NaiveDate {
        // A Monday
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    fn series(values: &[f64]) -> Vec<(NaiveDate, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start() + Duration::days(i as i64), *v))
            .collect()
    }

    fn future(from: NaiveDate, days: i64) -> Vec<NaiveDate> {
        (1..=days).map(|d| from + Duration::days(d)).collect()
    }

    #[test]
    fn test_constant_series_predicts_constant() {
        let data = series(&[42.0; 30]);
        let last = data[data.len() - 1].0;
        let fitted = TrendSeasonalModel::default().fit(&data).unwrap();

        let predictions = fitted.predict(&future(last, 10)).unwrap();
        assert_eq!(predictions.len(), 10);
        for p in predictions {
            assert!((p.estimate - 42.0).abs() < 1e-9);
            assert!((p.lower - 42.0).abs() < 1e-9);
            assert!((p.upper - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let values: Vec<f64> = (0..10).map(|i| 10.0 + 2.0 * i as f64).collect();
        let data = series(&values);
        let model = TrendSeasonalModel::default();
        let fitted = model.fit(&data).unwrap();

        let next = start() + Duration::days(10);
        let p = fitted.predict(&[next]).unwrap()[0];
        assert!((p.estimate - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_pattern_is_learned() {
        // Spending spikes every Saturday
        let values: Vec<f64> = (0..28)
            .map(|i| if i % 7 == 5 { 100.0 } else { 10.0 })
            .collect();
        let data = series(&values);
        let last = data[data.len() - 1].0;
        let fitted = TrendSeasonalModel::default().fit(&data).unwrap();

        let predictions = fitted.predict(&future(last, 7)).unwrap();
        let saturday = start() + Duration::days(33);
        let saturday_idx = future(last, 7).iter().position(|d| *d == saturday).unwrap();
        let max_idx = predictions
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.estimate.total_cmp(&b.1.estimate))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(max_idx, saturday_idx);
    }

    #[test]
    fn test_short_span_skips_weekly_factors() {
        // Span below the minimum: the alternation stays in the residuals
        let data = series(&[5.0, 9.0, 5.0, 9.0, 5.0]);
        let last = data[data.len() - 1].0;
        let short = TrendSeasonalModel::default().fit(&data).unwrap();
        let p = short.predict(&future(last, 1)).unwrap()[0];
        assert!(p.upper > p.lower);

        // One factor per observed weekday absorbs every residual
        let eager = TrendSeasonalModel::default()
            .with_weekly_min_span(1)
            .fit(&data)
            .unwrap();
        let p = eager.predict(&[data[1].0]).unwrap()[0];
        assert!((p.upper - p.lower).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_factors_sum_to_zero() {
        let values: Vec<f64> = (0..21).map(|i| (i % 7) as f64 * 3.0 + 1.0).collect();
        let model = TrendSeasonalModel::default();
        let data = series(&values);
        let fitted = model.fit(&data).unwrap();
        let last = data[data.len() - 1].0;
        let dates = future(last, 7);
        let predictions = fitted.predict(&dates).unwrap();
        assert_eq!(predictions.len(), 7);

        let coefficients = model.fit_coefficients(&data).unwrap();
        let weekly = coefficients.weekly_factors();
        let total: f64 = weekly.iter().sum();
        assert!(total.abs() < 1e-9);
        assert!(weekly.iter().any(|f| f.abs() > 1.0));
        assert_eq!(coefficients.predict(&dates).unwrap(), predictions);
    }

    #[test]
    fn test_intervals_widen_into_future() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 8.0 } else { 12.0 }).collect();
        let data = series(&values);
        let last = data[data.len() - 1].0;
        let fitted = TrendSeasonalModel::new(0.95).fit(&data).unwrap();
        let predictions = fitted.predict(&future(last, 30)).unwrap();

        let first = predictions[0].upper - predictions[0].lower;
        let final_width = predictions[29].upper - predictions[29].lower;
        assert!(final_width > first);
        assert!(predictions.iter().all(|p| p.lower <= p.estimate && p.estimate <= p.upper));
    }

    #[test]
    fn test_single_observation_fails() {
        let err = TrendSeasonalModel::default()
            .fit(&series(&[12.0]))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ModelError::InsufficientData {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_unordered_series_fails() {
        let mut data = series(&[1.0, 2.0, 3.0]);
        data.swap(0, 2);
        assert!(matches!(
            TrendSeasonalModel::default().fit(&data),
            Err(ModelError::UnorderedSeries)
        ));
    }

    #[test]
    fn test_non_finite_values_fail() {
        let data = series(&[1.0, f64::NAN, 3.0]);
        assert!(matches!(
            TrendSeasonalModel::default().fit(&data),
            Err(ModelError::NumericalError(_))
        ));
    }
}
