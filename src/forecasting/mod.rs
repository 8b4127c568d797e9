//! Time series forecasting capability
//!
//! The forecast engine only talks to [`ForecastModel`] and [`FittedModel`],
//! so the aggregation and formatting around a fit can be tested with a stub
//! model. [`TrendSeasonalModel`] is the implementation the service uses.

pub mod confidence;
pub mod seasonal;

pub use confidence::{normal_quantile, PredictionInterval};
pub use seasonal::{FittedTrendSeasonal, TrendSeasonalModel};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while fitting or predicting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Not enough observations to fit
    #[error("Insufficient data: need at least {required} distinct dates, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Series is not strictly increasing in time
    #[error("Series dates must be strictly increasing")]
    UnorderedSeries,

    /// Numerical computation error
    #[error("Numerical error: {0}")]
    NumericalError(String),
}

/// Predicted value and interval for one date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A forecasting method that can be fitted to a daily series
pub trait ForecastModel: Send + Sync {
    /// Fit on `(date, value)` pairs ordered by date
    fn fit(&self, series: &[(NaiveDate, f64)]) -> Result<Box<dyn FittedModel>, ModelError>;
}

/// A fitted model that predicts arbitrary dates
pub trait FittedModel: Send {
    /// Predict each date, in the order given
    fn predict(&self, dates: &[NaiveDate]) -> Result<Vec<Prediction>, ModelError>;
}

/// Check that series dates are strictly increasing
pub(crate) fn ensure_ordered(series: &[(NaiveDate, f64)]) -> Result<(), ModelError> {
    if series.windows(2).all(|w| w[0].0 < w[1].0) {
        Ok(())
    } else {
        Err(ModelError::UnorderedSeries)
    }
}
