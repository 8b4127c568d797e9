//! Forecast point model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single projected day of expenses with its uncertainty interval
///
/// Field names follow the `ds`/`yhat` convention the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "ds")]
    pub date: NaiveDate,
    #[serde(rename = "yhat")]
    pub predicted: f64,
    #[serde(rename = "yhat_lower")]
    pub lower: f64,
    #[serde(rename = "yhat_upper")]
    pub upper: f64,
}
