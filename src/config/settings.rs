//! Service settings
//!
//! Tunables for the analyzer, the forecaster and the HTTP layer. Settings are
//! read from an optional JSON file; every field has a default so a partial
//! file (or no file at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::AnomalyRule;
use crate::error::BudgetError;

/// Service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Address the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Forecast horizon used when a request does not specify one
    #[serde(default = "default_forecast_periods")]
    pub default_forecast_periods: u32,

    /// Largest accepted forecast horizon, in days
    #[serde(default = "default_max_forecast_periods")]
    pub max_forecast_periods: u32,

    /// Which quantity is compared against the anomaly threshold
    #[serde(default)]
    pub anomaly_rule: AnomalyRule,

    /// Standard deviations above the mean before spending is flagged
    #[serde(default = "default_anomaly_sigma")]
    pub anomaly_sigma: f64,

    /// Coverage of the forecast uncertainty interval (0.8 = 80%)
    #[serde(default = "default_interval_width")]
    pub interval_width: f64,

    /// Answer every request with 200 and signal errors only in the payload
    #[serde(default)]
    pub legacy_status_codes: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_forecast_periods() -> u32 {
    30
}

fn default_max_forecast_periods() -> u32 {
    1825 // five years of days
}

fn default_anomaly_sigma() -> f64 {
    2.0
}

fn default_interval_width() -> f64 {
    0.8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            host: default_host(),
            port: default_port(),
            default_forecast_periods: default_forecast_periods(),
            max_forecast_periods: default_max_forecast_periods(),
            anomaly_rule: AnomalyRule::default(),
            anomaly_sigma: default_anomaly_sigma(),
            interval_width: default_interval_width(),
            legacy_status_codes: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or use defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, BudgetError> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BudgetError::Io(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            BudgetError::Config(format!("Failed to parse settings file: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that numeric settings are within usable ranges
    pub fn validate(&self) -> Result<(), BudgetError> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(BudgetError::Config(format!(
                "interval_width must be between 0 and 1, got {}",
                self.interval_width
            )));
        }
        if !(self.anomaly_sigma.is_finite() && self.anomaly_sigma > 0.0) {
            return Err(BudgetError::Config(format!(
                "anomaly_sigma must be positive, got {}",
                self.anomaly_sigma
            )));
        }
        if self.max_forecast_periods == 0 {
            return Err(BudgetError::Config(
                "max_forecast_periods must be at least 1".into(),
            ));
        }
        if self.default_forecast_periods == 0
            || self.default_forecast_periods > self.max_forecast_periods
        {
            return Err(BudgetError::Config(format!(
                "default_forecast_periods must be between 1 and {}",
                self.max_forecast_periods
            )));
        }
        Ok(())
    }
}
