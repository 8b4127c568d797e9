//! Spending anomaly detection
//!
//! A category is anomalous when its spending is strictly above
//! `mean + sigma * std_dev` of that category's expense amounts. Which
//! spending figure is compared, and how the threshold scales with it, is
//! selected by [`AnomalyRule`].

use serde::{Deserialize, Serialize};

use super::stats::{mean, sample_std_dev};
use crate::models::Money;

/// Quantity compared against the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    /// Category total against the per-transaction threshold
    Aggregate,
    /// Largest single transaction against the per-transaction threshold
    #[default]
    PerTransaction,
    /// Category total against `n * mean + sigma * std_dev * sqrt(n)`
    ScaledAggregate,
}

/// Fitted threshold for one category's expense amounts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingThreshold {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub sigma: f64,
}

impl SpendingThreshold {
    /// Fit a threshold; `None` when the standard deviation is undefined
    pub fn fit(amounts: &[f64], sigma: f64) -> Option<Self> {
        let std_dev = sample_std_dev(amounts)?;
        Some(Self {
            count: amounts.len(),
            mean: mean(amounts)?,
            std_dev,
            sigma,
        })
    }

    /// Per-transaction limit: `mean + sigma * std_dev`
    pub fn limit(&self) -> f64 {
        self.mean + self.sigma * self.std_dev
    }

    /// Limit for a sum of `count` transactions
    pub fn scaled_limit(&self) -> f64 {
        let n = self.count as f64;
        n * self.mean + self.sigma * self.std_dev * n.sqrt()
    }

    /// Limit the spending figure selected by `rule` is compared against
    pub fn limit_for(&self, rule: AnomalyRule) -> f64 {
        match rule {
            AnomalyRule::Aggregate | AnomalyRule::PerTransaction => self.limit(),
            AnomalyRule::ScaledAggregate => self.scaled_limit(),
        }
    }

    /// Strict comparison: a value equal to the limit is not flagged
    pub fn is_exceeded_by(&self, rule: AnomalyRule, value: f64) -> bool {
        value > self.limit_for(rule)
    }
}

/// A flagged category
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    pub category: String,
    /// The spending figure that crossed the threshold
    pub amount: Money,
    pub threshold: f64,
}

impl Anomaly {
    pub fn message(&self) -> String {
        format!(
            "You spent {} on {}, which is unusually high!",
            self.amount, self.category
        )
    }
}

/// Detects unusually high spending per category
#[derive(Debug, Clone, Copy)]
pub struct AnomalyDetector {
    rule: AnomalyRule,
    sigma: f64,
}

impl AnomalyDetector {
    pub fn new(rule: AnomalyRule, sigma: f64) -> Self {
        Self { rule, sigma }
    }

    /// Check one category's expense amounts
    ///
    /// Categories with fewer than two amounts, or whose total overflows,
    /// are never flagged.
    pub fn detect(&self, category: &str, amounts: &[Money]) -> Option<Anomaly> {
        let values: Vec<f64> = amounts.iter().map(Money::to_f64).collect();
        let threshold = SpendingThreshold::fit(&values, self.sigma)?;

        let observed = match self.rule {
            AnomalyRule::Aggregate | AnomalyRule::ScaledAggregate => {
                Money::checked_sum(amounts.iter().copied())?
            }
            AnomalyRule::PerTransaction => amounts.iter().copied().max()?,
        };

        threshold
            .is_exceeded_by(self.rule, observed.to_f64())
            .then(|| Anomaly {
                category: category.to_string(),
                amount: observed,
                threshold: threshold.limit_for(self.rule),
            })
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyRule::default(), 2.0)
    }
}
