//! Statistical building blocks for the budget analyzer

pub mod anomaly;
pub mod stats;

pub use anomaly::{Anomaly, AnomalyDetector, AnomalyRule, SpendingThreshold};
