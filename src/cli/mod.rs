//! CLI command handlers
//!
//! This module bridges the clap argument parsing with the service layer.

pub mod report;

pub use report::{render_report, run_report, ReportCommands};
