//! Export shaping for API and CLI output

pub mod json;

pub use json::{documents_to_json, to_json_compatible};
