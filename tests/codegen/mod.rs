//! Conversion synthesis tests
//!
//! - End-to-end conversions between extracted domain and wire-schema models
//! - Field rule coverage and nil-guard exactness

pub mod tests_rules;
pub mod tests_scenarios;
