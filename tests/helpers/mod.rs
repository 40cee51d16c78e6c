//! Shared fixtures and helpers for the integration tests.

pub mod model_helpers;
pub mod source_fixtures;
