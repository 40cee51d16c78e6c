//! HIR layer tests
//!
//! - Cross-package resolution through in-memory and filesystem loaders
//! - Resolution memoization and strictness
//! - Extraction idempotence through rendering
//! - Wire plans from tagged sources

pub mod tests_idempotence;
pub mod tests_resolution;
pub mod tests_wire_plan;
