//! Error types for Junction operations.
//!
//! Only configuration mistakes are errors: an unknown merge strategy,
//! layout algorithm, direction name, or version lookup. Data-quality
//! problems in a diagram never surface here; they are collected as
//! [`junction_core::issue::ValidationIssue`] values by the validator.

use thiserror::Error;

/// The main error type for Junction operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JunctionError {
    #[error("Unknown merge strategy: {0}")]
    UnknownMergeStrategy(String),

    #[error("Unknown layout algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown layout direction: {0}")]
    UnknownDirection(String),

    #[error("Unknown diagram version: {0}")]
    UnknownVersion(String),
}
