//! Validation finding types.
//!
//! Data-quality problems (orphaned nodes, cycles, dangling endpoints,
//! duplicate ids, …) are never fatal: rules collect them as
//! [`ValidationIssue`] values and the validator always completes with a
//! [`ValidationResult`]. Only [`Severity::Error`] findings make a diagram
//! invalid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// The severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The diagram is structurally broken; fails validation.
    Error,
    /// Suspicious but tolerable; never fails validation.
    Warning,
    /// Advisory only; produced by lint passes.
    Info,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single validation or lint finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// The node (or edge endpoint) the finding refers to, when there is one.
    #[serde(default)]
    pub location: Option<Id>,
    /// The rule name that produced the finding.
    pub rule: String,
}

impl ValidationIssue {
    pub fn new(severity: Severity, message: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
            rule: rule.into(),
        }
    }

    /// Attaches a location, consuming and returning the issue.
    pub fn at(mut self, location: Id) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.severity, self.message, self.rule)
    }
}

/// The outcome of running a set of validation rules.
///
/// `is_valid` is `true` iff no issue has [`Severity::Error`]; warnings and
/// info findings never fail validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Builds a result from an ordered issue list, deriving `is_valid`.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let is_valid = !issues.iter().any(|issue| issue.severity.is_error());
        Self { is_valid, issues }
    }

    /// Iterates over error-severity issues only.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity.is_error())
    }

    /// Iterates over warning-severity issues only.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity.is_warning())
    }
}
