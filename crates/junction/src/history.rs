//! Named version history for a diagram.
//!
//! A [`History`] is an append-only list of `(name, snapshot)` pairs in the
//! order they were recorded. It underpins changelog rendering and
//! version-to-version comparison; it is not a storage layer, so nothing
//! here touches disk.

use log::debug;
use serde::{Deserialize, Serialize};

use junction_core::model::Diagram;

use crate::diff::{self, DiagramChanges};
use crate::JunctionError;

/// An ordered collection of named diagram snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    versions: Vec<(String, Diagram)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snapshot under `name`. Re-using a name records a second
    /// entry; lookups return the earliest one.
    pub fn add_version(&mut self, name: impl Into<String>, diagram: Diagram) {
        let name = name.into();
        debug!(version = name.as_str(), total = self.versions.len() + 1; "Recorded diagram version");
        self.versions.push((name, diagram));
    }

    /// Looks up a snapshot by version name.
    pub fn version(&self, name: &str) -> Option<&Diagram> {
        self.versions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Version names in recording order.
    pub fn version_names(&self) -> Vec<&str> {
        self.versions.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Compares two recorded versions by name.
    pub fn compare_versions(&self, from: &str, to: &str) -> Result<DiagramChanges, JunctionError> {
        let old = self
            .version(from)
            .ok_or_else(|| JunctionError::UnknownVersion(from.to_string()))?;
        let new = self
            .version(to)
            .ok_or_else(|| JunctionError::UnknownVersion(to.to_string()))?;
        Ok(diff::compare(old, new))
    }

    /// Renders a changelog covering every consecutive pair of versions.
    pub fn changelog(&self) -> String {
        if self.versions.len() < 2 {
            return "Not enough versions for a changelog.".to_string();
        }

        let mut sections = Vec::new();
        for window in self.versions.windows(2) {
            let (from, old) = &window[0];
            let (to, new) = &window[1];
            let changes = diff::compare(old, new);
            sections.push(format!(
                "## {} -> {}\n\n{}",
                from,
                to,
                diff::diff_report(&changes)
            ));
        }
        sections.join("\n\n")
    }
}
