//! Rule-based diagram validation and linting.
//!
//! [`Validator`] holds a table mapping rule names to pure functions over
//! a diagram. `validate` runs a configurable subset of rules (default:
//! the baseline pair in [`BASELINE_RULES`]) and reports severity-tagged
//! issues; a diagram is valid iff no rule produced an error. The
//! parameterized names `max-nodes-<N>` and `max-edges-<N>` carry their
//! threshold inside the rule string and are parsed before table lookup.
//! Unknown rule names and malformed numeric suffixes are silently
//! skipped.
//!
//! [`Linter`] is a separate, always-info-level style pass; it never
//! affects validity.

use std::collections::{HashMap, HashSet};

use log::debug;

use junction_core::{
    identifier::Id,
    issue::{Severity, ValidationIssue, ValidationResult},
    model::{Diagram, NodeKind},
};

use crate::analysis::StructureGraph;

/// Rules run when the caller does not name any.
pub const BASELINE_RULES: [&str; 2] = ["no-cycles", "valid-edges"];

/// A validation rule: a pure function from diagram (plus its prebuilt
/// structure view) to a list of findings.
type RuleFn = fn(&Diagram, &StructureGraph) -> Vec<ValidationIssue>;

/// Validates diagrams against named structural rules.
pub struct Validator {
    rules: HashMap<&'static str, RuleFn>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator with the full rule table registered.
    pub fn new() -> Self {
        let mut rules: HashMap<&'static str, RuleFn> = HashMap::new();
        rules.insert("no-orphaned-nodes", check_no_orphaned_nodes);
        rules.insert("no-cycles", check_no_cycles);
        rules.insert("require-start-end", check_require_start_end);
        rules.insert("max-complexity", check_max_complexity);
        rules.insert("unique-node-ids", check_unique_node_ids);
        rules.insert("unique-labels", check_unique_labels);
        rules.insert("valid-edges", check_valid_edges);
        rules.insert("no-self-loops", check_no_self_loops);
        rules.insert("connected-graph", check_connected_graph);
        Self { rules }
    }

    /// The registered rule names, in no particular order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// Runs the named rules (or [`BASELINE_RULES`] when `rules` is
    /// `None`) and returns the collected findings.
    ///
    /// Rules run in the order given, so the issue list is deterministic
    /// for a fixed diagram and rule selection. The validator always
    /// completes: data-quality problems become issues, never panics or
    /// errors.
    pub fn validate(&self, diagram: &Diagram, rules: Option<&[&str]>) -> ValidationResult {
        let structure = StructureGraph::build(diagram);
        let selected = rules.unwrap_or(&BASELINE_RULES);

        let mut issues = Vec::new();
        for name in selected {
            // Parameterized rules carry their threshold in the name and
            // are matched by prefix before the table lookup.
            if let Some(suffix) = name.strip_prefix("max-nodes-") {
                if let Ok(limit) = suffix.parse::<usize>() {
                    issues.extend(check_max_nodes(diagram, limit));
                }
            } else if let Some(suffix) = name.strip_prefix("max-edges-") {
                if let Ok(limit) = suffix.parse::<usize>() {
                    issues.extend(check_max_edges(diagram, limit));
                }
            } else if let Some(rule) = self.rules.get(name) {
                issues.extend(rule(diagram, &structure));
            } else {
                debug!(rule = name; "Skipping unknown validation rule");
            }
        }

        ValidationResult::from_issues(issues)
    }
}

fn check_no_orphaned_nodes(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    // Connectivity is judged from raw edge endpoints, so a node that is
    // only referenced by a dangling edge still counts as connected.
    let mut connected: HashSet<Id> = HashSet::new();
    for edge in &diagram.edges {
        connected.insert(edge.source);
        connected.insert(edge.target);
    }

    diagram
        .nodes
        .iter()
        .filter(|node| {
            !connected.contains(&node.id)
                && !matches!(node.kind, NodeKind::Start | NodeKind::End)
        })
        .map(|node| {
            ValidationIssue::new(
                Severity::Warning,
                format!("Orphaned node: {} ({})", node.id, node.label),
                "no-orphaned-nodes",
            )
            .at(node.id)
        })
        .collect()
}

fn check_no_cycles(_diagram: &Diagram, structure: &StructureGraph) -> Vec<ValidationIssue> {
    structure
        .find_cycles()
        .into_iter()
        .map(|cycle| {
            let path = cycle
                .iter()
                .map(Id::resolve)
                .collect::<Vec<_>>()
                .join(" -> ");
            ValidationIssue::new(
                Severity::Error,
                format!("Cycle detected: {}", path),
                "no-cycles",
            )
        })
        .collect()
}

fn check_require_start_end(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !diagram.nodes.iter().any(|n| n.kind == NodeKind::Start) {
        issues.push(ValidationIssue::new(
            Severity::Error,
            "Missing start node",
            "require-start-end",
        ));
    }
    if !diagram.nodes.iter().any(|n| n.kind == NodeKind::End) {
        issues.push(ValidationIssue::new(
            Severity::Error,
            "Missing end node",
            "require-start-end",
        ));
    }

    issues
}

fn check_max_complexity(_diagram: &Diagram, structure: &StructureGraph) -> Vec<ValidationIssue> {
    let stats = structure.statistics();
    let mut issues = Vec::new();

    if stats.node_count > 50 {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            format!(
                "High node count: {} (consider splitting the diagram)",
                stats.node_count
            ),
            "max-complexity",
        ));
    }
    if stats.max_out_degree > 10 {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            format!(
                "High branching factor: {} edges from one node",
                stats.max_out_degree
            ),
            "max-complexity",
        ));
    }

    issues
}

fn check_max_nodes(diagram: &Diagram, limit: usize) -> Vec<ValidationIssue> {
    if diagram.nodes.len() > limit {
        vec![ValidationIssue::new(
            Severity::Error,
            format!("Too many nodes: {} > {}", diagram.nodes.len(), limit),
            format!("max-nodes-{}", limit),
        )]
    } else {
        Vec::new()
    }
}

fn check_max_edges(diagram: &Diagram, limit: usize) -> Vec<ValidationIssue> {
    if diagram.edges.len() > limit {
        vec![ValidationIssue::new(
            Severity::Error,
            format!("Too many edges: {} > {}", diagram.edges.len(), limit),
            format!("max-edges-{}", limit),
        )]
    } else {
        Vec::new()
    }
}

fn check_unique_node_ids(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for node in &diagram.nodes {
        if !seen.insert(node.id) {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    format!("Duplicate node id: {}", node.id),
                    "unique-node-ids",
                )
                .at(node.id),
            );
        }
    }

    issues
}

fn check_unique_labels(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for node in &diagram.nodes {
        if node.label.is_empty() {
            continue;
        }
        match counts
            .iter_mut()
            .find(|(label, _)| *label == node.label.as_str())
        {
            Some((_, count)) => *count += 1,
            None => counts.push((node.label.as_str(), 1)),
        }
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(label, count)| {
            ValidationIssue::new(
                Severity::Info,
                format!("Duplicate label '{}' used {} times", label, count),
                "unique-labels",
            )
        })
        .collect()
}

fn check_valid_edges(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    let node_ids: HashSet<Id> = diagram.nodes.iter().map(|n| n.id).collect();
    let mut issues = Vec::new();

    for edge in &diagram.edges {
        if !node_ids.contains(&edge.source) {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    format!("Edge references non-existent source node: {}", edge.source),
                    "valid-edges",
                )
                .at(edge.source),
            );
        }
        if !node_ids.contains(&edge.target) {
            issues.push(
                ValidationIssue::new(
                    Severity::Error,
                    format!("Edge references non-existent target node: {}", edge.target),
                    "valid-edges",
                )
                .at(edge.target),
            );
        }
    }

    issues
}

fn check_no_self_loops(diagram: &Diagram, _structure: &StructureGraph) -> Vec<ValidationIssue> {
    diagram
        .edges
        .iter()
        .filter(|edge| edge.is_self_loop())
        .map(|edge| {
            ValidationIssue::new(
                Severity::Warning,
                format!("Self-loop detected on node: {}", edge.source),
                "no-self-loops",
            )
            .at(edge.source)
        })
        .collect()
}

fn check_connected_graph(_diagram: &Diagram, structure: &StructureGraph) -> Vec<ValidationIssue> {
    let connectivity = structure.connectivity();
    if connectivity.is_connected() {
        return Vec::new();
    }

    let listed = connectivity
        .disconnected
        .iter()
        .take(5)
        .map(Id::resolve)
        .collect::<Vec<_>>()
        .join(", ");
    vec![ValidationIssue::new(
        Severity::Warning,
        format!("Graph not fully connected. Disconnected nodes: {}", listed),
        "connected-graph",
    )]
}

/// Lints diagrams for style; findings are always info severity.
#[derive(Debug, Default)]
pub struct Linter;

impl Linter {
    pub fn new() -> Self {
        Self
    }

    /// Checks label length, generated-looking ids, and missing title.
    pub fn lint(&self, diagram: &Diagram) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for node in &diagram.nodes {
            if node.label.chars().count() > 50 {
                let preview: String = node.label.chars().take(40).collect();
                issues.push(
                    ValidationIssue::new(
                        Severity::Info,
                        format!("Long label in {}: '{}...'", node.id, preview),
                        "label-length",
                    )
                    .at(node.id),
                );
            }
        }

        let generated = diagram
            .nodes
            .iter()
            .filter(|node| node.id.with_str(is_generated_id))
            .count();
        if generated > 5 {
            issues.push(ValidationIssue::new(
                Severity::Info,
                format!("Many generic node ids (n1, n2, ...): {} nodes", generated),
                "naming-conventions",
            ));
        }

        if diagram.title().is_none_or(str::is_empty) {
            issues.push(ValidationIssue::new(
                Severity::Info,
                "Consider adding a title to the diagram",
                "metadata-title",
            ));
        }

        issues
    }
}

/// Matches auto-generated ids of the form `n<digits>`.
fn is_generated_id(id: &str) -> bool {
    id.strip_prefix('n')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
