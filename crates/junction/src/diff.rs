//! Diffing and three-way merging of diagram snapshots.
//!
//! [`compare`] keys nodes by id and edges by their identity tuple
//! (`source`, `target`, label-or-empty, kind). Nodes present in both
//! versions are modified when label, kind, or metadata differ
//! structurally. Edges with the same endpoints but different labels are
//! distinct edges (one added, one removed), never a modification.
//!
//! [`merge`] combines two diverged versions against a common ancestor
//! under a [`MergeStrategy`]; an unknown strategy name is a configuration
//! error at parse time, not a silent fallback.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use junction_core::{
    identifier::Id,
    model::{Diagram, Edge, EdgeKind, Node},
};

use crate::JunctionError;

/// The changes between two diagram snapshots.
///
/// Constructed once per [`compare`] call and immutable afterwards. The
/// `modified_edges` list exists for report symmetry but `compare` never
/// populates it: edge identity includes the label, so a relabeled edge
/// shows up as an add/remove pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramChanges {
    pub added_nodes: Vec<Node>,
    pub removed_nodes: Vec<Node>,
    pub modified_nodes: Vec<(Node, Node)>,
    pub added_edges: Vec<Edge>,
    pub removed_edges: Vec<Edge>,
    pub modified_edges: Vec<(Edge, Edge)>,
}

impl DiagramChanges {
    /// Whether any change was recorded.
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Total number of recorded changes across all six lists.
    pub fn total_changes(&self) -> usize {
        self.added_nodes.len()
            + self.removed_nodes.len()
            + self.modified_nodes.len()
            + self.added_edges.len()
            + self.removed_edges.len()
            + self.modified_edges.len()
    }
}

type EdgeKey = (Id, Id, String, EdgeKind);

/// Compares two diagram snapshots.
///
/// Added nodes come out in `new`'s insertion order, removed nodes in
/// `old`'s, modified pairs in `old`'s; the same holds for edges. The
/// result is therefore deterministic for a fixed input pair, and
/// `compare(d, d)` is empty for any `d`.
///
/// Snapshots may contain duplicate node ids (a validator-detectable
/// anomaly). The diff is keyed per entity: each id and each edge
/// identity yields at most one entry per list, taken from its first
/// occurrence.
pub fn compare(old: &Diagram, new: &Diagram) -> DiagramChanges {
    let mut old_nodes: HashMap<Id, &Node> = HashMap::new();
    for node in &old.nodes {
        old_nodes.entry(node.id).or_insert(node);
    }
    let mut new_nodes: HashMap<Id, &Node> = HashMap::new();
    for node in &new.nodes {
        new_nodes.entry(node.id).or_insert(node);
    }

    let mut changes = DiagramChanges::default();

    let mut emitted: HashSet<Id> = HashSet::new();
    for node in &new.nodes {
        if !old_nodes.contains_key(&node.id) && emitted.insert(node.id) {
            changes.added_nodes.push(node.clone());
        }
    }
    emitted.clear();
    for node in &old.nodes {
        if !new_nodes.contains_key(&node.id) && emitted.insert(node.id) {
            changes.removed_nodes.push(node.clone());
        }
    }
    emitted.clear();
    for node in &old.nodes {
        if let Some(&updated) = new_nodes.get(&node.id) {
            // Structural comparison of label, kind, and metadata; the id
            // is what makes them the same entity in the first place.
            if emitted.insert(node.id)
                && (node.label != updated.label
                    || node.kind != updated.kind
                    || node.metadata != updated.metadata)
            {
                changes.modified_nodes.push((node.clone(), updated.clone()));
            }
        }
    }

    let old_edges: HashSet<EdgeKey> = old.edges.iter().map(Edge::identity).collect();
    let new_edges: HashSet<EdgeKey> = new.edges.iter().map(Edge::identity).collect();

    let mut emitted_edges: HashSet<EdgeKey> = HashSet::new();
    for edge in &new.edges {
        let key = edge.identity();
        if !old_edges.contains(&key) && emitted_edges.insert(key) {
            changes.added_edges.push(edge.clone());
        }
    }
    emitted_edges.clear();
    for edge in &old.edges {
        let key = edge.identity();
        if !new_edges.contains(&key) && emitted_edges.insert(key) {
            changes.removed_edges.push(edge.clone());
        }
    }

    debug!(total = changes.total_changes(); "Compared diagram snapshots");
    changes
}

/// Renders a human-readable report of a change set.
pub fn diff_report(changes: &DiagramChanges) -> String {
    if !changes.has_changes() {
        return "No changes detected.".to_string();
    }

    let mut lines = vec![format!("Total changes: {}", changes.total_changes()), String::new()];

    if !changes.added_nodes.is_empty() {
        lines.push(format!("Added nodes ({}):", changes.added_nodes.len()));
        for node in &changes.added_nodes {
            lines.push(format!("  + {}: {} [{:?}]", node.id, node.label, node.kind));
        }
        lines.push(String::new());
    }

    if !changes.removed_nodes.is_empty() {
        lines.push(format!("Removed nodes ({}):", changes.removed_nodes.len()));
        for node in &changes.removed_nodes {
            lines.push(format!("  - {}: {} [{:?}]", node.id, node.label, node.kind));
        }
        lines.push(String::new());
    }

    if !changes.modified_nodes.is_empty() {
        lines.push(format!("Modified nodes ({}):", changes.modified_nodes.len()));
        for (before, after) in &changes.modified_nodes {
            lines.push(format!("  ~ {}:", before.id));
            if before.label != after.label {
                lines.push(format!("      label: {} -> {}", before.label, after.label));
            }
            if before.kind != after.kind {
                lines.push(format!("      kind: {:?} -> {:?}", before.kind, after.kind));
            }
            if before.metadata != after.metadata {
                lines.push("      metadata changed".to_string());
            }
        }
        lines.push(String::new());
    }

    if !changes.added_edges.is_empty() {
        lines.push(format!("Added edges ({}):", changes.added_edges.len()));
        for edge in &changes.added_edges {
            lines.push(format!("  + {}", format_edge(edge)));
        }
        lines.push(String::new());
    }

    if !changes.removed_edges.is_empty() {
        lines.push(format!("Removed edges ({}):", changes.removed_edges.len()));
        for edge in &changes.removed_edges {
            lines.push(format!("  - {}", format_edge(edge)));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn format_edge(edge: &Edge) -> String {
    match &edge.label {
        Some(label) if !label.is_empty() => {
            format!("{} -> {} ({})", edge.source, edge.target, label)
        }
        _ => format!("{} -> {}", edge.source, edge.target),
    }
}

/// Policy for combining two diverged diagram versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Keep branch1 unchanged.
    Ours,
    /// Keep branch2 unchanged.
    Theirs,
    /// Include everything from base and both branches.
    Union,
    /// Keep only what both branches agree on.
    Intersection,
}

impl FromStr for MergeStrategy {
    type Err = JunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ours" => Ok(Self::Ours),
            "theirs" => Ok(Self::Theirs),
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            other => Err(JunctionError::UnknownMergeStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ours => write!(f, "ours"),
            Self::Theirs => write!(f, "theirs"),
            Self::Union => write!(f, "union"),
            Self::Intersection => write!(f, "intersection"),
        }
    }
}

/// Merges two diagram versions that share a common ancestor.
pub fn merge(
    base: &Diagram,
    branch1: &Diagram,
    branch2: &Diagram,
    strategy: MergeStrategy,
) -> Diagram {
    debug!(strategy:% = strategy; "Merging diagram versions");
    match strategy {
        MergeStrategy::Ours => branch1.clone(),
        MergeStrategy::Theirs => branch2.clone(),
        MergeStrategy::Union => merge_union(base, branch1, branch2),
        MergeStrategy::Intersection => merge_intersection(base, branch1, branch2),
    }
}

fn merge_union(base: &Diagram, branch1: &Diagram, branch2: &Diagram) -> Diagram {
    let mut merged = Diagram {
        metadata: branch1.metadata.clone(),
        ..Diagram::default()
    };

    // Later sources overwrite earlier ones on id collision while the
    // first-insertion position is preserved; IndexMap gives exactly that.
    let mut nodes: IndexMap<Id, &Node> = IndexMap::new();
    for node in base
        .nodes
        .iter()
        .chain(&branch1.nodes)
        .chain(&branch2.nodes)
    {
        nodes.insert(node.id, node);
    }
    for node in nodes.values() {
        merged.add_node((*node).clone());
    }

    // First occurrence wins for edges.
    let mut seen: HashSet<EdgeKey> = HashSet::new();
    for edge in base
        .edges
        .iter()
        .chain(&branch1.edges)
        .chain(&branch2.edges)
    {
        if seen.insert(edge.identity()) {
            merged.add_edge(edge.clone());
        }
    }

    merged
}

fn merge_intersection(base: &Diagram, branch1: &Diagram, branch2: &Diagram) -> Diagram {
    let mut merged = Diagram {
        metadata: base.metadata.clone(),
        ..Diagram::default()
    };

    let ids2: HashSet<Id> = branch2.nodes.iter().map(|n| n.id).collect();
    let mut survivors: HashSet<Id> = HashSet::new();
    for node in &branch1.nodes {
        if ids2.contains(&node.id) && survivors.insert(node.id) {
            merged.add_node(node.clone());
        }
    }

    // Edge agreement is endpoint-level: labels and kinds come from
    // branch1's first matching edge.
    let pairs2: HashSet<(Id, Id)> = branch2.edges.iter().map(|e| (e.source, e.target)).collect();
    let mut seen_pairs: HashSet<(Id, Id)> = HashSet::new();
    for edge in &branch1.edges {
        let pair = (edge.source, edge.target);
        if pairs2.contains(&pair)
            && survivors.contains(&edge.source)
            && survivors.contains(&edge.target)
            && seen_pairs.insert(pair)
        {
            merged.add_edge(edge.clone());
        }
    }

    merged
}
