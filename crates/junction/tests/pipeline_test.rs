//! Integration tests for the public API.
//!
//! These tests drive whole workflows through the crate surface: build a
//! diagram, validate it, diff it against a revision, merge diverged
//! branches, and lay it out.

use junction::analysis::StructureGraph;
use junction::diff::{self, MergeStrategy};
use junction::history::History;
use junction::identifier::Id;
use junction::issue::Severity;
use junction::layout::{Algorithm, Direction, LayoutEngine};
use junction::model::{Diagram, Edge, Node, NodeKind};
use junction::validate::{Linter, Validator};

use proptest::prelude::*;

fn order_flow() -> Diagram {
    let mut diagram = Diagram::with_title("order flow");
    diagram.add_node(Node::new("start", "Start", NodeKind::Start));
    diagram.add_node(Node::new("check", "Check stock", NodeKind::Decision));
    diagram.add_node(Node::new("ship", "Ship order", NodeKind::Process));
    diagram.add_node(Node::new("end", "Done", NodeKind::End));
    diagram.add_edge(Edge::new("start", "check"));
    diagram.add_edge(Edge::new("check", "ship").with_label("in stock"));
    diagram.add_edge(Edge::new("ship", "end"));
    diagram
}

#[test]
fn test_valid_diagram_passes_default_validation() {
    let diagram = order_flow();
    let result = Validator::new().validate(&diagram, None);
    assert!(result.is_valid, "unexpected issues: {:?}", result.issues);
}

#[test]
fn test_cycle_and_orphan_scenario() {
    let mut diagram = Diagram::new();
    diagram.add_node(Node::new("start", "Start", NodeKind::Start));
    diagram.add_node(Node::new("process", "Process", NodeKind::Process));
    diagram.add_node(Node::new("orphan", "Orphan", NodeKind::Process));
    diagram.add_edge(Edge::new("start", "process"));
    diagram.add_edge(Edge::new("process", "start"));

    let result =
        Validator::new().validate(&diagram, Some(&["no-cycles", "no-orphaned-nodes"]));

    assert!(!result.is_valid);
    assert!(result.issues.iter().any(|i| i.severity == Severity::Error
        && i.rule == "no-cycles"));
    assert!(result.issues.iter().any(|i| i.severity == Severity::Warning
        && i.rule == "no-orphaned-nodes"
        && i.location == Some(Id::new("orphan"))));
}

#[test]
fn test_parameterized_rules_from_strings() {
    let diagram = order_flow();

    let tight = Validator::new().validate(&diagram, Some(&["max-nodes-2", "max-edges-2"]));
    assert!(!tight.is_valid);
    assert_eq!(tight.errors().count(), 2);

    let loose = Validator::new().validate(&diagram, Some(&["max-nodes-100", "max-edges-100"]));
    assert!(loose.is_valid);

    // Malformed thresholds and unknown rules are skipped, not errors.
    let skipped =
        Validator::new().validate(&diagram, Some(&["max-nodes-many", "no-such-rule"]));
    assert!(skipped.is_valid);
    assert!(skipped.issues.is_empty());
}

#[test]
fn test_lint_never_fails_validation() {
    let mut diagram = Diagram::new();
    for i in 0..7 {
        let id = format!("n{i}");
        diagram.add_node(Node::new(id.as_str(), "x".repeat(60), NodeKind::Process));
    }

    let issues = Linter::new().lint(&diagram);
    assert!(!issues.is_empty());
    assert!(issues.iter().all(|i| i.severity == Severity::Info));
}

#[test]
fn test_diff_merge_round_trip() {
    let base = order_flow();

    let mut ours = base.clone();
    ours.add_node(Node::new("notify", "Notify customer", NodeKind::Process));
    ours.add_edge(Edge::new("ship", "notify"));

    let mut theirs = base.clone();
    theirs.add_node(Node::new("audit", "Audit trail", NodeKind::Data));
    theirs.add_edge(Edge::new("check", "audit"));

    let changes = diff::compare(&base, &ours);
    assert_eq!(changes.added_nodes.len(), 1);
    assert_eq!(changes.added_edges.len(), 1);

    let merged = diff::merge(&base, &ours, &theirs, MergeStrategy::Union);
    assert!(merged.node(Id::new("notify")).is_some());
    assert!(merged.node(Id::new("audit")).is_some());
    assert!(merged.nodes.len() >= ours.nodes.len().max(theirs.nodes.len()));

    // The union of two valid branches of a valid base still validates.
    assert!(Validator::new().validate(&merged, None).is_valid);
}

#[test]
fn test_history_changelog_flow() {
    let mut history = History::new();
    history.add_version("v1", order_flow());

    let mut v2 = order_flow();
    v2.add_node(Node::new("refund", "Refund", NodeKind::Process));
    v2.add_edge(Edge::new("check", "refund").with_label("out of stock"));
    history.add_version("v2", v2);

    let changes = history.compare_versions("v1", "v2").unwrap();
    assert_eq!(changes.added_nodes.len(), 1);
    assert!(history.changelog().contains("## v1 -> v2"));
}

#[test]
fn test_layout_covers_all_nodes_for_every_algorithm() {
    let diagram = order_flow();
    for algorithm in [
        Algorithm::ForceDirected,
        Algorithm::Hierarchical,
        Algorithm::Circular,
        Algorithm::Grid,
    ] {
        let positions = LayoutEngine::new(algorithm).apply(&diagram);
        for node in &diagram.nodes {
            assert!(positions.contains_key(&node.id), "{algorithm} missed {}", node.id);
        }
    }
}

#[test]
fn test_hierarchical_layout_follows_analysis_layers() {
    let diagram = order_flow();
    let structure = StructureGraph::build(&diagram);
    let layers = structure.assign_layers();
    assert_eq!(layers.len(), 4);

    let positions = LayoutEngine::new(Algorithm::Hierarchical)
        .with_direction(Direction::TopToBottom)
        .apply(&diagram);
    for (earlier, later) in layers.iter().zip(layers.iter().skip(1)) {
        assert!(positions[&earlier[0]].y() < positions[&later[0]].y());
    }
}

fn arb_diagram() -> impl Strategy<Value = Diagram> {
    let node_ids = prop::collection::btree_set("[a-e]", 1..5);
    node_ids.prop_flat_map(|ids| {
        let ids: Vec<String> = ids.into_iter().collect();
        let n = ids.len();
        let edges = prop::collection::vec((0..n, 0..n), 0..6);
        (Just(ids), edges).prop_map(|(ids, edge_pairs)| {
            let mut diagram = Diagram::new();
            for id in &ids {
                diagram.add_node(Node::new(id.as_str(), id.to_uppercase(), NodeKind::Process));
            }
            for (s, t) in edge_pairs {
                diagram.add_edge(Edge::new(ids[s].as_str(), ids[t].as_str()));
            }
            diagram
        })
    })
}

proptest! {
    #[test]
    fn prop_compare_with_self_is_empty(diagram in arb_diagram()) {
        let changes = diff::compare(&diagram, &diagram);
        prop_assert!(!changes.has_changes());
    }

    #[test]
    fn prop_compare_add_remove_symmetry(d1 in arb_diagram(), d2 in arb_diagram()) {
        let forward = diff::compare(&d1, &d2);
        let backward = diff::compare(&d2, &d1);
        prop_assert_eq!(forward.added_nodes.len(), backward.removed_nodes.len());
        prop_assert_eq!(forward.added_edges.len(), backward.removed_edges.len());
    }

    #[test]
    fn prop_validation_is_deterministic(diagram in arb_diagram()) {
        let validator = Validator::new();
        let first = validator.validate(&diagram, None);
        let second = validator.validate(&diagram, None);
        prop_assert_eq!(first.is_valid, second.is_valid);
        prop_assert_eq!(first.issues, second.issues);
    }

    #[test]
    fn prop_union_merge_covers_both_branches(
        base in arb_diagram(),
        b1 in arb_diagram(),
        b2 in arb_diagram(),
    ) {
        let merged = diff::merge(&base, &b1, &b2, MergeStrategy::Union);
        for node in b1.nodes.iter().chain(&b2.nodes) {
            prop_assert!(merged.node(node.id).is_some());
        }
        prop_assert!(merged.nodes.len() >= b1.nodes.len().max(b2.nodes.len()));
    }

    #[test]
    fn prop_grid_layout_positions_every_node(diagram in arb_diagram()) {
        let positions = LayoutEngine::new(Algorithm::Grid).apply(&diagram);
        prop_assert_eq!(positions.len(), diagram.nodes.len());
    }
}
