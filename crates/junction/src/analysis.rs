//! Pure structural queries over a diagram.
//!
//! [`StructureGraph`] builds a petgraph adjacency view of a diagram once
//! and answers the questions both the validator and the layout engines
//! ask: cycle detection, undirected reachability, degree statistics, and
//! topological layering. It never mutates the diagram it was built from.
//!
//! The view indexes only declared node ids (first occurrence wins for
//! duplicates) and skips edges with unresolved endpoints; duplicate ids
//! and dangling edges are reported by the validator, not here.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use junction_core::{identifier::Id, model::Diagram};

/// Undirected reachability from the first node in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connectivity {
    /// Nodes reachable from the start node, ignoring edge direction.
    pub reachable: HashSet<Id>,
    /// Nodes outside the reachable set, in insertion order.
    pub disconnected: Vec<Id>,
}

impl Connectivity {
    /// Whether every node is reachable from the start node.
    pub fn is_connected(&self) -> bool {
        self.disconnected.is_empty()
    }
}

/// Degree and size statistics for a diagram.
///
/// `node_count` and `edge_count` are raw diagram counts (duplicates and
/// dangling edges included); the degree maps cover the resolved view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub in_degree: HashMap<Id, usize>,
    pub out_degree: HashMap<Id, usize>,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    /// Nodes with zero in-degree and zero out-degree.
    pub isolated_count: usize,
}

/// A read-only adjacency view over a [`Diagram`].
pub struct StructureGraph {
    graph: DiGraph<Id, ()>,
    node_indices: HashMap<Id, NodeIndex>,
    /// First occurrences, in insertion order.
    node_order: Vec<Id>,
    raw_node_count: usize,
    raw_edge_count: usize,
}

impl StructureGraph {
    /// Builds the adjacency view for a diagram.
    pub fn build(diagram: &Diagram) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut node_order = Vec::new();

        for node in &diagram.nodes {
            if node_indices.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.id);
            node_indices.insert(node.id, idx);
            node_order.push(node.id);
        }

        let mut skipped = 0usize;
        for edge in &diagram.edges {
            if let (Some(&source), Some(&target)) = (
                node_indices.get(&edge.source),
                node_indices.get(&edge.target),
            ) {
                graph.add_edge(source, target, ());
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            debug!(dangling_edges = skipped; "Skipped edges with unresolved endpoints");
        }

        Self {
            graph,
            node_indices,
            node_order,
            raw_node_count: diagram.nodes.len(),
            raw_edge_count: diagram.edges.len(),
        }
    }

    /// Distinct node ids in insertion order.
    pub fn node_ids(&self) -> &[Id] {
        &self.node_order
    }

    /// Resolved `(source, target)` pairs, one per non-dangling edge.
    pub fn edge_endpoints(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.graph.edge_indices().map(|edge_idx| {
            let (source, target) = self
                .graph
                .edge_endpoints(edge_idx)
                .expect("edge index should exist");
            (self.graph[source], self.graph[target])
        })
    }

    /// Finds simple cycles reachable via directed edges.
    ///
    /// Repeated DFS with a recursion stack, probing each component from
    /// its first node in insertion order. A neighbor already on the
    /// active path closes a cycle, reported as the id sequence from that
    /// neighbor's position on the path through the current node. One
    /// cycle is reported per back edge; a self-loop is a cycle of length
    /// one. Terminates on any input.
    pub fn find_cycles(&self) -> Vec<Vec<Id>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();
        let mut on_path = HashSet::new();
        let mut path = Vec::new();

        for &id in &self.node_order {
            let idx = self.node_indices[&id];
            if !visited.contains(&idx) {
                self.cycle_dfs(idx, &mut visited, &mut on_path, &mut path, &mut cycles);
            }
        }

        debug!(cycle_count = cycles.len(); "Cycle detection finished");
        cycles
    }

    fn cycle_dfs(
        &self,
        idx: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_path: &mut HashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
        cycles: &mut Vec<Vec<Id>>,
    ) {
        visited.insert(idx);
        on_path.insert(idx);
        path.push(idx);

        for neighbor in self.graph.neighbors(idx) {
            if on_path.contains(&neighbor) {
                // Back edge: the cycle runs from the neighbor's position
                // on the active path through the current node.
                let start = path
                    .iter()
                    .position(|&p| p == neighbor)
                    .expect("on-path node must be on the path");
                cycles.push(path[start..].iter().map(|&p| self.graph[p]).collect());
            } else if !visited.contains(&neighbor) {
                self.cycle_dfs(neighbor, visited, on_path, path, cycles);
            }
        }

        path.pop();
        on_path.remove(&idx);
    }

    /// Undirected reachability from the first node in insertion order.
    ///
    /// Every directed edge contributes both directions. An empty diagram
    /// yields an empty reachable set and no disconnected nodes.
    pub fn connectivity(&self) -> Connectivity {
        let Some(&start_id) = self.node_order.first() else {
            return Connectivity {
                reachable: HashSet::new(),
                disconnected: Vec::new(),
            };
        };

        let start = self.node_indices[&start_id];
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(idx) = queue.pop_front() {
            for neighbor in self.graph.neighbors_undirected(idx) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        let reachable: HashSet<Id> = seen.iter().map(|&idx| self.graph[idx]).collect();
        let disconnected = self
            .node_order
            .iter()
            .copied()
            .filter(|id| !reachable.contains(id))
            .collect();

        Connectivity {
            reachable,
            disconnected,
        }
    }

    /// Degree statistics over the resolved view.
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            node_count: self.raw_node_count,
            edge_count: self.raw_edge_count,
            ..Statistics::default()
        };

        for &id in &self.node_order {
            let idx = self.node_indices[&id];
            let incoming = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .count();
            let outgoing = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .count();

            stats.max_in_degree = stats.max_in_degree.max(incoming);
            stats.max_out_degree = stats.max_out_degree.max(outgoing);
            if incoming == 0 && outgoing == 0 {
                stats.isolated_count += 1;
            }
            stats.in_degree.insert(id, incoming);
            stats.out_degree.insert(id, outgoing);
        }

        stats
    }

    /// Buckets nodes into topological layers for hierarchical layout.
    ///
    /// Each round extracts the nodes with no incoming edge from a
    /// not-yet-placed node, in insertion order. When no node qualifies
    /// (a pure cycle or deadlock among the remainder), the entire
    /// remaining set is forced into one final layer so the pass always
    /// terminates; that collapsed layer keeps insertion order and makes
    /// no aesthetic promises.
    pub fn assign_layers(&self) -> Vec<Vec<Id>> {
        let mut layers = Vec::new();
        let mut placed: HashSet<NodeIndex> = HashSet::new();
        let mut remaining: Vec<NodeIndex> = self
            .node_order
            .iter()
            .map(|id| self.node_indices[id])
            .collect();

        while !remaining.is_empty() {
            let mut layer: Vec<NodeIndex> = remaining
                .iter()
                .copied()
                .filter(|&idx| {
                    self.graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .all(|pred| placed.contains(&pred))
                })
                .collect();

            if layer.is_empty() {
                // Cyclic remainder: best-effort fallback, not a failure.
                debug!(remaining = remaining.len(); "Layering deadlock, collapsing remainder into one layer");
                layer = remaining.clone();
            }

            placed.extend(layer.iter().copied());
            remaining.retain(|idx| !placed.contains(idx));
            layers.push(layer.iter().map(|&idx| self.graph[idx]).collect());
        }

        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::model::{Edge, Node, NodeKind};

    fn diagram(nodes: &[&str], edges: &[(&str, &str)]) -> Diagram {
        let mut d = Diagram::new();
        for id in nodes {
            d.add_node(Node::new(*id, id.to_uppercase(), NodeKind::Process));
        }
        for (s, t) in edges {
            d.add_edge(Edge::new(*s, *t));
        }
        d
    }

    #[test]
    fn test_three_node_cycle_reported_once() {
        let d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = StructureGraph::build(&d).find_cycles();

        assert_eq!(cycles.len(), 1);
        let ids: HashSet<Id> = cycles[0].iter().copied().collect();
        assert_eq!(
            ids,
            HashSet::from([Id::new("a"), Id::new("b"), Id::new("c")])
        );
    }

    #[test]
    fn test_self_loop_is_length_one_cycle() {
        let d = diagram(&["a"], &[("a", "a")]);
        let cycles = StructureGraph::build(&d).find_cycles();

        assert_eq!(cycles, vec![vec![Id::new("a")]]);
    }

    #[test]
    fn test_acyclic_chain_has_no_cycles() {
        let d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(StructureGraph::build(&d).find_cycles().is_empty());
    }

    #[test]
    fn test_disconnected_components_probed_independently() {
        // Two components, each its own cycle.
        let d = diagram(
            &["a", "b", "x", "y"],
            &[("a", "b"), ("b", "a"), ("x", "y"), ("y", "x")],
        );
        let cycles = StructureGraph::build(&d).find_cycles();
        assert_eq!(cycles.len(), 2);
    }

    #[test]
    fn test_connectivity_flags_disconnected_nodes() {
        let d = diagram(&["a", "b", "lonely"], &[("a", "b")]);
        let connectivity = StructureGraph::build(&d).connectivity();

        assert!(!connectivity.is_connected());
        assert_eq!(connectivity.disconnected, vec![Id::new("lonely")]);
        assert!(connectivity.reachable.contains(&Id::new("b")));
    }

    #[test]
    fn test_connectivity_is_undirected() {
        // b -> a: still reachable from a in the undirected view.
        let d = diagram(&["a", "b"], &[("b", "a")]);
        assert!(StructureGraph::build(&d).connectivity().is_connected());
    }

    #[test]
    fn test_connectivity_empty_diagram() {
        let connectivity = StructureGraph::build(&Diagram::new()).connectivity();
        assert!(connectivity.is_connected());
        assert!(connectivity.reachable.is_empty());
    }

    #[test]
    fn test_statistics() {
        let d = diagram(
            &["a", "b", "c", "iso"],
            &[("a", "b"), ("a", "c"), ("b", "c")],
        );
        let stats = StructureGraph::build(&d).statistics();

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.out_degree[&Id::new("a")], 2);
        assert_eq!(stats.in_degree[&Id::new("c")], 2);
        assert_eq!(stats.max_out_degree, 2);
        assert_eq!(stats.max_in_degree, 2);
        assert_eq!(stats.isolated_count, 1);
    }

    #[test]
    fn test_layering_of_chain() {
        let d = diagram(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let layers = StructureGraph::build(&d).assign_layers();

        assert_eq!(
            layers,
            vec![
                vec![Id::new("a")],
                vec![Id::new("b")],
                vec![Id::new("c")],
            ]
        );
    }

    #[test]
    fn test_layering_cyclic_fallback_terminates() {
        let d = diagram(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let layers = StructureGraph::build(&d).assign_layers();

        // The whole cycle collapses into a single layer, insertion order.
        assert_eq!(layers, vec![vec![Id::new("a"), Id::new("b")]]);
    }

    #[test]
    fn test_layering_mixed_cycle_after_root() {
        let d = diagram(&["root", "a", "b"], &[("root", "a"), ("a", "b"), ("b", "a")]);
        let layers = StructureGraph::build(&d).assign_layers();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0], vec![Id::new("root")]);
        assert_eq!(layers[1], vec![Id::new("a"), Id::new("b")]);
    }

    #[test]
    fn test_duplicate_ids_and_dangling_edges_do_not_crash() {
        let mut d = diagram(&["a", "b"], &[("a", "b"), ("a", "ghost")]);
        d.add_node(Node::new("a", "Duplicate", NodeKind::Process));

        let structure = StructureGraph::build(&d);
        assert_eq!(structure.node_ids().len(), 2);
        assert_eq!(structure.edge_endpoints().count(), 1);
        assert_eq!(structure.statistics().node_count, 3);
    }
}
