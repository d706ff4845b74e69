//! Layout engine selection and configuration.
//!
//! A [`LayoutEngine`] is configured with an [`Algorithm`] plus any
//! algorithm-specific parameters, then applied to a diagram to produce a
//! map from node id to [`Point`]. The engine never mutates the diagram.
//!
//! Four strategies are available: a force-directed Fruchterman-Reingold
//! simulation, layered hierarchical placement, circular placement, and a
//! row-major grid. All of them return an empty map for an empty diagram.

mod engines;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::debug;

use junction_core::{geometry::Point, identifier::Id, model::Diagram};

use crate::analysis::StructureGraph;
use crate::JunctionError;

pub use engines::PositionEngine;

/// The positioning algorithm a [`LayoutEngine`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    ForceDirected,
    #[default]
    Hierarchical,
    Circular,
    Grid,
}

impl FromStr for Algorithm {
    type Err = JunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-directed" => Ok(Self::ForceDirected),
            "hierarchical" => Ok(Self::Hierarchical),
            "circular" => Ok(Self::Circular),
            "grid" => Ok(Self::Grid),
            other => Err(JunctionError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceDirected => write!(f, "force-directed"),
            Self::Hierarchical => write!(f, "hierarchical"),
            Self::Circular => write!(f, "circular"),
            Self::Grid => write!(f, "grid"),
        }
    }
}

/// Flow direction for hierarchical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Whether layers advance along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }

    /// Whether layer indices count backwards from the last layer.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }
}

impl FromStr for Direction {
    type Err = JunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(Self::TopToBottom),
            "bt" | "bottom-to-top" => Ok(Self::BottomToTop),
            "lr" | "left-to-right" => Ok(Self::LeftToRight),
            "rl" | "right-to-left" => Ok(Self::RightToLeft),
            other => Err(JunctionError::UnknownDirection(other.to_string())),
        }
    }
}

/// Configured layout engine.
///
/// Parameters irrelevant to the selected algorithm are simply unused, so
/// the same builder surface works for all four strategies.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    algorithm: Algorithm,
    direction: Direction,
    iterations: usize,
    optimal_distance: f32,
    repulsion_strength: f32,
    attraction_strength: f32,
    cooling_factor: f32,
    layer_spacing: f32,
    node_spacing: f32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            direction: Direction::default(),
            iterations: 100,
            optimal_distance: 100.0,
            repulsion_strength: 5000.0,
            attraction_strength: 0.1,
            cooling_factor: 0.95,
            layer_spacing: 100.0,
            node_spacing: 150.0,
        }
    }
}

impl LayoutEngine {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Set the flow direction for hierarchical layout.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the iteration budget for the force-directed simulation.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the optimal edge length for the force-directed simulation.
    pub fn with_optimal_distance(mut self, distance: f32) -> Self {
        self.optimal_distance = distance;
        self
    }

    /// Set the node repulsion strength for the force-directed simulation.
    pub fn with_repulsion_strength(mut self, strength: f32) -> Self {
        self.repulsion_strength = strength;
        self
    }

    /// Set the edge attraction strength for the force-directed simulation.
    pub fn with_attraction_strength(mut self, strength: f32) -> Self {
        self.attraction_strength = strength;
        self
    }

    /// Set the per-iteration temperature decay factor.
    pub fn with_cooling_factor(mut self, factor: f32) -> Self {
        self.cooling_factor = factor;
        self
    }

    /// Set the spacing between adjacent layers in hierarchical layout.
    pub fn with_layer_spacing(mut self, spacing: f32) -> Self {
        self.layer_spacing = spacing;
        self
    }

    /// Set the spacing between nodes within a layer in hierarchical layout.
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Computes a position for every node of the diagram.
    pub fn apply(&self, diagram: &Diagram) -> HashMap<Id, Point> {
        if diagram.nodes.is_empty() {
            return HashMap::new();
        }

        let structure = StructureGraph::build(diagram);
        let engine: Box<dyn PositionEngine> = match self.algorithm {
            Algorithm::ForceDirected => Box::new(engines::ForceDirected {
                iterations: self.iterations,
                optimal_distance: self.optimal_distance,
                repulsion_strength: self.repulsion_strength,
                attraction_strength: self.attraction_strength,
                cooling_factor: self.cooling_factor,
            }),
            Algorithm::Hierarchical => Box::new(engines::Hierarchical {
                direction: self.direction,
                layer_spacing: self.layer_spacing,
                node_spacing: self.node_spacing,
            }),
            Algorithm::Circular => Box::new(engines::Circular),
            Algorithm::Grid => Box::new(engines::Grid),
        };

        let positions = engine.compute(&structure);
        debug!(algorithm:% = self.algorithm, nodes = positions.len(); "Computed layout");
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use junction_core::model::{Edge, Node, NodeKind};

    fn chain(ids: &[&str]) -> Diagram {
        let mut d = Diagram::new();
        for id in ids {
            d.add_node(Node::new(*id, id.to_uppercase(), NodeKind::Process));
        }
        for pair in ids.windows(2) {
            d.add_edge(Edge::new(pair[0], pair[1]));
        }
        d
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            "force-directed".parse::<Algorithm>(),
            Ok(Algorithm::ForceDirected)
        );
        assert_eq!("grid".parse::<Algorithm>(), Ok(Algorithm::Grid));
        assert_eq!(
            "spiral".parse::<Algorithm>(),
            Err(JunctionError::UnknownAlgorithm("spiral".to_string()))
        );
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("TB".parse::<Direction>(), Ok(Direction::TopToBottom));
        assert_eq!(
            "left-to-right".parse::<Direction>(),
            Ok(Direction::LeftToRight)
        );
        assert_eq!("rl".parse::<Direction>(), Ok(Direction::RightToLeft));
        assert_eq!(
            "diagonal".parse::<Direction>(),
            Err(JunctionError::UnknownDirection("diagonal".to_string()))
        );
    }

    #[test]
    fn test_empty_diagram_all_algorithms() {
        let empty = Diagram::new();
        for algorithm in [
            Algorithm::ForceDirected,
            Algorithm::Hierarchical,
            Algorithm::Circular,
            Algorithm::Grid,
        ] {
            assert!(LayoutEngine::new(algorithm).apply(&empty).is_empty());
        }
    }

    #[test]
    fn test_every_node_gets_a_position() {
        let diagram = chain(&["a", "b", "c", "d"]);
        for algorithm in [
            Algorithm::ForceDirected,
            Algorithm::Hierarchical,
            Algorithm::Circular,
            Algorithm::Grid,
        ] {
            let positions = LayoutEngine::new(algorithm).apply(&diagram);
            assert_eq!(positions.len(), 4, "{algorithm} missed nodes");
        }
    }

    #[test]
    fn test_hierarchical_chain_top_to_bottom() {
        let diagram = chain(&["a", "b", "c"]);
        let positions = LayoutEngine::new(Algorithm::Hierarchical).apply(&diagram);

        let a = positions[&Id::new("a")];
        let b = positions[&Id::new("b")];
        let c = positions[&Id::new("c")];

        // Single-node layers share an x and stack downward.
        assert!(approx_eq!(f32, a.x(), b.x()));
        assert!(approx_eq!(f32, b.x(), c.x()));
        assert!(a.y() < b.y());
        assert!(b.y() < c.y());
    }

    #[test]
    fn test_hierarchical_bottom_to_top_inverts_layers() {
        let diagram = chain(&["a", "b", "c"]);
        let positions = LayoutEngine::new(Algorithm::Hierarchical)
            .with_direction(Direction::BottomToTop)
            .apply(&diagram);

        assert!(positions[&Id::new("a")].y() > positions[&Id::new("c")].y());
    }

    #[test]
    fn test_hierarchical_left_to_right_advances_x() {
        let diagram = chain(&["a", "b", "c"]);
        let positions = LayoutEngine::new(Algorithm::Hierarchical)
            .with_direction(Direction::LeftToRight)
            .apply(&diagram);

        let a = positions[&Id::new("a")];
        let c = positions[&Id::new("c")];
        assert!(a.x() < c.x());
        assert!(approx_eq!(f32, a.y(), c.y()));
    }

    #[test]
    fn test_non_random_layouts_are_deterministic() {
        let diagram = chain(&["a", "b", "c", "d", "e"]);
        for algorithm in [Algorithm::Hierarchical, Algorithm::Circular, Algorithm::Grid] {
            let engine = LayoutEngine::new(algorithm);
            assert_eq!(engine.apply(&diagram), engine.apply(&diagram));
        }
    }

    #[test]
    fn test_force_directed_separates_nodes() {
        let diagram = chain(&["a", "b", "c"]);
        let positions = LayoutEngine::new(Algorithm::ForceDirected).apply(&diagram);

        let points: Vec<Point> = positions.values().copied().collect();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert_ne!(points[i], points[j]);
            }
        }
    }

    #[test]
    fn test_force_directed_normalizes_to_positive_coordinates() {
        let diagram = chain(&["a", "b", "c", "d"]);
        let positions = LayoutEngine::new(Algorithm::ForceDirected).apply(&diagram);

        let min_x = positions.values().map(|p| p.x()).fold(f32::INFINITY, f32::min);
        let min_y = positions.values().map(|p| p.y()).fold(f32::INFINITY, f32::min);
        assert!(approx_eq!(f32, min_x, 50.0, epsilon = 0.001));
        assert!(approx_eq!(f32, min_y, 50.0, epsilon = 0.001));
    }

    #[test]
    fn test_grid_row_major() {
        // Four nodes form a 2x2 grid.
        let diagram = chain(&["a", "b", "c", "d"]);
        let positions = LayoutEngine::new(Algorithm::Grid).apply(&diagram);

        assert_eq!(positions[&Id::new("a")], Point::new(50.0, 50.0));
        assert_eq!(positions[&Id::new("b")], Point::new(200.0, 50.0));
        assert_eq!(positions[&Id::new("c")], Point::new(50.0, 150.0));
        assert_eq!(positions[&Id::new("d")], Point::new(200.0, 150.0));
    }

    #[test]
    fn test_circular_radius_grows_with_node_count() {
        let small = chain(&["a", "b", "c"]);
        let positions = LayoutEngine::new(Algorithm::Circular).apply(&small);
        // Three nodes keep the minimum radius; the first node sits at
        // angle zero, so its position is (2r, r).
        assert_eq!(positions[&Id::new("a")], Point::new(400.0, 200.0));

        let ids: Vec<String> = (0..10).map(|i| format!("n{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let big = chain(&refs);
        let positions = LayoutEngine::new(Algorithm::Circular).apply(&big);
        assert_eq!(positions[&Id::new("n0")], Point::new(600.0, 300.0));
    }
}
