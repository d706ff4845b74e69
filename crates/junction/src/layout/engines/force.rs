//! Force-directed layout, a Fruchterman-Reingold variant.

use std::collections::HashMap;

use rand::RngExt;

use junction_core::{geometry::Point, identifier::Id};

use crate::analysis::StructureGraph;

use super::PositionEngine;

const INITIAL_TEMPERATURE: f32 = 100.0;
const INITIAL_BOX: f32 = 500.0;
const MARGIN: f32 = 50.0;

// Keeps distance strictly positive when two nodes coincide.
const EPSILON: f32 = 0.01;

/// Spring-embedder simulation: every node pair repels, every edge
/// attracts, and the per-node displacement is clamped to a temperature
/// that decays geometrically each iteration.
///
/// Starting positions are random, so repeated runs produce different
/// coordinate maps. The iteration budget is fixed, so the cost is bounded
/// regardless of graph shape.
#[derive(Debug, Clone)]
pub struct ForceDirected {
    pub iterations: usize,
    pub optimal_distance: f32,
    pub repulsion_strength: f32,
    pub attraction_strength: f32,
    pub cooling_factor: f32,
}

impl PositionEngine for ForceDirected {
    fn compute(&self, structure: &StructureGraph) -> HashMap<Id, Point> {
        let ids = structure.node_ids();
        if ids.is_empty() {
            return HashMap::new();
        }

        let index: HashMap<Id, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut rng = rand::rng();
        let mut positions: Vec<Point> = ids
            .iter()
            .map(|_| {
                Point::new(
                    rng.random_range(0.0..INITIAL_BOX),
                    rng.random_range(0.0..INITIAL_BOX),
                )
            })
            .collect();

        let edges: Vec<(usize, usize)> = structure
            .edge_endpoints()
            .map(|(source, target)| (index[&source], index[&target]))
            .collect();

        let mut temperature = INITIAL_TEMPERATURE;
        for _ in 0..self.iterations {
            let mut forces = vec![Point::default(); positions.len()];

            // Repulsion between every unordered pair.
            for a in 0..positions.len() {
                for b in (a + 1)..positions.len() {
                    let delta = positions[a].sub(positions[b]);
                    let distance = delta.hypot() + EPSILON;
                    let force = self.repulsion_strength / (distance * distance);
                    let push = delta.scale(force / distance);
                    forces[a] = forces[a].add(push);
                    forces[b] = forces[b].sub(push);
                }
            }

            // Spring attraction along every edge.
            for &(source, target) in &edges {
                let delta = positions[target].sub(positions[source]);
                let distance = delta.hypot() + EPSILON;
                let force = self.attraction_strength * (distance - self.optimal_distance);
                let pull = delta.scale(force / distance);
                forces[source] = forces[source].add(pull);
                forces[target] = forces[target].sub(pull);
            }

            // Displace each node, clamped to the current temperature.
            for (position, force) in positions.iter_mut().zip(&forces) {
                let magnitude = force.hypot();
                if magnitude > 0.0 {
                    let displacement = magnitude.min(temperature);
                    *position = position.add(force.scale(displacement / magnitude));
                }
            }

            temperature *= self.cooling_factor;
        }

        // Translate so the minimum coordinates sit at the margin.
        let min_x = positions.iter().map(|p| p.x()).fold(f32::INFINITY, f32::min);
        let min_y = positions.iter().map(|p| p.y()).fold(f32::INFINITY, f32::min);
        let offset = Point::new(MARGIN - min_x, MARGIN - min_y);

        ids.iter()
            .zip(positions)
            .map(|(&id, position)| (id, position.add(offset)))
            .collect()
    }
}
