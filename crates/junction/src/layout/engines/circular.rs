//! Circular layout.

use std::collections::HashMap;
use std::f32::consts::TAU;

use junction_core::{geometry::Point, identifier::Id};

use crate::analysis::StructureGraph;

use super::PositionEngine;

const MIN_RADIUS: f32 = 200.0;
const RADIUS_PER_NODE: f32 = 30.0;

/// Places nodes evenly around a circle in insertion order. The radius
/// grows with node count so neighbors stay apart, and the circle is
/// offset by one radius so all coordinates are non-negative.
#[derive(Debug, Clone, Default)]
pub struct Circular;

impl PositionEngine for Circular {
    fn compute(&self, structure: &StructureGraph) -> HashMap<Id, Point> {
        let ids = structure.node_ids();
        let n = ids.len();
        if n == 0 {
            return HashMap::new();
        }

        let radius = MIN_RADIUS.max(RADIUS_PER_NODE * n as f32);
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                let angle = TAU * i as f32 / n as f32;
                let position =
                    Point::new(radius * angle.cos() + radius, radius * angle.sin() + radius);
                (id, position)
            })
            .collect()
    }
}
