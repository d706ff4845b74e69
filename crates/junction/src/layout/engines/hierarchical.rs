//! Hierarchical (layered) layout.

use std::collections::HashMap;

use junction_core::{geometry::Point, identifier::Id};

use crate::analysis::StructureGraph;
use crate::layout::Direction;

use super::PositionEngine;

const CROSS_AXIS_CENTER: f32 = 300.0;
const FLOW_AXIS_MARGIN: f32 = 50.0;

/// Buckets nodes into topological layers and spaces them evenly: layers
/// along the flow axis, nodes within a layer along the perpendicular
/// axis, centered around the cross-axis midpoint.
///
/// Cyclic graphs degrade gracefully through the layering fallback, which
/// collapses the unresolvable remainder into a single layer.
#[derive(Debug, Clone)]
pub struct Hierarchical {
    pub direction: Direction,
    pub layer_spacing: f32,
    pub node_spacing: f32,
}

impl PositionEngine for Hierarchical {
    fn compute(&self, structure: &StructureGraph) -> HashMap<Id, Point> {
        let layers = structure.assign_layers();
        let layer_count = layers.len();
        let mut positions = HashMap::new();

        for (layer_idx, layer) in layers.iter().enumerate() {
            let flow_idx = if self.direction.is_reversed() {
                layer_count - layer_idx - 1
            } else {
                layer_idx
            };
            let flow = flow_idx as f32 * self.layer_spacing + FLOW_AXIS_MARGIN;
            let layer_size = layer.len() as f32;

            for (node_idx, &id) in layer.iter().enumerate() {
                let cross =
                    (node_idx as f32 - layer_size / 2.0) * self.node_spacing + CROSS_AXIS_CENTER;
                let position = if self.direction.is_vertical() {
                    Point::new(cross, flow)
                } else {
                    Point::new(flow, cross)
                };
                positions.insert(id, position);
            }
        }

        positions
    }
}
