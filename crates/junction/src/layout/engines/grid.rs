//! Grid layout.

use std::collections::HashMap;

use junction_core::{geometry::Point, identifier::Id};

use crate::analysis::StructureGraph;

use super::PositionEngine;

const SPACING_X: f32 = 150.0;
const SPACING_Y: f32 = 100.0;
const MARGIN: f32 = 50.0;

/// Places nodes row-major in a square-ish grid with
/// `columns = ceil(sqrt(n))`, ignoring edges entirely.
#[derive(Debug, Clone, Default)]
pub struct Grid;

impl PositionEngine for Grid {
    fn compute(&self, structure: &StructureGraph) -> HashMap<Id, Point> {
        let ids = structure.node_ids();
        if ids.is_empty() {
            return HashMap::new();
        }

        let cols = (ids.len() as f32).sqrt().ceil() as usize;
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                let row = i / cols;
                let col = i % cols;
                let position = Point::new(
                    col as f32 * SPACING_X + MARGIN,
                    row as f32 * SPACING_Y + MARGIN,
                );
                (id, position)
            })
            .collect()
    }
}
