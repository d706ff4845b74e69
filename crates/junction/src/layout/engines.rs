//! Positioning engine implementations.
//!
//! Each engine consumes the structural view of a diagram and produces a
//! complete coordinate map. Engines are stateless between calls;
//! configuration lives in their fields and is set by
//! [`LayoutEngine`](super::LayoutEngine).

mod circular;
mod force;
mod grid;
mod hierarchical;

use std::collections::HashMap;

use junction_core::{geometry::Point, identifier::Id};

use crate::analysis::StructureGraph;

pub use circular::Circular;
pub use force::ForceDirected;
pub use grid::Grid;
pub use hierarchical::Hierarchical;

/// Interface for node positioning strategies.
pub trait PositionEngine {
    /// Computes a position for every node in the structural view.
    fn compute(&self, structure: &StructureGraph) -> HashMap<Id, Point>;
}
