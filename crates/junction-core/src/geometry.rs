//! Geometric primitives for diagram layout.
//!
//! Coordinates follow the SVG convention: origin at the top left, x
//! increasing rightward, y increasing downward. Layout engines produce
//! maps from node id to [`Point`]; consumers (exporters, viewers) decide
//! what to draw there.

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// use junction_core::geometry::Point;
///
/// let p = Point::new(10.0, 20.0);
/// let q = p.add(Point::new(5.0, -5.0));
/// assert_eq!(q.x(), 15.0);
/// assert_eq!(q.y(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Component-wise addition.
    pub fn add(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Component-wise subtraction.
    pub fn sub(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by a scalar.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_math() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.hypot(), 5.0);
        assert_eq!(p.scale(2.0), Point::new(6.0, 8.0));
        assert_eq!(p.sub(Point::new(1.0, 1.0)), Point::new(2.0, 3.0));
    }
}
