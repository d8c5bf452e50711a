//! Extrusion junction: a toolpath vertex with a width.

use crate::geometry::Point;
use crate::{unscale, Coord, CoordF};
use serde::{Deserialize, Serialize};

/// A junction (vertex) in a variable-width extrusion path.
///
/// Each junction specifies a position and the extrusion width at that point.
/// The width varies along the path; it is linearly interpolated between
/// junctions when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtrusionJunction {
    /// The position of the centerline at this junction (scaled coordinates).
    pub position: Point,

    /// The extrusion width at this junction (scaled coordinates).
    pub width: Coord,

    /// Which perimeter/wall this junction belongs to, counted from the
    /// outside inwards (0 = outermost wall).
    pub perimeter_index: usize,
}

impl ExtrusionJunction {
    /// Create a new extrusion junction.
    pub fn new(position: Point, width: Coord, perimeter_index: usize) -> Self {
        Self {
            position,
            width,
            perimeter_index,
        }
    }

    /// Get the X coordinate (scaled).
    #[inline]
    pub fn x(&self) -> Coord {
        self.position.x
    }

    /// Get the Y coordinate (scaled).
    #[inline]
    pub fn y(&self) -> Coord {
        self.position.y
    }

    /// Get the extrusion width in millimeters.
    #[inline]
    pub fn width_mm(&self) -> CoordF {
        unscale(self.width)
    }

    /// Distance to another junction, in units.
    #[inline]
    pub fn distance_to(&self, other: &ExtrusionJunction) -> CoordF {
        self.position.distance(&other.position)
    }

    /// Squared distance to another junction.
    /// Returns i128 to avoid overflow with large coordinates.
    #[inline]
    pub fn distance_squared_to(&self, other: &ExtrusionJunction) -> i128 {
        self.position.distance_squared(&other.position)
    }

    /// Check if this junction has the same position as another (within tolerance).
    pub fn coincides_with(&self, other: &ExtrusionJunction, tolerance: Coord) -> bool {
        self.position.coincides_with(&other.position, tolerance)
    }
}

impl From<(Point, Coord, usize)> for ExtrusionJunction {
    fn from((position, width, perimeter_index): (Point, Coord, usize)) -> Self {
        Self::new(position, width, perimeter_index)
    }
}

/// A collection of extrusion junctions forming a path segment.
pub type ExtrusionJunctions = Vec<ExtrusionJunction>;
