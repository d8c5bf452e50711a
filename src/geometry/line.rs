//! Line segment type.
//!
//! This module provides the Line type representing a line segment between two
//! points, with the point-to-line distance and line-line intersection
//! primitives the simplification engine is built on.

use super::{cross2, Point};
use crate::{Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Create a line from coordinates.
    #[inline]
    pub const fn from_coords(ax: Coord, ay: Coord, bx: Coord, by: Coord) -> Self {
        Self {
            a: Point::new(ax, ay),
            b: Point::new(bx, by),
        }
    }

    /// Get the direction vector (b - a).
    #[inline]
    pub fn direction(&self) -> Point {
        self.b - self.a
    }

    /// Get the midpoint of the line segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.a.x + self.b.x) / 2, (self.a.y + self.b.y) / 2)
    }

    /// Get the squared length of the line segment.
    #[inline]
    pub fn length_squared(&self) -> i128 {
        self.a.distance_squared(&self.b)
    }

    /// Get the length of the line segment.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.a.distance(&self.b)
    }

    /// Check if this line segment is a point (zero length).
    #[inline]
    pub fn is_point(&self) -> bool {
        self.a == self.b
    }

    /// Reverse the direction of the line segment.
    #[inline]
    pub fn reverse(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }

    /// Calculate the distance from a point to this line segment.
    pub fn distance_to_point(&self, p: &Point) -> CoordF {
        let proj = p.project_onto_segment(self.a, self.b);
        p.distance(&proj)
    }

    /// Calculate the squared distance from a point to this line segment.
    pub fn distance_to_point_squared(&self, p: &Point) -> i128 {
        let proj = p.project_onto_segment(self.a, self.b);
        p.distance_squared(&proj)
    }

    /// Squared distance from `p` to the infinite line through `a` and `b`,
    /// in exact integer arithmetic.
    ///
    /// dist² = cross(b-a, p-a)² / |b-a|², truncated. The i128 intermediate
    /// square holds any coordinates within a few meters of the origin, far
    /// beyond any build volume. Degenerates to the point distance when
    /// `a == b`.
    pub fn dist2_to_infinite(p: Point, a: Point, b: Point) -> i128 {
        let dir = b - a;
        let len_sq = dir.length_squared();
        if len_sq == 0 {
            return p.distance_squared(&a);
        }

        let ap = p - a;
        let cross = cross2(dir, ap);
        cross * cross / len_sq
    }

    /// Check if this line segment is parallel to another.
    pub fn is_parallel_to(&self, other: &Line) -> bool {
        cross2(self.direction(), other.direction()) == 0
    }

    /// Calculate the intersection point of two line segments.
    /// Returns None if the segments don't intersect.
    pub fn intersection(&self, other: &Line) -> Option<Point> {
        let d1 = self.direction();
        let d2 = other.direction();

        let cross = cross2(d1, d2);
        if cross == 0 {
            // Lines are parallel
            return None;
        }

        let diff = other.a - self.a;
        let t = cross2(diff, d2) as CoordF / cross as CoordF;
        let u = cross2(diff, d1) as CoordF / cross as CoordF;

        // Check if intersection is within both segments
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(Point::new(
                (self.a.x as CoordF + t * d1.x as CoordF).round() as Coord,
                (self.a.y as CoordF + t * d1.y as CoordF).round() as Coord,
            ))
        } else {
            None
        }
    }

    /// Calculate the intersection point of the two infinite lines through
    /// this segment and `other`. Returns None if the lines are parallel.
    pub fn intersection_infinite(&self, other: &Line) -> Option<Point> {
        let d1 = self.direction();
        let d2 = other.direction();

        let cross = cross2(d1, d2);
        if cross == 0 {
            // Lines are parallel
            return None;
        }

        let diff = other.a - self.a;
        let t = cross2(diff, d2) as CoordF / cross as CoordF;

        Some(Point::new(
            (self.a.x as CoordF + t * d1.x as CoordF).round() as Coord,
            (self.a.y as CoordF + t * d1.y as CoordF).round() as Coord,
        ))
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}

impl From<(Point, Point)> for Line {
    #[inline]
    fn from((a, b): (Point, Point)) -> Self {
        Self { a, b }
    }
}

/// Type alias for a collection of lines.
pub type Lines = Vec<Line>;
