//! Polyline type for open paths.
//!
//! This module provides the Polyline type representing an open path (a
//! sequence of connected line segments). Unlike a Polygon, the first and last
//! vertices are distinguished endpoints.

use super::{Line, Point, Polygon};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// An open polyline defined by a sequence of points.
///
/// Unlike a Polygon, a Polyline is not implicitly closed - it's a path from
/// the first point to the last point. A polyline with fewer than 2 vertices
/// is degenerate.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Create a new empty polyline.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polyline from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a polyline from a polygon (closes the polygon by repeating the first point).
    #[inline]
    pub fn from_polygon(polygon: &Polygon) -> Self {
        let mut points = polygon.points().to_vec();
        if !points.is_empty() && points.first() != points.last() {
            points.push(points[0]);
        }
        Self { points }
    }

    /// Create a polyline with the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Get the points of this polyline.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get a mutable reference to the points.
    #[inline]
    pub fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }

    /// Consume the polyline and return its points.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Get the number of points in the polyline.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polyline is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the polyline.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Remove and return the last point.
    #[inline]
    pub fn pop(&mut self) -> Option<Point> {
        self.points.pop()
    }

    /// Get the first point, if any.
    #[inline]
    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Get the last point, if any.
    #[inline]
    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Reverse the order of the points in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Iterate over the segments of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }

    /// Total path length from the first point to the last, in units.
    pub fn length(&self) -> CoordF {
        self.segments().map(|s| s.length()).sum()
    }
}

impl fmt::Debug for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polyline({:?})", self.points)
    }
}

impl Deref for Polyline {
    type Target = [Point];

    #[inline]
    fn deref(&self) -> &[Point] {
        &self.points
    }
}

impl DerefMut for Polyline {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

impl Index<usize> for Polyline {
    type Output = Point;

    #[inline]
    fn index(&self, index: usize) -> &Point {
        &self.points[index]
    }
}

impl IndexMut<usize> for Polyline {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Point {
        &mut self.points[index]
    }
}

impl From<Vec<Point>> for Polyline {
    #[inline]
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl IntoIterator for Polyline {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Type alias for a collection of polylines.
pub type Polylines = Vec<Polyline>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale;

    #[test]
    fn test_polyline_basics() {
        let mut polyline = Polyline::new();
        assert!(polyline.is_empty());

        polyline.push(Point::new(0, 0));
        polyline.push(Point::new(100, 0));
        polyline.push(Point::new(100, 100));
        assert_eq!(polyline.len(), 3);
        assert_eq!(polyline.first(), Some(&Point::new(0, 0)));
        assert_eq!(polyline.last(), Some(&Point::new(100, 100)));
    }

    #[test]
    fn test_polyline_length() {
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(scale(3.0), 0),
            Point::new(scale(3.0), scale(4.0)),
        ]);
        assert!((polyline.length() - 7e6).abs() < 1.0);
    }

    #[test]
    fn test_from_polygon_closes() {
        let polygon = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
        ]);
        let polyline = Polyline::from_polygon(&polygon);
        assert_eq!(polyline.len(), 4);
        assert_eq!(polyline.first(), polyline.last());
    }

    #[test]
    fn test_segments() {
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
        ]);
        let segments: Vec<Line> = polyline.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].a, Point::new(100, 0));
    }
}
