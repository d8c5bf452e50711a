//! Geometry primitives for toolpath simplification.
//!
//! This module provides the fundamental geometric types the simplifier
//! operates on:
//! - [`Point`] and [`PointF`] - 2D points with integer (scaled) and
//!   floating-point (unscaled) coordinates
//! - [`Line`] - Line segment between two points
//! - [`Polygon`] - Closed contour (last vertex connects to the first)
//! - [`Polyline`] - Open path with distinguished endpoints
//!
//! ## Coordinate System
//!
//! Scaled integer coordinates are used internally to avoid floating-point
//! precision issues. Coordinates are scaled by `SCALING_FACTOR` (1,000,000),
//! so 1 unit = 1 nanometer.
//!
//! - Use `scale()` / `scaled()` to convert from mm to internal units
//! - Use `unscale()` / `unscaled()` to convert from internal units to mm

mod line;
mod point;
mod polygon;
mod polyline;

pub use line::{Line, Lines};
pub use point::{Point, PointF, Points};
pub use polygon::{Polygon, Polygons};
pub use polyline::{Polyline, Polylines};

/// Calculate the cross product of two 2D vectors (returns a scalar).
/// This is useful for determining the orientation of three points.
#[inline]
pub fn cross2(v1: Point, v2: Point) -> i128 {
    v1.cross(&v2)
}

/// Calculate the dot product of two 2D vectors.
#[inline]
pub fn dot2(v1: Point, v2: Point) -> i128 {
    v1.dot(&v2)
}
