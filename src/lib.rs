//! # toolpath-simplify
//!
//! Bounded-error simplification of 2D toolpath geometry.
//!
//! Given a closed polygon or open polyline of integer-coordinate vertices,
//! the [`Simplifier`] removes as many vertices as possible while bounding how
//! far the simplified contour may deviate from the original. For
//! variable-width wall toolpaths ([`ExtrusionLine`]) it additionally bounds
//! how much the locally extruded cross-sectional area may change and refuses
//! to smooth over deliberate width transitions.
//!
//! ## Example
//!
//! ```rust
//! use toolpath_simplify::{Point, Polygon, Simplifier, SimplifyConfig, scale};
//!
//! let polygon = Polygon::from_points(vec![
//!     Point::new(0, 0),
//!     Point::new(scale(5.0), scale(0.001)), // near-colinear, removable
//!     Point::new(scale(10.0), 0),
//!     Point::new(scale(10.0), scale(10.0)),
//!     Point::new(0, scale(10.0)),
//! ]);
//!
//! let simplifier = Simplifier::new(SimplifyConfig::default())?;
//! let simplified = simplifier.polygon(&polygon);
//! assert_eq!(simplified.len(), 4);
//! # Ok::<(), toolpath_simplify::Error>(())
//! ```
//!
//! ## Coordinate System
//!
//! All geometry uses scaled integer coordinates internally to avoid
//! floating-point precision issues. Coordinates are scaled by
//! `SCALING_FACTOR` (1,000,000), so 1 unit = 1 nanometer.
//!
//! - Use `scale()` / `scaled()` to convert from mm to internal units
//! - Use `unscale()` / `unscaled()` to convert from internal units to mm

pub mod extrusion;
pub mod geometry;
pub mod simplify;

pub use extrusion::{ExtrusionJunction, ExtrusionLine, VariableWidthLines};
pub use geometry::{Line, Point, PointF, Polygon, Polygons, Polyline, Polylines};
pub use simplify::{
    simplify_extrusion_lines, simplify_polygons, simplify_polylines, Simplifier, SimplifyConfig,
    MAXIMUM_AREA_DEVIATION, MAXIMUM_DEVIATION, MAXIMUM_RESOLUTION, MIN_RESOLUTION,
    WIDTH_TRANSITION_THRESHOLD,
};

/// Coordinate type used throughout the crate.
/// Using i64 for integer coordinates (scaled by SCALING_FACTOR) to avoid floating-point issues.
pub type Coord = i64;

/// Floating-point coordinate type for unscaled values.
pub type CoordF = f64;

/// Scaling factor: coordinates are stored as integers scaled by this factor.
/// 1 unit = 1 nanometer, so 1mm = 1_000_000 units.
pub const SCALING_FACTOR: f64 = 1_000_000.0;

/// Scale a floating-point coordinate to integer.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Unscale an integer coordinate to floating-point.
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

/// Scale a floating-point coordinate to integer (same as scale, for compatibility).
#[inline]
pub fn scaled(v: CoordF) -> Coord {
    scale(v)
}

/// Unscale an integer coordinate to floating-point (same as unscale, for compatibility).
#[inline]
pub fn unscaled(v: Coord) -> CoordF {
    unscale(v)
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for simplification operations.
///
/// Simplification itself never fails: degenerate inputs collapse to empty
/// shapes and inadmissible removals are silent per-vertex no-ops. Errors only
/// arise at the construction surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
