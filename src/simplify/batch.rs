//! Whole-layer batch simplification.
//!
//! The simplifier holds no per-call state, so independent shapes (all walls
//! of all layers of a print, say) can be processed in parallel. These
//! helpers fan a shape list out over the rayon thread pool and drop shapes
//! that collapsed to degenerate, empty results.

use log::debug;
use rayon::prelude::*;

use super::Simplifier;
use crate::extrusion::{ExtrusionLine, VariableWidthLines};
use crate::geometry::{Polygons, Polylines};

/// Simplify a batch of closed polygons in parallel.
///
/// Polygons that collapse below 3 vertices are dropped from the result.
pub fn simplify_polygons(simplifier: &Simplifier, polygons: &Polygons) -> Polygons {
    let simplified: Polygons = polygons
        .par_iter()
        .map(|polygon| simplifier.polygon(polygon))
        .collect();
    retain_non_degenerate(simplified, "polygons", |p| p.is_empty())
}

/// Simplify a batch of open polylines in parallel.
///
/// Polylines that collapse below 2 vertices are dropped from the result.
pub fn simplify_polylines(simplifier: &Simplifier, polylines: &Polylines) -> Polylines {
    let simplified: Polylines = polylines
        .par_iter()
        .map(|polyline| simplifier.polyline(polyline))
        .collect();
    retain_non_degenerate(simplified, "polylines", |p| p.is_empty())
}

/// Simplify a batch of variable-width extrusion lines in parallel.
///
/// Lines that collapse below their minimum junction count are dropped from
/// the result.
pub fn simplify_extrusion_lines(
    simplifier: &Simplifier,
    lines: &VariableWidthLines,
) -> VariableWidthLines {
    let simplified: VariableWidthLines = lines
        .par_iter()
        .map(|line| simplifier.extrusion_line(line))
        .collect();
    retain_non_degenerate(simplified, "extrusion lines", ExtrusionLine::is_empty)
}

fn retain_non_degenerate<T>(
    shapes: Vec<T>,
    kind: &str,
    is_degenerate: impl Fn(&T) -> bool,
) -> Vec<T> {
    let total = shapes.len();
    let kept: Vec<T> = shapes
        .into_iter()
        .filter(|shape| !is_degenerate(shape))
        .collect();
    if kept.len() < total {
        debug!("dropped {} degenerate {kind} of {total}", total - kept.len());
    }
    kept
}
