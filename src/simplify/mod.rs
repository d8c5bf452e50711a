//! Vertex-reduction engine for polygons, polylines and extrusion lines.
//!
//! The [`Simplifier`] removes as many vertices as possible from a shape while
//! bounding the contour error the removals introduce:
//!
//! - Vertices are processed least-important first, where importance is the
//!   squared deviation a removal would introduce. A min-priority queue holds
//!   potentially-stale entries; each pop is re-validated against the current
//!   shape state and re-inserted when a prior removal changed its neighbors.
//! - Edges longer than `max_resolution` are protected: a vertex between two
//!   long edges is never removed, and a short edge adjacent to a long edge is
//!   only eliminated by extending the surrounding edges to their intersection
//!   point, when that point stays within the deviation budget.
//! - Deviations below [`MIN_RESOLUTION`] are always acceptable to remove, so
//!   practically colinear segments are joined regardless of edge length.
//!
//! The same control skeleton serves plain points and width-tagged junctions;
//! the junction instantiation layers extrusion-area and width-transition
//! checks on top (see the `extrusion` module).
//!
//! The engine is a bounded-error heuristic: it does not promise the minimal
//! vertex count, only that every removal stays inside the configured budgets.

mod batch;

pub use batch::{simplify_extrusion_lines, simplify_polygons, simplify_polylines};

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::extrusion::ExtrusionLine;
use crate::geometry::{Line, Point, Polygon, Polyline};
use crate::{scale, Coord, CoordF, Error, Result, SCALING_FACTOR};

/// Default maximum resolution (0.5mm).
/// Edges longer than this are protected from outright merging.
pub const MAXIMUM_RESOLUTION: CoordF = 0.5;

/// Default maximum deviation (0.025mm = 25 microns).
/// Hard cap on the contour error a removal may introduce.
pub const MAXIMUM_DEVIATION: CoordF = 0.025;

/// Default maximum extrusion area deviation (2.0 mm²).
/// Hard cap on the cross-sectional area change when merging variable-width
/// segments; only consulted for extrusion lines.
pub const MAXIMUM_AREA_DEVIATION: CoordF = 2.0;

/// Default width-transition sensitivity (dimensionless).
/// Two junction widths are a deliberate transition when they differ by more
/// than this fraction of the wider of the two.
pub const WIDTH_TRANSITION_THRESHOLD: CoordF = 0.5;

/// Deviation floor (0.005mm = 5 microns) below which removal is always
/// acceptable, even next to protected long edges. This is the rounding-error
/// scale of the fixed-point coordinates; it is a fixed property of the
/// algorithm rather than a tuning knob, which is why it is a constant and not
/// part of [`SimplifyConfig`].
pub const MIN_RESOLUTION: CoordF = 0.005;

/// Importance sentinel for vertices that must never be removed.
const INFINITE: i128 = i128::MAX;

/// Configuration for the simplifier. All lengths in mm, areas in mm².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Edges longer than this are never eligible for outright merging.
    /// Default: 0.5mm.
    pub max_resolution: CoordF,

    /// Hard cap on introduced contour error. Default: 0.025mm.
    pub max_deviation: CoordF,

    /// Hard cap on introduced cross-sectional area error for variable-width
    /// lines. Default: 2.0mm².
    pub max_area_deviation: CoordF,

    /// Width-discontinuity sensitivity: a junction is never merged across a
    /// width step larger than this fraction of the wider width.
    /// Default: 0.5.
    pub width_transition_threshold: CoordF,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            max_resolution: MAXIMUM_RESOLUTION,
            max_deviation: MAXIMUM_DEVIATION,
            max_area_deviation: MAXIMUM_AREA_DEVIATION,
            width_transition_threshold: WIDTH_TRANSITION_THRESHOLD,
        }
    }
}

impl SimplifyConfig {
    /// Create a configuration with the given positional tolerances and
    /// defaults for the rest.
    pub fn new(max_resolution: CoordF, max_deviation: CoordF) -> Self {
        Self {
            max_resolution,
            max_deviation,
            ..Default::default()
        }
    }

    /// Check that every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("max_resolution", self.max_resolution),
            ("max_deviation", self.max_deviation),
            ("max_area_deviation", self.max_area_deviation),
            ("width_transition_threshold", self.width_transition_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Stateless vertex-reduction strategy.
///
/// Constructed once from a [`SimplifyConfig`]; thresholds are scaled and
/// squared up front. All per-call state (the working copy of the shape, the
/// deletion mask, the priority queue) is local to one invocation, so a single
/// `Simplifier` may be shared across threads and shapes freely.
#[derive(Debug, Clone)]
pub struct Simplifier {
    config: SimplifyConfig,
    max_resolution2: i128,
    max_deviation2: i128,
    min_resolution2: i128,
    /// Area budget in square units (mm² scaled twice).
    max_area_deviation2: CoordF,
}

impl Simplifier {
    /// Create a simplifier, validating the configuration.
    pub fn new(config: SimplifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: SimplifyConfig) -> Self {
        let squared = |v: CoordF| {
            let s = scale(v) as i128;
            s * s
        };
        Self {
            max_resolution2: squared(config.max_resolution),
            max_deviation2: squared(config.max_deviation),
            min_resolution2: squared(MIN_RESOLUTION),
            max_area_deviation2: config.max_area_deviation * SCALING_FACTOR * SCALING_FACTOR,
            config,
        }
    }

    /// The configuration this simplifier was built from.
    #[inline]
    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    /// Simplify a closed polygon.
    ///
    /// Degenerate input (fewer than 3 vertices) collapses to an empty
    /// polygon; input already at the minimum size is returned unchanged.
    pub fn polygon(&self, polygon: &Polygon) -> Polygon {
        Polygon::from_points(self.reduce(polygon.points(), true))
    }

    /// Simplify an open polyline. The endpoints are always retained unmoved.
    ///
    /// Degenerate input (fewer than 2 vertices) collapses to an empty
    /// polyline; input already at the minimum size is returned unchanged.
    pub fn polyline(&self, polyline: &Polyline) -> Polyline {
        Polyline::from_points(self.reduce(polyline.points(), false))
    }

    /// Simplify a variable-width extrusion line.
    ///
    /// On top of the positional criteria this never merges across a distinct
    /// width transition and keeps the extruded cross-sectional area change of
    /// every merge within the configured budget. Line metadata passes through
    /// untouched.
    pub fn extrusion_line(&self, line: &ExtrusionLine) -> ExtrusionLine {
        ExtrusionLine {
            junctions: self.reduce(&line.junctions, line.is_closed),
            inset_idx: line.inset_idx,
            is_odd: line.is_odd,
            region_id: line.region_id,
            is_closed: line.is_closed,
        }
    }

    /// True when two junction widths differ distinctly enough to be a
    /// deliberate transition that must not be smoothed over.
    #[inline]
    pub(crate) fn is_width_transition(&self, a: Coord, b: Coord) -> bool {
        let wider = a.max(b) as CoordF;
        (a - b).unsigned_abs() as CoordF > self.config.width_transition_threshold * wider
    }

    /// Area budget in square units.
    #[inline]
    pub(crate) fn max_area_deviation2(&self) -> CoordF {
        self.max_area_deviation2
    }

    /// Run the greedy reduction over a vertex sequence.
    pub(crate) fn reduce<V: SimplifyVertex>(&self, vertices: &[V], is_closed: bool) -> Vec<V> {
        let min_size = if is_closed { 3 } else { 2 };
        if vertices.len() < min_size {
            return Vec::new();
        }
        if vertices.len() == min_size {
            return vertices.to_vec();
        }

        // Working copy: removal may also shift the vertices next to an
        // eliminated short edge.
        let mut verts = vertices.to_vec();
        let mut deleted = vec![false; verts.len()];

        let mut queue: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(verts.len());
        for index in 0..verts.len() {
            let importance = self.importance(&verts, &deleted, index, is_closed);
            queue.push(Reverse(Candidate { importance, index }));
        }

        // Iteratively take the least important vertex until the budget stops
        // further removals.
        while queue.len() > 3 {
            let Some(Reverse(candidate)) = queue.pop() else {
                break;
            };

            // The importance may have gone stale since this entry was pushed:
            // a neighboring removal changes the scores nearby. Re-validate
            // against the current state and re-insert on mismatch.
            let importance = self.importance(&verts, &deleted, candidate.index, is_closed);
            if importance != candidate.importance {
                queue.push(Reverse(Candidate {
                    importance,
                    index: candidate.index,
                }));
                continue;
            }

            if importance <= self.max_deviation2 {
                self.try_remove(&mut verts, &mut deleted, candidate.index, importance, is_closed);
            }
        }

        // Sweep the marked vertices in one pass, preserving original order.
        let result: Vec<V> = verts
            .iter()
            .zip(&deleted)
            .filter(|&(_, &gone)| !gone)
            .map(|(v, _)| *v)
            .collect();
        trace!(
            "reduced {} vertices to {} (closed: {})",
            vertices.len(),
            result.len(),
            is_closed
        );
        result
    }

    /// Squared contour error that removing `index` would introduce, or
    /// `INFINITE` for vertices that must be kept.
    fn importance<V: SimplifyVertex>(
        &self,
        verts: &[V],
        deleted: &[bool],
        index: usize,
        is_closed: bool,
    ) -> i128 {
        if !is_closed && (index == 0 || index == verts.len() - 1) {
            // Endpoints of an open polyline are always retained.
            return INFINITE;
        }
        // From here on neighbor lookups may wrap without leaving the shape.

        let before = previous_live(index, deleted);
        let after = next_live(index, deleted);
        if verts[index].pinned(&verts[before], &verts[after], self) {
            return INFINITE;
        }

        let vertex = verts[index].position();
        let before_position = verts[before].position();
        let after_position = verts[after].position();
        let deviation2 = Line::dist2_to_infinite(vertex, before_position, after_position);
        if deviation2 <= self.min_resolution2 {
            // So small that removal is always desired.
            return deviation2;
        }
        if (before_position - vertex).length_squared() > self.max_resolution2
            && (after_position - vertex).length_squared() > self.max_resolution2
        {
            // Both neighboring segments are long; removing this vertex would
            // reshape them.
            return INFINITE;
        }
        deviation2
    }

    /// Attempt to remove one vertex. Every inadmissible case returns without
    /// touching the shape.
    fn try_remove<V: SimplifyVertex>(
        &self,
        verts: &mut [V],
        deleted: &mut [bool],
        index: usize,
        deviation2: i128,
        is_closed: bool,
    ) {
        let before = previous_live(index, deleted);
        let after = next_live(index, deleted);
        if !verts[index].removal_allowed(&verts[before], &verts[after], self) {
            return;
        }

        if deviation2 <= self.min_resolution2 {
            // Below the floor the vertex may always go, even next to long
            // segments.
            deleted[index] = true;
            return;
        }

        let vertex = verts[index].position();
        let before_position = verts[before].position();
        let after_position = verts[after].position();
        let length2_before = (vertex - before_position).length_squared();
        let length2_after = (vertex - after_position).length_squared();

        if length2_before <= self.max_resolution2 && length2_after <= self.max_resolution2 {
            // Both neighboring segments are short; no long edge gets shifted.
            deleted[index] = true;
            return;
        }

        // One neighboring edge is longer than max_resolution, the other is
        // shorter. Eliminate the short edge by replacing it with the point
        // where the lines through the two surrounding edges intersect.
        let (bounding_before, bounding_after, shifted) = if length2_before <= length2_after {
            if !is_closed && before == 0 {
                // The short edge starts at the polyline boundary; there is no
                // far-side segment to intersect with.
                return;
            }
            let before_before = previous_live(before, deleted);
            (
                Line::new(verts[before_before].position(), before_position),
                Line::new(vertex, after_position),
                before,
            )
        } else {
            if !is_closed && after == verts.len() - 1 {
                return;
            }
            let after_after = next_live(after, deleted);
            (
                Line::new(before_position, vertex),
                Line::new(after_position, verts[after_after].position()),
                after,
            )
        };

        let Some(intersection) = bounding_before.intersection_infinite(&bounding_after) else {
            // Parallel surrounding edges; the short edge cannot be absorbed.
            return;
        };
        let intersection_deviation2 =
            Line::dist2_to_infinite(intersection, bounding_before.b, bounding_after.a);
        if intersection_deviation2 <= self.max_deviation2 {
            deleted[index] = true;
            verts[shifted] = verts[shifted].with_position(intersection);
        }
    }
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::from_validated(SimplifyConfig::default())
    }
}

/// Capability surface the reduction engine needs from a vertex type.
///
/// Plain points implement the geometry-only minimum; extrusion junctions add
/// the width-transition pin and the area-deviation admissibility check.
pub(crate) trait SimplifyVertex: Copy {
    fn position(&self) -> Point;

    /// The same vertex relocated; non-positional payload is preserved.
    fn with_position(self, position: Point) -> Self;

    /// Non-geometric reasons this vertex can never be removed.
    fn pinned(&self, _before: &Self, _after: &Self, _simplifier: &Simplifier) -> bool {
        false
    }

    /// Non-geometric admissibility of removing this vertex between the given
    /// live neighbors.
    fn removal_allowed(&self, _before: &Self, _after: &Self, _simplifier: &Simplifier) -> bool {
        true
    }
}

impl SimplifyVertex for Point {
    #[inline]
    fn position(&self) -> Point {
        *self
    }

    #[inline]
    fn with_position(self, position: Point) -> Self {
        position
    }
}

/// Priority-queue entry: a vertex index with the importance it had when the
/// entry was pushed. Ordered by (importance, index) so equal-importance
/// vertices process in stable index order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    importance: i128,
    index: usize,
}

/// Index of the nearest following vertex that is not masked as deleted,
/// wrapping around the end of the shape.
fn next_live(index: usize, deleted: &[bool]) -> usize {
    let size = deleted.len();
    let mut i = (index + 1) % size;
    while deleted[i] {
        i = (i + 1) % size;
    }
    i
}

/// Index of the nearest preceding vertex that is not masked as deleted,
/// wrapping around the start of the shape.
fn previous_live(index: usize, deleted: &[bool]) -> usize {
    let size = deleted.len();
    let mut i = (index + size - 1) % size;
    while deleted[i] {
        i = (i + size - 1) % size;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn square_mm(side: CoordF) -> Vec<Point> {
        vec![
            Point::new(0, 0),
            Point::new_scale(side, 0.0),
            Point::new_scale(side, side),
            Point::new_scale(0.0, side),
        ]
    }

    /// Config where every edge of a ~10mm shape counts as short.
    fn short_edge_config() -> SimplifyConfig {
        SimplifyConfig {
            max_resolution: 50.0,
            max_deviation: 0.01,
            ..Default::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SimplifyConfig::default().validate().is_ok());

        let bad = SimplifyConfig {
            max_deviation: -1.0,
            ..Default::default()
        };
        assert!(matches!(Simplifier::new(bad), Err(Error::Config(_))));

        let nan = SimplifyConfig {
            max_resolution: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(Simplifier::new(nan), Err(Error::Config(_))));
    }

    #[test]
    fn test_near_colinear_vertex_removed() {
        // A square with one extra vertex 0.008mm off the bottom edge. With
        // max_deviation 0.01mm the extra vertex goes and the corners stay.
        let mut points = square_mm(10.0);
        points.insert(1, Point::new_scale(5.0, 0.008));
        let polygon = Polygon::from_points(points);

        let simplifier = Simplifier::new(short_edge_config()).unwrap();
        let simplified = simplifier.polygon(&polygon);

        assert_eq!(simplified.points(), square_mm(10.0).as_slice());
    }

    #[test]
    fn test_deviation_bound_is_sharp() {
        // The same extra vertex at exactly 0.01mm deviation: removed when the
        // budget covers it, kept when it does not.
        let mut points = square_mm(10.0);
        points.insert(1, Point::new_scale(5.0, 0.01));
        let polygon = Polygon::from_points(points);

        let permissive = Simplifier::new(SimplifyConfig {
            max_deviation: 0.011,
            ..short_edge_config()
        })
        .unwrap();
        assert_eq!(permissive.polygon(&polygon).len(), 4);

        let strict = Simplifier::new(SimplifyConfig {
            max_deviation: 0.009,
            ..short_edge_config()
        })
        .unwrap();
        assert_eq!(strict.polygon(&polygon).len(), 5);
    }

    #[test]
    fn test_zero_thresholds_keep_shape_unchanged() {
        let polygon = Polygon::from_points(vec![
            Point::new_scale(0.0, 0.0),
            Point::new_scale(4.0, 1.0),
            Point::new_scale(7.0, 0.5),
            Point::new_scale(9.0, 3.0),
            Point::new_scale(5.0, 6.0),
            Point::new_scale(1.0, 4.0),
        ]);
        let simplifier = Simplifier::new(SimplifyConfig {
            max_resolution: 0.0,
            max_deviation: 0.0,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(simplifier.polygon(&polygon), polygon);
    }

    #[test]
    fn test_zero_thresholds_still_drop_exactly_colinear() {
        // Exact colinearity is deviation 0, which satisfies any budget.
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new(1_000_000, 0),
            Point::new(2_000_000, 0),
            Point::new(3_000_000, 0),
            Point::new(4_000_000, 1_000_000),
        ]);
        let simplifier = Simplifier::new(SimplifyConfig {
            max_resolution: 0.0,
            max_deviation: 0.0,
            ..Default::default()
        })
        .unwrap();

        let simplified = simplifier.polyline(&polyline);
        assert!(simplified.len() < polyline.len());
        assert_eq!(simplified.first(), Some(&Point::new(0, 0)));
        assert_eq!(simplified.last(), Some(&Point::new(4_000_000, 1_000_000)));
    }

    #[test]
    fn test_degenerate_shapes() {
        let simplifier = Simplifier::default();

        // Below the minimum size the shape collapses to empty.
        let two_gon = Polygon::from_points(vec![Point::new(0, 0), Point::new(100, 0)]);
        assert!(simplifier.polygon(&two_gon).is_empty());

        let dot = Polyline::from_points(vec![Point::new(0, 0)]);
        assert!(simplifier.polyline(&dot).is_empty());

        assert!(simplifier.polygon(&Polygon::new()).is_empty());

        // Exactly at the minimum size the shape is returned unchanged.
        let triangle = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(0, 100),
        ]);
        assert_eq!(simplifier.polygon(&triangle), triangle);

        let segment = Polyline::from_points(vec![Point::new(0, 0), Point::new(100, 0)]);
        assert_eq!(simplifier.polyline(&segment), segment);
    }

    #[test]
    fn test_endpoints_preserved() {
        // 101 colinear points; everything inside the endpoints is removable.
        let points: Vec<Point> = (0..=100)
            .map(|i| Point::new(i * 100_000, 0))
            .collect();
        let polyline = Polyline::from_points(points);

        let simplifier = Simplifier::default();
        let simplified = simplifier.polyline(&polyline);

        assert_eq!(simplified.first(), Some(&Point::new(0, 0)));
        assert_eq!(simplified.last(), Some(&Point::new(10_000_000, 0)));
        // The queue keeps its last three entries unprocessed, so exactly one
        // interior vertex survives alongside the endpoints.
        assert_eq!(simplified.len(), 3);
    }

    #[test]
    fn test_long_edge_exemption() {
        // Interior vertices deviate by only 0.04mm, but all edges exceed
        // max_resolution: no vertex may be removed no matter the deviation
        // budget.
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new_scale(10.0, 0.04),
            Point::new_scale(20.0, 0.04),
            Point::new_scale(30.0, 0.0),
        ]);
        let simplifier = Simplifier::new(SimplifyConfig {
            max_resolution: 0.5,
            max_deviation: 100.0,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(simplifier.polyline(&polyline), polyline);
    }

    #[test]
    fn test_short_edge_absorbed_into_intersection() {
        // A square with a tiny chamfer across one corner. The chamfer edge is
        // short, its neighbors are long: the removal shifts the surviving
        // chamfer vertex to the intersection of the two long edges, restoring
        // the exact corner.
        let polygon = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new_scale(9.98, 0.0),
            Point::new_scale(10.0, 0.02),
            Point::new_scale(10.0, 10.0),
            Point::new_scale(0.0, 10.0),
        ]);

        let simplifier = Simplifier::default();
        let simplified = simplifier.polygon(&polygon);

        assert_eq!(simplified.len(), 4);
        assert!(simplified.points().contains(&Point::new_scale(10.0, 0.0)));
    }

    #[test]
    fn test_short_edge_at_polyline_boundary_kept() {
        // The short edge touches the open end: there is no far-side segment
        // to intersect with, so nothing may be removed.
        let polyline = Polyline::from_points(vec![
            Point::new(0, 0),
            Point::new_scale(0.02, 0.02),
            Point::new_scale(10.0, 0.0),
            Point::new_scale(20.0, 5.0),
        ]);
        let simplifier = Simplifier::default();

        assert_eq!(simplifier.polyline(&polyline), polyline);
    }

    #[test]
    fn test_monotonic_count_and_floors() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let simplifier = Simplifier::default();

        for _ in 0..50 {
            let n = rng.gen_range(3..40);
            let points: Vec<Point> = (0..n)
                .map(|i| {
                    let angle = i as CoordF / n as CoordF * std::f64::consts::TAU;
                    let radius = rng.gen_range(4.0..6.0);
                    Point::new_scale(radius * angle.cos(), radius * angle.sin())
                })
                .collect();

            let polygon = Polygon::from_points(points.clone());
            let simplified = simplifier.polygon(&polygon);
            assert!(simplified.len() <= polygon.len());
            assert!(simplified.len() >= 3);

            let polyline = Polyline::from_points(points);
            let simplified = simplifier.polyline(&polyline);
            assert!(simplified.len() <= polyline.len());
            assert!(simplified.len() >= 2);
        }
    }

    #[test]
    fn test_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Point> = (0..200)
            .map(|i| {
                Point::new_scale(
                    i as CoordF * 0.05,
                    rng.gen_range(-0.01..0.01),
                )
            })
            .collect();
        let polyline = Polyline::from_points(points);

        let first = Simplifier::default().polyline(&polyline);
        let second = Simplifier::default().polyline(&polyline);
        assert_eq!(first, second);

        // Equal-importance candidates break ties by index, so the result is
        // reproducible across runs and instances.
        let third = Simplifier::new(SimplifyConfig::default())
            .unwrap()
            .polyline(&polyline);
        assert_eq!(first, third);
    }

    #[test]
    fn test_duplicate_points_merged() {
        // Coincident vertices have deviation 0 and always merge.
        let polygon = Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new_scale(10.0, 0.0),
            Point::new_scale(10.0, 10.0),
            Point::new_scale(0.0, 10.0),
        ]);
        let simplifier = Simplifier::default();
        assert_eq!(simplifier.polygon(&polygon).len(), 4);
    }
}
