//! Extrusion line: a variable-width toolpath.

use serde::{Deserialize, Serialize};

use super::junction::ExtrusionJunction;
use crate::geometry::{Point, Polygon, Polyline};
use crate::simplify::{Simplifier, SimplifyVertex};
use crate::{Coord, CoordF, Error, Result};

/// A toolpath to be extruded with variable line width.
///
/// This is a sequence of [`ExtrusionJunction`]s with a bit of metadata about
/// which inset the path represents. Each junction carries its own width, so
/// the width varies along the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionLine {
    /// The junctions along which this path runs.
    pub junctions: Vec<ExtrusionJunction>,

    /// Which inset this path represents, counted from the outside inwards.
    /// The outer wall has index 0.
    pub inset_idx: usize,

    /// If a thin piece is printed with an odd number of walls there is one
    /// line through the middle that has no companion coming back on the
    /// other side and is not a closed loop. True for such center lines.
    pub is_odd: bool,

    /// Which region of the outline this line belongs to. A solid polygon
    /// without holes has one region, a polygon with a hole has two, and
    /// disconnected parts are separate regions. 0 when no region was given.
    pub region_id: usize,

    /// Whether this path forms a closed loop.
    pub is_closed: bool,
}

impl ExtrusionLine {
    /// Create a new empty extrusion line.
    pub fn new(inset_idx: usize, is_odd: bool, is_closed: bool) -> Self {
        Self {
            junctions: Vec::new(),
            inset_idx,
            is_odd,
            region_id: 0,
            is_closed,
        }
    }

    /// Create a closed extrusion loop.
    pub fn closed(inset_idx: usize) -> Self {
        Self::new(inset_idx, false, true)
    }

    /// Create an open extrusion line.
    pub fn open(inset_idx: usize) -> Self {
        Self::new(inset_idx, false, false)
    }

    /// Create an odd (center) wall line.
    pub fn odd(inset_idx: usize) -> Self {
        Self::new(inset_idx, true, false)
    }

    /// Create an extrusion line from junctions.
    pub fn from_junctions(
        junctions: Vec<ExtrusionJunction>,
        inset_idx: usize,
        is_odd: bool,
        is_closed: bool,
    ) -> Self {
        Self {
            junctions,
            inset_idx,
            is_odd,
            region_id: 0,
            is_closed,
        }
    }

    /// Set the region this line belongs to.
    pub fn with_region(mut self, region_id: usize) -> Self {
        self.region_id = region_id;
        self
    }

    /// Create a constant-width closed loop from a polygon.
    pub fn from_polygon(polygon: &Polygon, width: Coord, inset_idx: usize) -> Self {
        let junctions = polygon
            .points()
            .iter()
            .map(|p| ExtrusionJunction::new(*p, width, inset_idx))
            .collect();
        Self {
            junctions,
            inset_idx,
            is_odd: false,
            region_id: 0,
            is_closed: true,
        }
    }

    /// Create a constant-width open line from a polyline.
    pub fn from_polyline(polyline: &Polyline, width: Coord, inset_idx: usize) -> Self {
        let junctions = polyline
            .points()
            .iter()
            .map(|p| ExtrusionJunction::new(*p, width, inset_idx))
            .collect();
        Self {
            junctions,
            inset_idx,
            is_odd: false,
            region_id: 0,
            is_closed: false,
        }
    }

    /// Create an open line from parallel point and width sequences.
    ///
    /// Returns [`Error::Geometry`] when the sequences differ in length.
    pub fn from_points_and_widths(
        points: Vec<Point>,
        widths: Vec<Coord>,
        inset_idx: usize,
    ) -> Result<Self> {
        if points.len() != widths.len() {
            return Err(Error::Geometry(format!(
                "point/width count mismatch: {} points, {} widths",
                points.len(),
                widths.len()
            )));
        }
        let junctions = points
            .into_iter()
            .zip(widths)
            .map(|(p, w)| ExtrusionJunction::new(p, w, inset_idx))
            .collect();
        Ok(Self {
            junctions,
            inset_idx,
            is_odd: false,
            region_id: 0,
            is_closed: false,
        })
    }

    /// Check if the line has no junctions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    /// Get the number of junctions.
    #[inline]
    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    /// Add a junction to the end of the line.
    #[inline]
    pub fn push(&mut self, junction: ExtrusionJunction) {
        self.junctions.push(junction);
    }

    /// Get the first junction (if any).
    #[inline]
    pub fn first(&self) -> Option<&ExtrusionJunction> {
        self.junctions.first()
    }

    /// Get the last junction (if any).
    #[inline]
    pub fn last(&self) -> Option<&ExtrusionJunction> {
        self.junctions.last()
    }

    /// Sum the total length of this path in units, including the closing
    /// segment for closed loops.
    pub fn length(&self) -> CoordF {
        if self.junctions.len() < 2 {
            return 0.0;
        }

        let mut total: CoordF = self
            .junctions
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum();
        if self.is_closed {
            // windows() is never empty here, so first/last exist.
            total += self.junctions[self.junctions.len() - 1].distance_to(&self.junctions[0]);
        }
        total
    }

    /// Get the minimum width along this line.
    pub fn min_width(&self) -> Coord {
        self.junctions.iter().map(|j| j.width).min().unwrap_or(0)
    }

    /// Get the maximum width along this line.
    pub fn max_width(&self) -> Coord {
        self.junctions.iter().map(|j| j.width).max().unwrap_or(0)
    }

    /// Check if this line is the outermost wall.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.inset_idx == 0
    }

    /// Append the junctions of this line to `result`.
    pub fn append_junctions_to(&self, result: &mut Vec<ExtrusionJunction>) {
        result.extend_from_slice(&self.junctions);
    }

    /// Get just the positions of the junctions.
    pub fn points(&self) -> Vec<Point> {
        self.junctions.iter().map(|j| j.position).collect()
    }

    /// Get the widths at each junction.
    pub fn widths(&self) -> Vec<Coord> {
        self.junctions.iter().map(|j| j.width).collect()
    }

    /// Convert to a polygon (loses width information).
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from_points(self.points())
    }

    /// Convert to a polyline (loses width information).
    pub fn to_polyline(&self) -> Polyline {
        Polyline::from_points(self.points())
    }

    /// Iterator over junctions.
    pub fn iter(&self) -> impl Iterator<Item = &ExtrusionJunction> {
        self.junctions.iter()
    }

    /// The cross-sectional area gained or lost when junction `b` is removed
    /// from the straight-through triple (`a`, `b`, `c`), in square units.
    ///
    /// The two segments a-b and b-c are printed as trapezoids whose parallel
    /// sides are the junction widths; the merged a-c replacement is extruded
    /// at the width of `c`. The returned value is the absolute difference
    /// between the two cross-sectional areas.
    pub fn area_deviation_error(
        a: &ExtrusionJunction,
        b: &ExtrusionJunction,
        c: &ExtrusionJunction,
    ) -> CoordF {
        let ab_length = a.distance_to(b);
        let bc_length = b.distance_to(c);
        let merged = (a.width + b.width) as CoordF / 2.0 * ab_length
            + (b.width + c.width) as CoordF / 2.0 * bc_length;
        let uniform = c.width as CoordF * (ab_length + bc_length);
        (merged - uniform).abs()
    }
}

impl SimplifyVertex for ExtrusionJunction {
    #[inline]
    fn position(&self) -> Point {
        self.position
    }

    #[inline]
    fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// A junction with a distinctly different width than a neighbor marks a
    /// deliberate wall-width transition; merging across it would smear the
    /// step into a taper.
    fn pinned(&self, before: &Self, after: &Self, simplifier: &Simplifier) -> bool {
        simplifier.is_width_transition(self.width, before.width)
            || simplifier.is_width_transition(self.width, after.width)
    }

    /// Keep the change in extruded cross-sectional area within budget.
    fn removal_allowed(&self, before: &Self, after: &Self, simplifier: &Simplifier) -> bool {
        ExtrusionLine::area_deviation_error(before, self, after)
            <= simplifier.max_area_deviation2()
    }
}

impl std::ops::Index<usize> for ExtrusionLine {
    type Output = ExtrusionJunction;

    fn index(&self, index: usize) -> &ExtrusionJunction {
        &self.junctions[index]
    }
}

impl std::ops::IndexMut<usize> for ExtrusionLine {
    fn index_mut(&mut self, index: usize) -> &mut ExtrusionJunction {
        &mut self.junctions[index]
    }
}

impl IntoIterator for ExtrusionLine {
    type Item = ExtrusionJunction;
    type IntoIter = std::vec::IntoIter<ExtrusionJunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.junctions.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtrusionLine {
    type Item = &'a ExtrusionJunction;
    type IntoIter = std::slice::Iter<'a, ExtrusionJunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.junctions.iter()
    }
}

/// The extrusion lines generated for one wall toolpath.
pub type VariableWidthLines = Vec<ExtrusionLine>;
