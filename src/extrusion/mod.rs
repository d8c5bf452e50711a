//! Variable-width extrusion toolpaths.
//!
//! Wall toolpaths produced by a wall-width strategy carry an extrusion width
//! at every vertex. This module provides the data model for such paths:
//! [`ExtrusionJunction`] (a positioned, width-tagged vertex) and
//! [`ExtrusionLine`] (an ordered junction sequence with inset metadata).
//!
//! Simplification of these paths goes through
//! [`Simplifier::extrusion_line`](crate::Simplifier::extrusion_line), which
//! layers width-transition and extrusion-area checks on top of the
//! positional criteria.

mod junction;
mod line;

pub use junction::{ExtrusionJunction, ExtrusionJunctions};
pub use line::{ExtrusionLine, VariableWidthLines};
