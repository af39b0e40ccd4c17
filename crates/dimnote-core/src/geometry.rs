//! Axis-aligned projection of OCR bounding quadrilaterals.
//!
//! OCR boxes are free-form quadrilaterals and may be slightly rotated. The
//! spatial predicates only reason about axis-aligned extents, so each quad
//! is reduced to a horizontal and a vertical [`Interval`]: sort the four
//! coordinates, average the two smallest for the near edge and the two
//! largest for the far edge. This approximation is robust to small
//! rotations but biased for boxes rotated near 45°.

use serde::{Deserialize, Serialize};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur when building geometry from raw OCR points.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The raw point list does not have exactly four points.
    WrongPointCount { needed: usize, got: usize },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongPointCount { needed, got } => {
                write!(f, "bounding box needs {} points, got {}", needed, got)
            }
        }
    }
}

impl std::error::Error for GeometryError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// A bounding quadrilateral: four (x, y) points in an unspecified but
/// consistent winding order. Image coordinates, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [[f64; 2]; 4]);

impl Quad {
    /// Build from a raw point slice, failing fast on a malformed box so
    /// corrupted geometry never reaches the classification passes.
    pub fn from_points(points: &[[f64; 2]]) -> Result<Self, GeometryError> {
        <[[f64; 2]; 4]>::try_from(points)
            .map(Self)
            .map_err(|_| GeometryError::WrongPointCount {
                needed: 4,
                got: points.len(),
            })
    }
}

/// A closed interval on one axis, `near` ≤ `far` after projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Smaller-coordinate edge (left or top).
    pub near: f64,
    /// Larger-coordinate edge (right or bottom).
    pub far: f64,
}

impl Interval {
    /// Extent of the interval.
    pub fn width(self) -> f64 {
        self.far - self.near
    }

    /// Center of the interval.
    pub fn midpoint(self) -> f64 {
        (self.near + self.far) / 2.0
    }
}

// ── Projection ─────────────────────────────────────────────────────────────

fn project(mut coords: [f64; 4]) -> Interval {
    coords.sort_by(|a, b| a.total_cmp(b));
    Interval {
        near: (coords[0] + coords[1]) / 2.0,
        far: (coords[2] + coords[3]) / 2.0,
    }
}

/// Project a quad onto the x axis. Invariant under any permutation of the
/// four points.
pub fn horizontal_interval(quad: &Quad) -> Interval {
    project(quad.0.map(|p| p[0]))
}

/// Project a quad onto the y axis.
pub fn vertical_interval(quad: &Quad) -> Interval {
    project(quad.0.map(|p| p[1]))
}

/// Approximate box area from its projected intervals.
///
/// Callers must project first; a negative result signals an upstream
/// projection bug and is deliberately not guarded here.
pub fn area(h: Interval, v: Interval) -> f64 {
    h.width() * v.width()
}
