//! Pairwise and triple-wise spatial tests over projected intervals.
//!
//! All predicates are pure, take already-projected intervals, and are
//! directional and scale-relative rather than true distance metrics; they
//! can produce false positives on dense layouts. Every tuning constant is
//! passed explicitly, with defaults collected in [`PredicateConfig`].

use serde::{Deserialize, Serialize};

use crate::geometry::Interval;

/// Empirical tuning constants for the spatial predicates.
///
/// Defaults match the values the heuristics were tuned with on one
/// drawing style; they are not expected to transfer to arbitrary fonts or
/// scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredicateConfig {
    /// Horizontal gap window as a fraction of the left box's width: a
    /// right neighbor counts as adjacent when the gap between the boxes is
    /// positive but smaller than `gap_width_factor` left-box widths.
    pub gap_width_factor: f64,
    /// Vertical alignment tolerance as a fraction of the reference box's
    /// height: both top-to-top and bottom-to-bottom deltas must stay under
    /// it for two boxes to count as level.
    pub alignment_tolerance: f64,
    /// Area ratio a tolerance pivot must exceed over each of its two bound
    /// candidates to count as the dominant (nominal-value) text.
    pub area_margin: f64,
    /// Gate for the candidate flanking the pivot's lower half: the
    /// candidate's top edge must sit past `upper_tolerance` times the
    /// pivot's vertical midpoint while staying above its bottom edge.
    pub upper_tolerance: f64,
    /// Gate for the candidate flanking the pivot's upper half: the
    /// candidate's bottom edge must sit below the pivot's top edge but not
    /// further than `lower_tolerance` times the vertical midpoint.
    pub lower_tolerance: f64,
}

impl Default for PredicateConfig {
    fn default() -> Self {
        Self {
            gap_width_factor: 1.0,
            alignment_tolerance: 0.2,
            area_margin: 1.3,
            upper_tolerance: 0.9,
            lower_tolerance: 1.1,
        }
    }
}

/// True when box 2 starts immediately to the right of box 1, with a gap
/// smaller than `gap_factor` box-1 widths. Strictly directional: box 1
/// must be to the left, and touching or overlapping boxes do not count.
pub fn right_margin_adjacent(h1: Interval, h2: Interval, gap_factor: f64) -> bool {
    let gap = h2.near - h1.far;
    gap > 0.0 && gap < gap_factor * h1.width()
}

/// True when both vertical edge-to-edge deltas are under `tolerance`
/// times box 1's height. Symmetric in magnitude, but box 1 supplies the
/// reference scale.
pub fn vertically_aligned(v1: Interval, v2: Interval, tolerance: f64) -> bool {
    let limit = tolerance * v1.width();
    (v1.near - v2.near).abs() < limit && (v1.far - v2.far).abs() < limit
}

/// True when the pivot area strictly exceeds `margin` times each
/// candidate area. Identifies the "main" (larger) text among three.
pub fn area_dominant(pivot_area: f64, a_area: f64, b_area: f64, margin: f64) -> bool {
    pivot_area > margin * a_area && pivot_area > margin * b_area
}

/// True when the candidate's bottom edge sits below the pivot's top edge
/// but no further than `tolerance` times the pivot's vertical midpoint.
/// With y growing downward this places the candidate along the pivot's
/// upper half.
pub fn below_pivot(pivot_v: Interval, candidate_v: Interval, tolerance: f64) -> bool {
    pivot_v.near < candidate_v.far && candidate_v.far < tolerance * pivot_v.midpoint()
}

/// True when the candidate's top edge sits above the pivot's bottom edge
/// but past `tolerance` times the pivot's vertical midpoint. The mirror
/// gate of [`below_pivot`], covering the pivot's lower half.
pub fn above_pivot(pivot_v: Interval, candidate_v: Interval, tolerance: f64) -> bool {
    pivot_v.far > candidate_v.near && candidate_v.near > tolerance * pivot_v.midpoint()
}
