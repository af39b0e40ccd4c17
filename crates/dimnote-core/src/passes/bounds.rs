//! Tolerance-bound association.
//!
//! A toleranced dimension is written as a large nominal value with two
//! smaller bound texts stacked to its right. This pass scans all ordered
//! triples of distinct detections, treating the third index as the pivot
//! (the nominal value): the pivot must dominate both candidates in area,
//! both candidates must be right-margin adjacent to it, and each must pass
//! one of the two vertical flank gates.
//!
//! With y growing downward, the candidate passing the [`below_pivot`]
//! gate hugs the pivot's top edge and therefore carries the upper bound
//! text, while the [`above_pivot`] candidate hugs the bottom edge and
//! carries the lower bound. All-triples scanning is O(n³); acceptable for
//! per-drawing detection counts, a scaling limit beyond that.

use super::{project_all, AttributeChange, Patch};
use crate::geometry::area;
use crate::predicates::{
    above_pivot, area_dominant, below_pivot, right_margin_adjacent, PredicateConfig,
};
use crate::Detection;

/// One patch per (i, j, pivot) triple satisfying all five bound
/// predicates: `lower_bound` takes j's text, `upper_bound` takes i's.
/// Later triples for the same pivot overwrite earlier ones on apply.
pub fn bound_patches(detections: &[Detection], config: &PredicateConfig) -> Vec<Patch> {
    let projected = project_all(detections);
    let areas: Vec<f64> = projected.iter().map(|&(h, v)| area(h, v)).collect();
    let mut patches = Vec::new();

    for i in 0..detections.len() {
        for j in 0..detections.len() {
            if j == i {
                continue;
            }
            for pivot in 0..detections.len() {
                if pivot == i || pivot == j {
                    continue;
                }
                let (h_pivot, v_pivot) = projected[pivot];
                if area_dominant(areas[pivot], areas[i], areas[j], config.area_margin)
                    && below_pivot(v_pivot, projected[i].1, config.lower_tolerance)
                    && above_pivot(v_pivot, projected[j].1, config.upper_tolerance)
                    && right_margin_adjacent(h_pivot, projected[i].0, config.gap_width_factor)
                    && right_margin_adjacent(h_pivot, projected[j].0, config.gap_width_factor)
                {
                    patches.push(Patch {
                        target: pivot,
                        change: AttributeChange::Bounds {
                            lower: detections[j].text.clone(),
                            upper: detections[i].text.clone(),
                        },
                    });
                }
            }
        }
    }
    patches
}
