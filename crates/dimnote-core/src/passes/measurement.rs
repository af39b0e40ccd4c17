//! Measurement-label association.
//!
//! A dimension on a drawing can carry a short label to its left marking it
//! as a required measurement. This pass scans all ordered pairs of
//! distinct detections and, when the left box sits immediately before and
//! level with the right box, records the left box's text as the right
//! box's label. All-pairs scanning is O(n²); detection counts on a single
//! drawing are small enough that this is not a concern.

use super::{project_all, AttributeChange, Patch};
use crate::predicates::{right_margin_adjacent, vertically_aligned, PredicateConfig};
use crate::Detection;

/// One patch per (label, dimension) pair where the label box is
/// right-margin adjacent to and vertically aligned with the dimension
/// box. Later-matching labels for the same dimension overwrite earlier
/// ones when the patches are applied.
pub fn measurement_patches(detections: &[Detection], config: &PredicateConfig) -> Vec<Patch> {
    let projected = project_all(detections);
    let mut patches = Vec::new();

    for i in 0..detections.len() {
        let (h_i, v_i) = projected[i];
        for j in 0..detections.len() {
            if i == j {
                continue;
            }
            let (h_j, v_j) = projected[j];
            if right_margin_adjacent(h_i, h_j, config.gap_width_factor)
                && vertically_aligned(v_i, v_j, config.alignment_tolerance)
            {
                patches.push(Patch {
                    target: j,
                    change: AttributeChange::MeasurementLabel(detections[i].text.clone()),
                });
            }
        }
    }
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::apply_patches;
    use crate::Quad;

    fn rect(text: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Detection {
        let quad = Quad([[x0, y0], [x1, y0], [x1, y1], [x0, y1]]);
        Detection::new(text, quad, 0.9, 0)
    }

    #[test]
    fn test_label_left_of_dimension_associates() {
        let mut detections = vec![
            rect("A", 0.0, 0.0, 10.0, 10.0),
            rect("B", 15.0, 1.0, 25.0, 9.0),
        ];
        let patches = measurement_patches(&detections, &PredicateConfig::default());
        apply_patches(&mut detections, patches);

        assert_eq!(
            detections[1].attributes.required_measurement.as_label(),
            Some("A")
        );
        // The association is directional: A gains nothing.
        assert_eq!(detections[0].attributes.required_measurement.as_label(), None);
    }

    #[test]
    fn test_no_association_when_predicates_fail() {
        // Same row but the gap exceeds one left-box width.
        let far_apart = vec![
            rect("A", 0.0, 0.0, 10.0, 10.0),
            rect("B", 25.0, 1.0, 35.0, 9.0),
        ];
        assert!(measurement_patches(&far_apart, &PredicateConfig::default()).is_empty());

        // Adjacent but on different rows.
        let misaligned = vec![
            rect("A", 0.0, 0.0, 10.0, 10.0),
            rect("B", 15.0, 8.0, 25.0, 18.0),
        ];
        assert!(measurement_patches(&misaligned, &PredicateConfig::default()).is_empty());
    }

    #[test]
    fn test_later_label_overwrites_earlier() {
        // Two candidate labels for the same dimension box; the
        // higher-index label is emitted later and wins.
        let mut detections = vec![
            rect("first", 0.0, 0.0, 10.0, 10.0),
            rect("second", 1.0, 0.5, 10.5, 10.5),
            rect("dim", 15.0, 1.0, 25.0, 9.0),
        ];
        let patches = measurement_patches(&detections, &PredicateConfig::default());
        assert_eq!(patches.len(), 2);
        apply_patches(&mut detections, patches);
        assert_eq!(
            detections[2].attributes.required_measurement.as_label(),
            Some("second")
        );
    }
}
