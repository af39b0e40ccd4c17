//! The three classification passes over a detection set.
//!
//! Each pass reads an immutable snapshot of the detections (text and
//! coordinates only) and returns a list of attribute [`Patch`]es keyed by
//! detection index. The pipeline applies a pass's patches in emission
//! order before the next pass runs, so when several matches target the
//! same detection the last one wins. That is the documented merge rule,
//! not an accident of in-place mutation.
//!
//! Passes write to disjoint attribute fields and read fields no pass
//! writes, so their fixed order (radius → measurement → bounds) matters
//! only through this merge rule.

pub mod bounds;
pub mod measurement;
pub mod radius;

use crate::geometry::{horizontal_interval, vertical_interval, Interval};
use crate::{Detection, MeasurementLabel};

/// Project every detection's quad once; the pair and triple passes index
/// into the result instead of re-projecting per comparison.
pub(crate) fn project_all(detections: &[Detection]) -> Vec<(Interval, Interval)> {
    detections
        .iter()
        .map(|d| (horizontal_interval(&d.quad), vertical_interval(&d.quad)))
        .collect()
}

/// A single attribute change targeting one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Index of the detection to update.
    pub target: usize,
    pub change: AttributeChange,
}

/// The attribute update a pass wants applied.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    /// Mark the detection as a radius callout.
    Radius,
    /// Associate a required-measurement label with the detection.
    MeasurementLabel(String),
    /// Attach lower/upper tolerance bound texts to the detection.
    Bounds { lower: String, upper: String },
}

/// Apply patches in order; overlapping targets resolve last-writer-wins.
pub fn apply_patches(detections: &mut [Detection], patches: Vec<Patch>) {
    for patch in patches {
        let attributes = &mut detections[patch.target].attributes;
        match patch.change {
            AttributeChange::Radius => attributes.is_radius = true,
            AttributeChange::MeasurementLabel(text) => {
                attributes.required_measurement = MeasurementLabel::Label(text);
            }
            AttributeChange::Bounds { lower, upper } => {
                attributes.lower_bound = Some(lower);
                attributes.upper_bound = Some(upper);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quad;

    fn det(text: &str) -> Detection {
        let quad = Quad([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        Detection::new(text, quad, 0.9, 0)
    }

    #[test]
    fn test_last_writer_wins_on_same_target() {
        let mut detections = vec![det("10.0")];
        apply_patches(
            &mut detections,
            vec![
                Patch {
                    target: 0,
                    change: AttributeChange::MeasurementLabel("first".into()),
                },
                Patch {
                    target: 0,
                    change: AttributeChange::MeasurementLabel("second".into()),
                },
            ],
        );
        assert_eq!(
            detections[0].attributes.required_measurement.as_label(),
            Some("second")
        );
    }

    #[test]
    fn test_patches_touch_only_their_fields() {
        let mut detections = vec![det("R3"), det("7.5")];
        apply_patches(
            &mut detections,
            vec![
                Patch {
                    target: 0,
                    change: AttributeChange::Radius,
                },
                Patch {
                    target: 1,
                    change: AttributeChange::Bounds {
                        lower: "-0.2".into(),
                        upper: "+0.1".into(),
                    },
                },
            ],
        );
        assert!(detections[0].attributes.is_radius);
        assert_eq!(detections[0].attributes.lower_bound, None);
        assert!(!detections[1].attributes.is_radius);
        assert_eq!(detections[1].attributes.lower_bound.as_deref(), Some("-0.2"));
        assert_eq!(detections[1].attributes.upper_bound.as_deref(), Some("+0.1"));
    }
}
