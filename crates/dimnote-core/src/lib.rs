//! dimnote-core — drawing-annotation inference over raw OCR output.
//!
//! Given the text fragments an OCR engine recognized on an engineering
//! drawing, each with its bounding quadrilateral and confidence, the
//! pipeline decides which fragments denote a radius callout, which labels
//! mark a dimension as a required measurement, and which pairs of smaller
//! fragments are the lower/upper tolerance bounds of a larger dimension
//! value. The pipeline stages are:
//!
//! 1. **Extract** – run the (external) OCR engine, optionally over eight
//!    45°-rotated copies of the image, and keep lines above the
//!    confidence cut.
//! 2. **Radius** – tag texts matching a radius callout pattern ("R12").
//! 3. **Measurement** – pair a label with the dimension box immediately to
//!    its right and level with it.
//! 4. **Bounds** – attach two smaller flanking boxes to a larger pivot box
//!    as its tolerance bounds.
//!
//! The geometric tests are empirical heuristics tuned for one drawing
//! style; their constants live in [`PredicateConfig`].

pub mod extract;
pub mod geometry;
pub mod passes;
pub mod pipeline;
pub mod predicates;

pub use extract::{extract, ingest_line, ExtractConfig, ExtractError, OcrEngine, OcrLine};
pub use geometry::{area, horizontal_interval, vertical_interval, GeometryError, Interval, Quad};
pub use pipeline::{annotate, process_image, ProcessConfig};
pub use predicates::PredicateConfig;

use serde::{Deserialize, Serialize};

/// One OCR-recognized text fragment with its geometry and inferred
/// semantics.
///
/// Created once per OCR line that clears the confidence cut, never
/// destroyed; only `attributes` is mutated, by the classification passes.
/// Wire field names match the established sink format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The recognized text.
    #[serde(rename = "extracted_text")]
    pub text: String,
    /// Bounding quadrilateral from the OCR engine; may be rotated.
    #[serde(rename = "coordinates")]
    pub quad: Quad,
    /// OCR confidence in [0, 1]; always above the ingestion threshold.
    #[serde(rename = "proba")]
    pub confidence: f32,
    /// Rotation-variant angle in degrees (0 when variants are disabled).
    pub angle: i32,
    /// Inferred drawing semantics, filled in by the classification passes.
    pub attributes: Attributes,
}

impl Detection {
    /// Build a detection with default (empty) attributes.
    pub fn new(text: impl Into<String>, quad: Quad, confidence: f32, angle: i32) -> Self {
        Self {
            text: text.into(),
            quad,
            confidence,
            angle,
            attributes: Attributes::default(),
        }
    }
}

/// Semantic attributes inferred by the classification passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// True when the text contains a radius callout such as "R12".
    #[serde(rename = "IsRadius")]
    pub is_radius: bool,
    /// Text of an adjacent label marking this dimension as a required
    /// measurement; serialized as JSON `false` while unset.
    pub required_measurement: MeasurementLabel,
    /// Text of the lower tolerance bound, once bound association fired.
    pub lower_bound: Option<String>,
    /// Text of the upper tolerance bound.
    pub upper_bound: Option<String>,
}

/// Bool-or-string wire value for the measurement-label attribute.
///
/// The sink format encodes "no label" as `false` and an associated label
/// as the label's text, so plain `Option<String>` does not round-trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MeasurementLabel {
    /// No label associated; serializes as `false`.
    #[default]
    Unset,
    /// Text of the associated label.
    Label(String),
}

impl MeasurementLabel {
    /// Returns the label text, if one was associated.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Label(text) => Some(text),
        }
    }
}

impl Serialize for MeasurementLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Unset => serializer.serialize_bool(false),
            Self::Label(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for MeasurementLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = MeasurementLabel;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("false or a label string")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v {
                    Err(E::custom("`true` is not a valid measurement label"))
                } else {
                    Ok(MeasurementLabel::Unset)
                }
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MeasurementLabel::Label(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(MeasurementLabel::Label(v))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad {
        Quad([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }

    #[test]
    fn test_default_attributes_wire_format() {
        // 0.875 is exactly representable, so the f32 -> f64 widening in
        // serde_json keeps the literal comparable.
        let det = Detection::new("R5", unit_quad(), 0.875, 0);
        let value = serde_json::to_value(&det).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "extracted_text": "R5",
                "coordinates": [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                "proba": 0.875,
                "angle": 0,
                "attributes": {
                    "IsRadius": false,
                    "required_measurement": false,
                    "lower_bound": null,
                    "upper_bound": null,
                },
            })
        );
    }

    #[test]
    fn test_measurement_label_round_trip() {
        let unset: MeasurementLabel = serde_json::from_str("false").unwrap();
        assert_eq!(unset, MeasurementLabel::Unset);

        let label: MeasurementLabel = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(label.as_label(), Some("M"));

        assert_eq!(serde_json::to_string(&MeasurementLabel::Unset).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&MeasurementLabel::Label("M".into())).unwrap(),
            "\"M\""
        );
    }

    #[test]
    fn test_measurement_label_rejects_true() {
        let parsed: Result<MeasurementLabel, _> = serde_json::from_str("true");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_detection_round_trip() {
        let mut det = Detection::new("12.5", unit_quad(), 0.9, 45);
        det.attributes.required_measurement = MeasurementLabel::Label("M".into());
        det.attributes.lower_bound = Some("-0.1".into());
        det.attributes.upper_bound = Some("+0.1".into());

        let json = serde_json::to_string(&det).unwrap();
        let back: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, det);
    }
}
