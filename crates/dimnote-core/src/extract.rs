//! OCR ingestion and rotation-variant extraction.
//!
//! The OCR engine itself is a black box behind the [`OcrEngine`] trait:
//! it turns an image into raw (text, points, confidence) lines. This
//! module owns everything around that call: generating rotated image
//! variants, filtering lines by confidence, tagging variant angles, and
//! converting raw point lists into [`Quad`]s. Confidence is checked here
//! and nowhere else; the classification passes trust the cut.

use image::GrayImage;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::geometry::{GeometryError, Quad};
use crate::Detection;

/// Degree step between rotation variants.
const VARIANT_STEP_DEG: i32 = 45;

/// One raw line from the OCR engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OcrLine {
    /// Recognized text.
    pub text: String,
    /// Bounding points as reported by the engine; expected to be four.
    pub points: Vec<[f64; 2]>,
    /// Recognition confidence in [0, 1].
    pub confidence: f32,
}

/// Black-box OCR boundary.
///
/// Implementations may keep per-call state (model sessions, caches);
/// `recognize` therefore takes `&mut self`. Engine failures are reported
/// as opaque boxed errors and surface as [`ExtractError::Engine`].
pub trait OcrEngine {
    /// Recognize text lines in one image.
    fn recognize(
        &mut self,
        image: &GrayImage,
    ) -> Result<Vec<OcrLine>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Configuration for the extraction stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractConfig {
    /// Confidence cut: lines at or below this value are dropped.
    pub threshold: f32,
    /// Run the engine over eight 45°-rotated copies of the image, tagging
    /// each detection with its variant angle, instead of a single pass at
    /// angle 0.
    pub rotation_required: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            threshold: 0.85,
            rotation_required: false,
        }
    }
}

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors that can occur during extraction.
#[derive(Debug)]
pub enum ExtractError {
    /// The OCR engine failed on one image variant.
    Engine {
        angle: i32,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The engine reported a malformed bounding box. Processing aborts
    /// rather than letting corrupted geometry reach the passes.
    BadBox { index: usize, source: GeometryError },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine { angle, source } => {
                write!(f, "OCR engine failed at variant angle {}: {}", angle, source)
            }
            Self::BadBox { index, source } => {
                write!(f, "malformed bounding box in line {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Engine { source, .. } => Some(source.as_ref()),
            Self::BadBox { source, .. } => Some(source),
        }
    }
}

// ── Extraction ─────────────────────────────────────────────────────────────

/// Convert one raw line into a detection tagged with `angle`.
///
/// Returns `Ok(None)` when the line fails the confidence cut (strict:
/// a line exactly at the threshold is dropped). A malformed point list is
/// a fail-fast error, not a skip.
pub fn ingest_line(
    line: &OcrLine,
    angle: i32,
    threshold: f32,
) -> Result<Option<Detection>, GeometryError> {
    if line.confidence <= threshold {
        return Ok(None);
    }
    let quad = Quad::from_points(&line.points)?;
    Ok(Some(Detection::new(
        line.text.clone(),
        quad,
        line.confidence,
        angle,
    )))
}

fn ingest_lines(
    lines: &[OcrLine],
    angle: i32,
    threshold: f32,
    out: &mut Vec<Detection>,
) -> Result<(), ExtractError> {
    for (index, line) in lines.iter().enumerate() {
        if let Some(detection) = ingest_line(line, angle, threshold)
            .map_err(|source| ExtractError::BadBox { index, source })?
        {
            out.push(detection);
        }
    }
    Ok(())
}

/// Rotate counter-clockwise about the image center on the same canvas,
/// filling uncovered corners with black.
fn rotate_variant(image: &GrayImage, angle_deg: i32) -> GrayImage {
    // imageproc rotates clockwise for positive theta.
    let theta = -(angle_deg as f32).to_radians();
    rotate_about_center(image, theta, Interpolation::Bilinear, image::Luma([0u8]))
}

/// Run the engine over the image (or its rotation variants) and collect
/// detections above the confidence cut.
///
/// Variants run sequentially in increasing-angle order, and per-variant
/// line order is preserved, so the returned sequence is grouped by
/// variant. The classification passes are order-sensitive only through
/// their last-writer-wins merge rule, which makes this ordering part of
/// the output contract.
pub fn extract<E>(
    engine: &mut E,
    image: &GrayImage,
    config: &ExtractConfig,
) -> Result<Vec<Detection>, ExtractError>
where
    E: OcrEngine + ?Sized,
{
    let mut detections = Vec::new();

    if config.rotation_required {
        for angle in (0..360).step_by(VARIANT_STEP_DEG as usize) {
            let variant = rotate_variant(image, angle);
            let lines = engine
                .recognize(&variant)
                .map_err(|source| ExtractError::Engine { angle, source })?;
            tracing::debug!(
                "variant {}°: {} lines from engine",
                angle,
                lines.len()
            );
            ingest_lines(&lines, angle, config.threshold, &mut detections)?;
        }
    } else {
        let lines = engine
            .recognize(image)
            .map_err(|source| ExtractError::Engine { angle: 0, source })?;
        ingest_lines(&lines, 0, config.threshold, &mut detections)?;
    }

    tracing::info!("{} detections above confidence {}", detections.len(), config.threshold);
    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted engine: returns one canned response per call, in order.
    struct ScriptedEngine {
        responses: std::collections::VecDeque<Vec<OcrLine>>,
        calls: usize,
    }

    impl ScriptedEngine {
        fn new(responses: Vec<Vec<OcrLine>>) -> Self {
            Self {
                responses: responses.into(),
                calls: 0,
            }
        }
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(
            &mut self,
            _image: &GrayImage,
        ) -> Result<Vec<OcrLine>, Box<dyn std::error::Error + Send + Sync>> {
            self.calls += 1;
            self.responses
                .pop_front()
                .ok_or_else(|| "unexpected extra call".into())
        }
    }

    fn line(text: &str, confidence: f32) -> OcrLine {
        OcrLine {
            text: text.into(),
            points: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            confidence,
        }
    }

    #[test]
    fn test_confidence_cut_is_strict() {
        let mut engine = ScriptedEngine::new(vec![vec![
            line("keep", 0.86),
            line("at-threshold", 0.85),
            line("below", 0.5),
        ]]);
        let detections = extract(
            &mut engine,
            &GrayImage::new(8, 8),
            &ExtractConfig::default(),
        )
        .unwrap();
        let texts: Vec<&str> = detections.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["keep"]);
    }

    #[test]
    fn test_rotation_variants_tag_angles_in_order() {
        let responses = (0..8)
            .map(|v| vec![line(&format!("v{}", v), 0.9)])
            .collect();
        let mut engine = ScriptedEngine::new(responses);
        let config = ExtractConfig {
            rotation_required: true,
            ..Default::default()
        };
        let detections = extract(&mut engine, &GrayImage::new(8, 8), &config).unwrap();

        assert_eq!(engine.calls, 8);
        let angles: Vec<i32> = detections.iter().map(|d| d.angle).collect();
        assert_eq!(angles, vec![0, 45, 90, 135, 180, 225, 270, 315]);
        assert_eq!(detections[3].text, "v3");
    }

    #[test]
    fn test_single_pass_without_rotation() {
        let mut engine = ScriptedEngine::new(vec![vec![line("only", 0.9)]]);
        let detections = extract(
            &mut engine,
            &GrayImage::new(8, 8),
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(engine.calls, 1);
        assert_eq!(detections[0].angle, 0);
    }

    #[test]
    fn test_malformed_box_fails_fast() {
        let bad = OcrLine {
            text: "bad".into(),
            points: vec![[0.0, 0.0], [1.0, 0.0]],
            confidence: 0.9,
        };
        let mut engine = ScriptedEngine::new(vec![vec![line("ok", 0.9), bad]]);
        let err = extract(
            &mut engine,
            &GrayImage::new(8, 8),
            &ExtractConfig::default(),
        )
        .unwrap_err();
        match err {
            ExtractError::BadBox { index, .. } => assert_eq!(index, 1),
            other => panic!("expected BadBox, got {}", other),
        }
    }

    #[test]
    fn test_low_confidence_malformed_box_is_still_skipped() {
        // The confidence cut runs before geometry conversion, so a junk
        // box below the cut does not abort extraction.
        let junk = OcrLine {
            text: "junk".into(),
            points: vec![],
            confidence: 0.1,
        };
        let mut engine = ScriptedEngine::new(vec![vec![junk, line("ok", 0.9)]]);
        let detections = extract(
            &mut engine,
            &GrayImage::new(8, 8),
            &ExtractConfig::default(),
        )
        .unwrap();
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn test_rotate_variant_preserves_canvas() {
        let image = GrayImage::new(16, 10);
        let rotated = rotate_variant(&image, 45);
        assert_eq!(rotated.dimensions(), (16, 10));
    }
}
